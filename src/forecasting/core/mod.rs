//! Core Holt-Winters building blocks: data, period, weights, recursion,
//! objective, forecasts, and configuration.
//!
//! This module is the “engine room” for the forecasting stack. It exposes
//! the pure numerical pieces (smoothing, scoring, forecasting) and the
//! validated value types they operate on, while the higher-level
//! [`crate::forecasting::models`] module wires them into fitting and
//! validation workflows.
//!
//! Submodules
//! ----------
//! - [`data`]: [`ObservationMatrix`], the validated counts matrix with its
//!   time index and sampling interval.
//! - [`period`]: [`SeasonalPeriod`] and history-length checks.
//! - [`weights`]: [`WeightTriple`] `(alpha, beta, gamma)`.
//! - [`init`]: initial seasonal profile and trend.
//! - [`smoother`]: the additive recursion and its [`SmootherState`].
//! - [`objective`]: the forecast-error criterion minimized during fitting.
//! - [`forecasts`]: point and path forecasts from a retained state.
//! - [`options`]: [`FitOptions`] and [`ValidationOptions`].
//!
//! Everything here is single-threaded, allocation-light and free of I/O.
pub mod data;
pub mod forecasts;
pub mod init;
pub mod objective;
pub mod options;
pub mod period;
pub mod smoother;
pub mod weights;

pub use self::data::ObservationMatrix;
pub use self::forecasts::{Clamp, ForecastResult, one_step_ahead, predict, predict_path, predict_series};
pub use self::objective::{Aggregation, ObjectiveConfig, TargetAlignment, forecast_error};
pub use self::options::{FitOptions, Resmooth, SeriesOrder, TrendRanking, ValidationOptions};
pub use self::period::SeasonalPeriod;
pub use self::smoother::{SmootherState, smooth};
pub use self::weights::WeightTriple;
