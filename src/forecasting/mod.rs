//! forecasting — additive seasonal Holt-Winters for parallel count series.
//!
//! Purpose
//! -------
//! Forecast many parallel series (for example topic counts per four-hour
//! bucket) with one shared set of smoothing weights `(alpha, beta, gamma)`,
//! calibrated by a bounded global search, and check the result against a
//! naive baseline on newer data.
//!
//! Layout
//! ------
//! - [`core`]: validated data and configuration types, the smoother, the
//!   forecast-error objective and the forecaster.
//! - [`models`]: fitting ([`models::HoltWintersModel`]), the persisted
//!   [`models::FittedModel`], and validation ([`models::Validator`]).
//! - [`errors`]: [`errors::HWError`] / [`errors::HWResult`].
//!
//! Conventions
//! -----------
//! - Matrices are `series × time steps`; time index 0 is the oldest column.
//! - Everything returns `HWResult<T>`; inputs are validated at construction
//!   so numeric kernels can assume clean data.

pub mod core;
pub mod errors;
pub mod models;

pub mod prelude {
    pub use super::core::{
        Clamp, FitOptions, ForecastResult, ObjectiveConfig, ObservationMatrix, SeasonalPeriod,
        ValidationOptions, WeightTriple,
    };
    pub use super::errors::{HWError, HWResult};
    pub use super::models::prelude::*;
}
