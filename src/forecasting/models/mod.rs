//! models — Holt-Winters fitting, fitted snapshots, and validation.
//!
//! Purpose
//! -------
//! Collect the user-facing workflows built on `forecasting::core`: calibrate
//! the smoothing weights, keep the fitted state, and score it on fresh data
//! against a naive baseline.
//!
//! Key behaviors
//! -------------
//! - [`HoltWintersModel`] implements the fit: series selection, bounded
//!   search over `[0, 1]^3` through [`HoltWintersObjective`], and a final
//!   smoother pass at the best weights.
//! - [`FittedModel`] is the persisted result: weights, state, diagnostics and
//!   [`Provenance`], with forecasting helpers and JSON persistence.
//! - [`Validator`] / [`validate`] produce a [`ValidationResult`] of per-step
//!   RMSEs for the model and for the last-observation baseline.
//!
//! Invariants & assumptions
//! ------------------------
//! - A [`FittedModel`] is always internally consistent: constructors and
//!   `from_json` run [`FittedModel::validate`].
//! - Search budgets exhausting is not an error; the diagnostics say so.
//!
//! Downstream usage
//! ----------------
//! - Build [`FitOptions`](crate::forecasting::core::FitOptions), call
//!   `HoltWintersModel::new(opts).fit(&data)`, then `forecast` or `validate`.
//! - Persist with `FittedModel::save` and reload with `FittedModel::load`.

pub mod backtest;
pub mod fitted;
pub mod holt_winters;

pub use self::backtest::{ValidationResult, Validator, resmooth, validate};
pub use self::fitted::{FittedModel, Provenance};
pub use self::holt_winters::{HoltWintersModel, HoltWintersObjective};

pub mod prelude {
    pub use super::backtest::{ValidationResult, Validator, validate};
    pub use super::fitted::FittedModel;
    pub use super::holt_winters::HoltWintersModel;
}
