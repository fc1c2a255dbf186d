//! Errors for the Holt-Winters forecasting stack (data validation, seasonal
//! period and weight checks, objective configuration, forecasting bounds,
//! validation and persistence failures).
//!
//! This module defines a single error type, [`HWError`], used across the
//! smoother, the objective, the fitted-model layer and the validator.
//!
//! ## Conventions
//! - **Indices are 0-based**: `row` is a series index, `col` a time-step index.
//! - Observation values must be **finite**; sign is not checked because the
//!   additive smoother is agnostic to it.
//! - Optimizer/backend errors are normalized to
//!   [`HWError::OptimizationFailed`] with a human-readable status string.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Crate-wide result alias for Holt-Winters operations.
pub type HWResult<T> = Result<T, HWError>;

/// Unified error type for Holt-Winters modeling.
///
/// Variants cover input/shape validation, configuration checks
/// (seasonal period, weights, objective, validation options), forecasting
/// bounds, insufficient data for validation, and optimizer or persistence
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub enum HWError {
    // ---- Input/data validation ----
    /// Matrix has no rows or no columns.
    EmptyMatrix { rows: usize, cols: usize },

    /// A data point is NaN/±inf.
    NonFiniteData { row: usize, col: usize, value: f64 },

    /// Two related containers disagree on a dimension.
    ShapeMismatch { what: &'static str, expected: usize, found: usize },

    /// Time index must be strictly increasing.
    UnorderedTimes { index: usize },

    /// Sampling interval or calendar cycle is not usable.
    InvalidInterval { reason: &'static str },

    // ---- Configuration ----
    /// Seasonal period must be > 0 and tile the calendar cycle.
    InvalidSeasonalPeriod { period: usize, reason: &'static str },

    /// Fewer than two full seasonal cycles of history.
    TooFewObservations { needed: usize, got: usize },

    /// A smoothing weight is outside [0, 1] or non-finite.
    InvalidWeight { name: &'static str, value: f64 },

    /// Forecast-objective horizon/holdout combination is unusable.
    InvalidObjectiveConfig { horizon: usize, holdout: usize, reason: &'static str },

    /// Fit options are out of range.
    InvalidFitOptions { reason: &'static str },

    /// Validation options are out of range.
    InvalidValidationOptions { reason: &'static str },

    // ---- Forecasting ----
    /// Forecast origin lies outside the retained state.
    OriginOutOfRange { origin: usize, len: usize },

    /// Series index lies outside the retained state.
    SeriesOutOfRange { series: usize, len: usize },

    /// Forecast horizon cannot be indexed from the given origin.
    InvalidHorizon { origin: usize, horizon: usize },

    // ---- Validation ----
    /// Nothing left to score against.
    InsufficientData { reason: &'static str },

    // ---- Estimation / optimizer ----
    /// Optimizer failed; include a human-readable status/reason.
    OptimizationFailed { status: String },

    // ---- Persistence ----
    /// Snapshot could not be encoded, decoded, read or written.
    Persistence { text: String },
}

impl std::error::Error for HWError {}

impl std::fmt::Display for HWError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HWError::EmptyMatrix { rows, cols } => {
                write!(f, "Observation matrix is empty: {rows} rows x {cols} columns.")
            }
            HWError::NonFiniteData { row, col, value } => {
                write!(f, "Observation at (series {row}, step {col}) is non-finite: {value}")
            }
            HWError::ShapeMismatch { what, expected, found } => {
                write!(f, "Shape mismatch for {what}: expected {expected}, found {found}")
            }
            HWError::UnorderedTimes { index } => {
                write!(f, "Time index must be strictly increasing; violated at position {index}.")
            }
            HWError::InvalidInterval { reason } => {
                write!(f, "Invalid sampling interval: {reason}")
            }
            HWError::InvalidSeasonalPeriod { period, reason } => {
                write!(f, "Invalid seasonal period {period}: {reason}")
            }
            HWError::TooFewObservations { needed, got } => {
                write!(f, "Too few observations: need at least {needed} time steps, got {got}.")
            }
            HWError::InvalidWeight { name, value } => {
                write!(f, "Smoothing weight {name} must be finite and in [0, 1]; got: {value}")
            }
            HWError::InvalidObjectiveConfig { horizon, holdout, reason } => {
                write!(f, "Invalid objective configuration (m = {horizon}, holdout = {holdout}): {reason}")
            }
            HWError::InvalidFitOptions { reason } => {
                write!(f, "Invalid fit options: {reason}")
            }
            HWError::InvalidValidationOptions { reason } => {
                write!(f, "Invalid validation options: {reason}")
            }
            HWError::OriginOutOfRange { origin, len } => {
                write!(f, "Forecast origin {origin} outside fitted range [0, {len}).")
            }
            HWError::InvalidHorizon { origin, horizon } => {
                write!(f, "Forecast horizon {horizon} from origin {origin} overflows the time index.")
            }
            HWError::SeriesOutOfRange { series, len } => {
                write!(f, "Series index {series} outside fitted range [0, {len}).")
            }
            HWError::InsufficientData { reason } => {
                write!(f, "Insufficient data: {reason}")
            }
            HWError::OptimizationFailed { status } => {
                write!(f, "Optimizer failed with status: {status}")
            }
            HWError::Persistence { text } => {
                write!(f, "Persistence error: {text}")
            }
        }
    }
}

impl From<serde_json::Error> for HWError {
    fn from(err: serde_json::Error) -> Self {
        HWError::Persistence { text: err.to_string() }
    }
}

impl From<std::io::Error> for HWError {
    fn from(err: std::io::Error) -> Self {
        HWError::Persistence { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<HWError> for PyErr {
    fn from(err: HWError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Spot-check that the variants callers match on most often render the
    // numbers they carry.
    fn display_includes_payload_values() {
        let err = HWError::TooFewObservations { needed: 84, got: 50 };
        assert_eq!(err.to_string(), "Too few observations: need at least 84 time steps, got 50.");

        let err = HWError::ShapeMismatch { what: "time index", expected: 10, found: 9 };
        assert_eq!(err.to_string(), "Shape mismatch for time index: expected 10, found 9");

        let err = HWError::InsufficientData { reason: "no qualifying series" };
        assert_eq!(err.to_string(), "Insufficient data: no qualifying series");
    }

    #[test]
    fn serde_json_errors_map_to_persistence() {
        let err: HWError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, HWError::Persistence { .. }));
    }
}
