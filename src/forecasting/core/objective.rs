//! Forecast-error objective used to calibrate the smoothing weights.
//!
//! Purpose
//! -------
//! Turn a weight triple into a single non-negative score: smooth the data,
//! then for every forecast origin that still has a target inside the matrix,
//! compare the `m`-step-ahead additive forecast with the observed value.
//! This is the quantity the hyperparameter search minimizes.
//!
//! Key behaviors
//! -------------
//! - Origins run over `j in 0..time_steps − holdout`; the forecast is
//!   `s[:, j] + m·b[:, j] + c[:, (j + m) mod L]`.
//! - The target column depends on [`TargetAlignment`]:
//!   `Trailing` scores against `Y[:, j + m − 1]` (the calibration target the
//!   production fit has always used), `Horizon` against the true `m`-step
//!   value `Y[:, j + m]`.
//! - Residual vectors are aggregated per [`Aggregation`]: `JointSum` squares
//!   the sum across series, `PerSeries` sums the per-series squares.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`ObjectiveConfig::check`] guarantees that every target index falls
//!   inside the matrix and that at least one origin exists.
//! - The score is finite for finite data and weights in `[0, 1]`.
//!
//! Conventions
//! -----------
//! - `horizon` is `m`; `holdout` is the number of trailing columns that never
//!   act as an origin (the production setting is `m = 7`, `holdout = 6`).
use crate::forecasting::{
    core::{
        period::SeasonalPeriod,
        smoother::{SmootherState, smooth},
        weights::WeightTriple,
    },
    errors::{HWError, HWResult},
};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Which observed column an origin's forecast is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetAlignment {
    /// `Y[:, j + m − 1]`.
    #[default]
    Trailing,
    /// `Y[:, j + m]`.
    Horizon,
}

impl TargetAlignment {
    fn offset(self, horizon: usize) -> usize {
        match self {
            TargetAlignment::Trailing => horizon - 1,
            TargetAlignment::Horizon => horizon,
        }
    }
}

/// How residuals of one origin are folded into the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    /// `(Σ_series r)²`: series errors may cancel before squaring.
    #[default]
    JointSum,
    /// `Σ_series r²`.
    PerSeries,
}

/// Horizon, holdout and scoring policy of the objective.
///
/// Fields
/// ------
/// - `horizon`: forecast distance `m` (≥ 1).
/// - `holdout`: trailing columns excluded as origins.
/// - `alignment`: [`TargetAlignment`].
/// - `aggregation`: [`Aggregation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveConfig {
    pub horizon: usize,
    pub holdout: usize,
    pub alignment: TargetAlignment,
    pub aggregation: Aggregation,
}

impl ObjectiveConfig {
    /// Errors
    /// ------
    /// - `HWError::InvalidObjectiveConfig` if `horizon == 0` or the holdout
    ///   is too short for the target column of the last origin.
    pub fn new(
        horizon: usize, holdout: usize, alignment: TargetAlignment, aggregation: Aggregation,
    ) -> HWResult<Self> {
        if horizon == 0 {
            return Err(HWError::InvalidObjectiveConfig {
                horizon,
                holdout,
                reason: "horizon must be at least 1",
            });
        }
        if holdout < alignment.offset(horizon) {
            return Err(HWError::InvalidObjectiveConfig {
                horizon,
                holdout,
                reason: "holdout is shorter than the target offset",
            });
        }
        Ok(ObjectiveConfig { horizon, holdout, alignment, aggregation })
    }

    /// Check the configuration against a concrete history length.
    ///
    /// Errors
    /// ------
    /// - `HWError::InvalidObjectiveConfig` if the config itself is invalid
    ///   (e.g. built by struct literal or deserialized) or if
    ///   `holdout >= time_steps`.
    pub fn check(&self, time_steps: usize) -> HWResult<()> {
        ObjectiveConfig::new(self.horizon, self.holdout, self.alignment, self.aggregation)?;
        if self.holdout >= time_steps {
            return Err(HWError::InvalidObjectiveConfig {
                horizon: self.horizon,
                holdout: self.holdout,
                reason: "holdout leaves no forecast origin",
            });
        }
        Ok(())
    }

    /// Number of scored origins for a history of `time_steps` columns.
    pub fn origins(&self, time_steps: usize) -> usize {
        time_steps.saturating_sub(self.holdout)
    }
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        ObjectiveConfig {
            horizon: 7,
            holdout: 6,
            alignment: TargetAlignment::Trailing,
            aggregation: Aggregation::JointSum,
        }
    }
}

/// Smooth `y` with `weights` and score the result.
///
/// Parameters
/// ----------
/// - `y`: observations (series × time steps).
/// - `period`: seasonal period `L`.
/// - `weights`: candidate weights.
/// - `cfg`: [`ObjectiveConfig`].
///
/// Returns
/// -------
/// `HWResult<f64>`: the non-negative score.
///
/// Errors
/// ------
/// - Any error of [`smooth`].
/// - `HWError::InvalidObjectiveConfig` from [`ObjectiveConfig::check`].
pub fn forecast_error(
    y: ArrayView2<f64>, period: SeasonalPeriod, weights: &WeightTriple, cfg: &ObjectiveConfig,
) -> HWResult<f64> {
    cfg.check(y.ncols())?;
    let state = smooth(y, period, weights)?;
    Ok(score_state(y, &state, cfg))
}

/// Score an existing state against the data it was built from.
///
/// Notes
/// -----
/// - Assumes `cfg.check(y.ncols())` passed and `state` came from `y`.
pub fn score_state(y: ArrayView2<f64>, state: &SmootherState, cfg: &ObjectiveConfig) -> f64 {
    let m = cfg.horizon;
    let offset = cfg.alignment.offset(m);
    let period = state.period;

    let mut total = 0.0;
    for j in 0..cfg.origins(y.ncols()) {
        let season = period.offset(j + m);
        let residuals = (0..y.nrows()).map(|r| {
            let forecast = state.level[[r, j]]
                + m as f64 * state.trend[[r, j]]
                + state.seasonal[[r, season]];
            y[[r, j + offset]] - forecast
        });
        total += match cfg.aggregation {
            Aggregation::JointSum => residuals.sum::<f64>().powi(2),
            Aggregation::PerSeries => residuals.map(|r| r * r).sum::<f64>(),
        };
    }
    total
}
