//! Holt-Winters model: weight calibration by bounded global search.
//!
//! This module wires the additive smoother to the `Objective` trait of the
//! search layer. The search runs over the unit cube `[0, 1]^3` of
//! `(alpha, beta, gamma)`; each candidate is scored by smoothing the fitted
//! series and measuring the `m`-step forecast error. After the search a
//! final smoother pass at the best weights produces the state the
//! [`FittedModel`] retains.
//!
//! Key ideas:
//! - [`HoltWintersObjective`] is stateless and `Sync`, so a whole
//!   differential-evolution generation can be scored in parallel over the
//!   same borrowed matrix.
//! - Preconditions (history length, objective configuration) are checked
//!   once by `Objective::check` before any candidate is evaluated.
//! - Series selection and the validation ranking are decided here and
//!   recorded in the fitted provenance.
use crate::{
    forecasting::{
        core::{
            data::ObservationMatrix,
            objective::{ObjectiveConfig, forecast_error},
            options::FitOptions,
            period::SeasonalPeriod,
            smoother::smooth,
            weights::WeightTriple,
        },
        errors::HWResult,
        models::fitted::{FittedModel, Provenance},
    },
    optimization::{
        errors::{OptError, OptResult},
        global_search::{Bounds, Minimizer, Objective, SearchOutcome, Theta},
    },
};
use ndarray::Array2;

/// Forecast-error objective over weight triples.
///
/// `Data` is the observation matrix being fitted (series × time steps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoltWintersObjective {
    pub period: SeasonalPeriod,
    pub config: ObjectiveConfig,
}

impl Objective for HoltWintersObjective {
    type Data = Array2<f64>;

    /// Forecast error of the smoother at `x = [alpha, beta, gamma]`.
    ///
    /// # Errors
    /// - `OptError::Model` wrapping any smoother or configuration error.
    fn value(&self, x: &Theta, data: &Self::Data) -> OptResult<f64> {
        let weights = WeightTriple::from_slice(&x.to_vec())?;
        Ok(forecast_error(data.view(), self.period, &weights, &self.config)?)
    }

    /// Check the point dimension, the history length and the objective
    /// configuration once, before the search starts.
    fn check(&self, x: &Theta, data: &Self::Data) -> OptResult<()> {
        if x.len() != WeightTriple::DIM {
            return Err(OptError::StartDimMismatch { expected: WeightTriple::DIM, found: x.len() });
        }
        self.period.check_history(data.ncols())?;
        self.config.check(data.ncols())?;
        Ok(())
    }
}

/// Holt-Winters model configured by [`FitOptions`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoltWintersModel {
    pub options: FitOptions,
}

impl HoltWintersModel {
    pub fn new(options: FitOptions) -> Self {
        HoltWintersModel { options }
    }

    pub fn objective(&self) -> HoltWintersObjective {
        HoltWintersObjective { period: self.options.period, config: self.options.objective }
    }

    /// Calibrate the weights on `data` and keep the resulting state.
    ///
    /// ## Steps
    /// 1. Select the series taking part (`FitOptions::series_limit`).
    /// 2. Minimize the forecast error over `[0, 1]^3` with the configured
    ///    search.
    /// 3. Smooth the selected series once more at the best weights.
    /// 4. Record provenance: times, totals, last column, the ranking used by
    ///    validation and the original row of every fitted series.
    ///
    /// ## Errors
    /// - `HWError::TooFewObservations` / `HWError::InvalidObjectiveConfig`
    ///   when the history cannot support the objective.
    /// - `HWError::OptimizationFailed` for search failures (bad options,
    ///   non-finite scores).
    ///
    /// ## Notes
    /// - Hitting the iteration or time budget is not an error; the model is
    ///   returned with `converged = false`.
    pub fn fit(&self, data: &ObservationMatrix) -> HWResult<FittedModel> {
        let series_ids = self.options.select_series(data.totals().view());
        let subset = data.select_rows(&series_ids)?;
        self.options.period.check_history(subset.time_steps())?;
        self.options.objective.check(subset.time_steps())?;
        let bounds = Bounds::unit_cube(WeightTriple::DIM)?;
        let outcome = self.options.search.minimize(&self.objective(), &subset.values, &bounds)?;
        let weights = WeightTriple::from_slice(&outcome.x_hat.to_vec())?;
        self.assemble(subset, series_ids, weights, &outcome)
    }

    /// Build a model at fixed weights, without searching.
    ///
    /// Every series is used; the reported objective is the forecast error at
    /// `weights` and the diagnostics record that no search ran.
    pub fn fit_with_weights(
        &self, data: &ObservationMatrix, weights: WeightTriple,
    ) -> HWResult<FittedModel> {
        let objective = self.objective();
        let value = forecast_error(data.view(), objective.period, &weights, &objective.config)?;
        let outcome = SearchOutcome {
            x_hat: weights.to_array(),
            value,
            converged: true,
            status: "Fixed weights".to_string(),
            iterations: 0,
            fn_evals: Default::default(),
        };
        let series_ids = (0..data.series_count()).collect();
        self.assemble(data.clone(), series_ids, weights, &outcome)
    }

    fn assemble(
        &self, subset: ObservationMatrix, series_ids: Vec<usize>, weights: WeightTriple,
        outcome: &SearchOutcome,
    ) -> HWResult<FittedModel> {
        let state = smooth(subset.view(), self.options.period, &weights)?;
        let totals = subset.totals();
        let last = subset.time_steps() - 1;
        let trending_order =
            self.options.trend_ranking.rank(state.trend.column(last), totals.view());
        let ObservationMatrix { values, times, interval } = subset;
        let model = FittedModel {
            weights,
            state,
            objective_value: outcome.value,
            converged: outcome.converged,
            status: outcome.status.clone(),
            iterations: outcome.iterations,
            cost_evals: outcome.cost_evals(),
            provenance: Provenance {
                times,
                interval,
                totals,
                trending_order,
                last_observation: values.column(last).to_owned(),
                series_ids,
            },
        };
        model.validate()?;
        Ok(model)
    }
}
