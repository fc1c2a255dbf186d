//! Out-of-sample validation of a fitted model against a naive baseline.
//!
//! Purpose
//! -------
//! Score a [`FittedModel`] on counts observed after its fitted range and
//! compare it with the "repeat the last observation" forecast. The result is
//! a per-step root-mean-square error for each, over the most trending active
//! series.
//!
//! Key behaviors
//! -------------
//! - Only columns strictly after the fitted range are scored.
//! - New counts are smoothed first ([`Resmooth`]) so a single burst does not
//!   dominate the error.
//! - Candidate series come from the fitted `trending_order`, filtered by the
//!   fitted total (`min_total`) and truncated to `top_n`. Exclusions are
//!   silent.
//! - Forecasts use the last fitted column as origin, `h = 1..=n_new`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The new matrix has one row per fitted series, in fitted order. When
//!   fitting used a subset, select the same rows first with
//!   `ObservationMatrix::select_rows(&fitted.provenance.series_ids)`.
//! - Errors are divided by the number of series actually scored.
use crate::forecasting::{
    core::{
        data::ObservationMatrix,
        forecasts::predict_path,
        options::{Resmooth, ValidationOptions},
    },
    errors::{HWError, HWResult},
    models::fitted::FittedModel,
};
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, ArrayView2};

/// Per-step errors of the model and of the naive baseline.
///
/// Fields
/// ------
/// - `error`, `baseline_error`: one RMSE per scored step.
/// - `times`: timestamp of every scored step.
/// - `series`: fitted-row indices that took part, in ranking order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub error: Array1<f64>,
    pub baseline_error: Array1<f64>,
    pub times: Vec<DateTime<Utc>>,
    pub series: Vec<usize>,
}

impl ValidationResult {
    pub fn steps(&self) -> usize {
        self.error.len()
    }

    /// Mean over steps of the model error.
    pub fn mean_error(&self) -> f64 {
        self.error.mean().unwrap_or(f64::NAN)
    }

    /// Mean over steps of the baseline error.
    pub fn mean_baseline_error(&self) -> f64 {
        self.baseline_error.mean().unwrap_or(f64::NAN)
    }
}

/// Validation configured by [`ValidationOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Validator {
    pub options: ValidationOptions,
}

impl Validator {
    pub fn new(options: ValidationOptions) -> Self {
        Validator { options }
    }

    pub fn validate(
        &self, fitted: &FittedModel, new_data: &ObservationMatrix,
    ) -> HWResult<ValidationResult> {
        validate(fitted, new_data, &self.options)
    }
}

/// Score `fitted` on the part of `new_data` after its fitted range.
///
/// Errors
/// ------
/// - `HWError::InsufficientData` when no column lies after the fitted range
///   or no series passes the activity threshold.
/// - `HWError::ShapeMismatch` when the row counts differ.
/// - `HWError::InvalidValidationOptions` for invalid `opts`.
pub fn validate(
    fitted: &FittedModel, new_data: &ObservationMatrix, opts: &ValidationOptions,
) -> HWResult<ValidationResult> {
    let opts = ValidationOptions::new(opts.min_total, opts.top_n, opts.resmooth, opts.clamp)?;
    let kept = new_data.after(fitted.last_time()).ok_or(HWError::InsufficientData {
        reason: "no observations after the fitted range",
    })?;
    if kept.series_count() != fitted.series_count() {
        return Err(HWError::ShapeMismatch {
            what: "new data series",
            expected: fitted.series_count(),
            found: kept.series_count(),
        });
    }

    let actual = resmooth(kept.view(), opts.resmooth, fitted.weights.alpha);
    let series = active_series(fitted, &opts);
    if series.is_empty() {
        return Err(HWError::InsufficientData { reason: "no series passes the activity threshold" });
    }

    let steps = kept.time_steps();
    let path = predict_path(&fitted.state, fitted.last_origin(), steps, opts.clamp)?;
    let baseline = &fitted.provenance.last_observation;
    let n = series.len() as f64;
    let mut error = Array1::<f64>::zeros(steps);
    let mut baseline_error = Array1::<f64>::zeros(steps);
    for k in 0..steps {
        let (mut model_sq, mut naive_sq) = (0.0, 0.0);
        for &r in &series {
            model_sq += (actual[[r, k]] - path.values[[r, k + 1]]).powi(2);
            naive_sq += (actual[[r, k]] - baseline[r]).powi(2);
        }
        error[k] = (model_sq / n).sqrt();
        baseline_error[k] = (naive_sq / n).sqrt();
    }

    Ok(ValidationResult { error, baseline_error, times: kept.times, series })
}

/// Smooth every row of `values` as configured.
///
/// The level recurrence starts at the first value of each row:
/// `s_0 = y_0`, `s_k = a·y_k + (1 − a)·s_{k−1}`.
pub fn resmooth(values: ArrayView2<f64>, how: Resmooth, fitted_alpha: f64) -> Array2<f64> {
    let Some(a) = how.alpha(fitted_alpha) else {
        return values.to_owned();
    };
    let mut out = values.to_owned();
    for mut row in out.rows_mut() {
        for k in 1..row.len() {
            row[k] = a * row[k] + (1.0 - a) * row[k - 1];
        }
    }
    out
}

fn active_series(fitted: &FittedModel, opts: &ValidationOptions) -> Vec<usize> {
    let totals = &fitted.provenance.totals;
    fitted
        .provenance
        .trending_order
        .iter()
        .copied()
        .filter(|&r| totals[r] >= opts.min_total)
        .take(opts.top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecasting::{
        core::{
            forecasts::Clamp, objective::ObjectiveConfig, options::FitOptions,
            period::SeasonalPeriod, weights::WeightTriple,
        },
        models::holt_winters::HoltWintersModel,
    };
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};
    use ndarray::{array, s};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the validation pipeline on fixed-weight models:
    // column filtering, series filtering, the RMSE formulas, resmoothing, and
    // every rejection path.
    // -------------------------------------------------------------------------

    const L: usize = 4;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    // Full 3 × 16 matrix; the model is fitted on the first 12 columns.
    fn full() -> ObservationMatrix {
        let pattern = [3.0, 1.0, 0.0, 2.0];
        let scale = [1.0, 0.0, 2.0];
        let values = Array2::from_shape_fn((3, 16), |(r, t)| scale[r] * (pattern[t % L] + 1.0));
        ObservationMatrix::with_regular_times(values, start(), Duration::hours(4)).unwrap()
    }

    fn fitted() -> FittedModel {
        let all = full();
        let prior = ObservationMatrix::new(
            all.values.slice(s![.., ..12]).to_owned(),
            all.times[..12].to_vec(),
            all.interval,
        )
        .unwrap();
        let opts = FitOptions::new(
            SeasonalPeriod::new(L).unwrap(),
            ObjectiveConfig::default(),
            Default::default(),
        );
        HoltWintersModel::new(opts)
            .fit_with_weights(&prior, WeightTriple::new(0.4, 0.1, 0.3).unwrap())
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The reported errors follow the RMSE formulas over the active series.
    //
    // Given
    // -----
    // - Three periodic series; series 1 is all zeros (total 0 < 3).
    // - Model fitted on 12 columns, validated on all 16 with raw counts.
    //
    // Expect
    // ------
    // - Four scored steps stamped with the last four timestamps.
    // - Series 1 excluded.
    // - Each error equals a direct recomputation from `predict` and the
    //   last fitted column.
    fn errors_match_direct_computation() {
        let model = fitted();
        let all = full();
        let opts = ValidationOptions { resmooth: Resmooth::None, ..ValidationOptions::default() };

        let result = validate(&model, &all, &opts).unwrap();

        assert_eq!(result.steps(), 4);
        assert_eq!(result.times, all.times[12..].to_vec());
        assert!(!result.series.contains(&1));
        assert_eq!(result.series.len(), 2);
        for k in 0..4 {
            let pred = model.predict(11, k + 1).unwrap().mapv(|v| v.max(0.0));
            let (mut m, mut b) = (0.0, 0.0);
            for &r in &result.series {
                m += (all.values[[r, 12 + k]] - pred[r]).powi(2);
                b += (all.values[[r, 12 + k]] - all.values[[r, 11]]).powi(2);
            }
            assert_abs_diff_eq!(result.error[k], (m / 2.0).sqrt(), epsilon = 1e-12);
            assert_abs_diff_eq!(result.baseline_error[k], (b / 2.0).sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // On data that keeps its seasonal pattern the model beats the naive
    // baseline.
    fn seasonal_model_beats_naive_baseline() {
        let opts = ValidationOptions { resmooth: Resmooth::None, ..ValidationOptions::default() };
        let result = Validator::new(opts).validate(&fitted(), &full()).unwrap();
        assert!(result.mean_error() < result.mean_baseline_error());
    }

    #[test]
    fn top_n_truncates_the_ranking() {
        let model = fitted().with_trending_order(vec![2, 1, 0]).unwrap();
        let opts = ValidationOptions { top_n: 1, ..ValidationOptions::default() };
        let result = validate(&model, &full(), &opts).unwrap();
        assert_eq!(result.series, vec![2]);
    }

    #[test]
    fn resmooth_applies_the_level_recurrence() {
        let y = array![[2.0, 4.0, 0.0]];
        let out = resmooth(y.view(), Resmooth::Level(0.5), 0.9);
        assert_eq!(out, array![[2.0, 3.0, 1.5]]);
        let fitted_alpha = resmooth(y.view(), Resmooth::FittedLevel, 1.0);
        assert_eq!(fitted_alpha, y);
        assert_eq!(resmooth(y.view(), Resmooth::None, 0.1), y);
    }

    #[test]
    // Purpose
    // -------
    // Each degenerate input is rejected with its own error.
    fn rejection_paths() {
        let model = fitted();
        let all = full();
        let opts = ValidationOptions::default();

        let only_prior = ObservationMatrix::new(
            all.values.slice(s![.., ..12]).to_owned(),
            all.times[..12].to_vec(),
            all.interval,
        )
        .unwrap();
        assert!(matches!(
            validate(&model, &only_prior, &opts),
            Err(HWError::InsufficientData { .. })
        ));

        let two_rows = all.select_rows(&[0, 2]).unwrap();
        assert_eq!(
            validate(&model, &two_rows, &opts).unwrap_err(),
            HWError::ShapeMismatch { what: "new data series", expected: 3, found: 2 }
        );

        let strict = ValidationOptions { min_total: 1e9, ..opts };
        assert!(matches!(validate(&model, &all, &strict), Err(HWError::InsufficientData { .. })));

        let bad = ValidationOptions { top_n: 0, clamp: Clamp::None, ..opts };
        assert!(matches!(
            validate(&model, &all, &bad),
            Err(HWError::InvalidValidationOptions { .. })
        ));
    }
}
