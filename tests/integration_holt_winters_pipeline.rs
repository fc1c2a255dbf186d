//! Integration tests for the Holt-Winters forecasting pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end workflow: from a validated count matrix, through
//!   weight calibration by bounded search, to forecasting, persistence and
//!   out-of-sample validation against the naive baseline.
//! - Exercise realistic configurations (both search strategies, series
//!   subsets, time budgets) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `forecasting::core`: `ObservationMatrix`, `SeasonalPeriod`,
//!   `ObjectiveConfig`, `FitOptions`, `ValidationOptions`.
//! - `forecasting::models`: `HoltWintersModel::fit`, `FittedModel`
//!   forecasting and persistence, `Validator`.
//! - `optimization::global_search`: differential evolution and Nelder–Mead
//!   through `SearchOptions`.
//!
//! Exclusions
//! ----------
//! - Fine-grained checks of the recursion, objective and solver internals;
//!   these are covered by unit tests.
//! - Python bindings.
use chrono::{DateTime, Duration, TimeZone, Utc};
use ndarray::{Array2, s};
use topic_forecast::{
    forecasting::{
        core::{
            data::ObservationMatrix,
            forecasts::Clamp,
            objective::{Aggregation, ObjectiveConfig, TargetAlignment, forecast_error},
            options::{FitOptions, Resmooth, SeriesOrder, ValidationOptions},
            period::SeasonalPeriod,
            weights::WeightTriple,
        },
        errors::HWError,
        models::{fitted::FittedModel, holt_winters::HoltWintersModel, backtest::Validator},
    },
    optimization::global_search::{DEOptions, SearchOptions, SearchStrategy},
};

const L: usize = 6;
const BASE: [f64; L] = [2.0, 4.0, 0.0, 3.0, 1.0, 2.0];

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap()
}

/// Purpose
/// -------
/// Build `base[t mod L]·(1 + r) + slope·r·t` for `rows` series over
/// `steps` four-hour buckets.
///
/// Notes
/// -----
/// - `BASE[0]` equals the mean of `BASE`, so with `slope = 0` the smoother's
///   initial level is exact and the series is reproduced without error.
fn counts(rows: usize, steps: usize, slope: f64) -> ObservationMatrix {
    let values = Array2::from_shape_fn((rows, steps), |(r, t)| {
        BASE[t % L] * (1.0 + r as f64) + slope * r as f64 * t as f64
    });
    ObservationMatrix::with_regular_times(values, start(), Duration::hours(4))
        .expect("regular grid should be valid")
}

/// Split off the first `n` columns as the fitted history.
fn prefix(data: &ObservationMatrix, n: usize) -> ObservationMatrix {
    ObservationMatrix::new(
        data.values.slice(s![.., ..n]).to_owned(),
        data.times[..n].to_vec(),
        data.interval,
    )
    .expect("prefix of a valid matrix is valid")
}

/// Purpose
/// -------
/// Seeded, reasonably quick search settings for the given strategy.
fn fit_options(strategy: SearchStrategy, objective: ObjectiveConfig) -> FitOptions {
    let search = SearchOptions::new(strategy, 300, None, Some(2024), false)
        .expect("valid search options")
        .with_de(DEOptions { popsize: 10, ..DEOptions::default() });
    FitOptions::new(SeasonalPeriod::new(L).expect("L > 0"), objective, search)
}

fn horizon_objective() -> ObjectiveConfig {
    ObjectiveConfig::new(7, 7, TargetAlignment::Horizon, Aggregation::PerSeries)
        .expect("holdout covers the horizon")
}

#[test]
// Purpose
// -------
// Full pipeline on periodic data: fit, forecast, validate.
//
// Given
// -----
// - 4 trend-free periodic series, 8 cycles of history plus one new cycle.
// - Horizon-aligned per-series objective, seeded differential evolution.
//
// Expect
// ------
// - A near-zero objective, forecasts stamped after the history.
// - Validation on raw counts: model error near zero on every step and
//   strictly below the naive baseline on average.
fn periodic_pipeline_beats_naive_baseline() {
    let all = counts(4, 9 * L, 0.0);
    let history = prefix(&all, 8 * L);

    let fitted = HoltWintersModel::new(fit_options(
        SearchStrategy::DifferentialEvolution,
        horizon_objective(),
    ))
    .fit(&history)
    .expect("fit should succeed");

    assert!(fitted.objective_value < 1e-3, "objective = {}", fitted.objective_value);

    let path = fitted.forecast(L, Clamp::NonNegative).expect("forecast from last column");
    let times = path.times.expect("forecasts are time-stamped");
    assert_eq!(times[1], history.last_time() + Duration::hours(4));
    assert_eq!(path.values.dim(), (4, L + 1));

    let opts = ValidationOptions::new(3.0, 25, Resmooth::None, Clamp::NonNegative)
        .expect("valid validation options");
    let result = Validator::new(opts).validate(&fitted, &all).expect("validation runs");

    assert_eq!(result.steps(), L);
    assert_eq!(result.times, all.times[8 * L..].to_vec());
    assert_eq!(result.series.len(), 4);
    assert!(result.error.iter().all(|&e| e < 1e-2), "{:?}", result.error);
    assert!(result.mean_error() < result.mean_baseline_error());
}

#[test]
// Purpose
// -------
// The concrete two-series trend scenario: the search keeps weights in the
// box and improves on the default local-search start.
//
// Given
// -----
// - Y = 2 series × 3L steps, `base[offset]·(1 + r) + 0.2·r·t`, L = 6.
// - Default objective (m = 7, holdout 6), both strategies.
//
// Expect
// ------
// - Weights in `[0, 1]^3`.
// - Objective no worse than at `(0.2, 0.2, 0.2)`. A near-zero objective is
//   out of reach here: with only three cycles the cycle-mean seasonal
//   initialization absorbs part of the trend, and the trailing target sits
//   one step off the forecast horizon, so the best weights still leave an
//   error in the hundreds.
fn trend_scenario_respects_box_and_improves_start() {
    let data = counts(2, 3 * L, 0.2);
    let start_weights = WeightTriple::new(0.2, 0.2, 0.2).expect("valid weights");
    let period = SeasonalPeriod::new(L).expect("L > 0");
    let at_start = forecast_error(data.view(), period, &start_weights, &ObjectiveConfig::default())
        .expect("objective evaluates");

    for strategy in [SearchStrategy::DifferentialEvolution, SearchStrategy::NelderMead] {
        let fitted = HoltWintersModel::new(fit_options(strategy, ObjectiveConfig::default()))
            .fit(&data)
            .expect("fit should succeed");

        let w = fitted.weights;
        for v in [w.alpha, w.beta, w.gamma] {
            assert!((0.0..=1.0).contains(&v), "{strategy:?}: {w:?}");
        }
        assert!(
            fitted.objective_value <= at_start * (1.0 + 1e-9) + 1e-12,
            "{strategy:?}: {} > {at_start}",
            fitted.objective_value
        );
    }
}

#[test]
// Purpose
// -------
// A model reloaded from disk forecasts exactly like the in-memory one and
// validates to the same result.
fn persisted_model_predicts_identically() {
    let all = counts(3, 7 * L, 0.05);
    let history = prefix(&all, 6 * L);
    let fitted = HoltWintersModel::new(fit_options(
        SearchStrategy::NelderMead,
        ObjectiveConfig::default(),
    ))
    .fit(&history)
    .expect("fit should succeed");

    let path = std::env::temp_dir().join(format!("hw_pipeline_{}.json", std::process::id()));
    fitted.save(&path).expect("save");
    let reloaded = FittedModel::load(&path).expect("load");
    let _ = std::fs::remove_file(&path);

    for (origin, h) in [(0, 1), (10, 7), (6 * L - 1, 3), (6 * L - 1, 12)] {
        assert_eq!(
            reloaded.predict(origin, h).expect("predict"),
            fitted.predict(origin, h).expect("predict")
        );
    }
    let validator = Validator::default();
    assert_eq!(
        validator.validate(&reloaded, &all).expect("validate"),
        validator.validate(&fitted, &all).expect("validate")
    );
}

#[test]
// Purpose
// -------
// Fitting a subset of series and validating on the matching rows of the
// full matrix.
//
// Given
// -----
// - 5 series whose totals grow with the row; fit limited to the 2 lowest.
//
// Expect
// ------
// - `series_ids = [0, 1]`; validation on the full matrix is a shape error
//   until the same rows are selected.
fn subset_fit_validates_on_selected_rows() {
    let all = counts(5, 7 * L, 0.1);
    let history = prefix(&all, 6 * L);
    let opts = fit_options(SearchStrategy::NelderMead, ObjectiveConfig::default())
        .with_series_limit(2, SeriesOrder::Ascending)
        .expect("positive limit");

    let fitted = HoltWintersModel::new(opts).fit(&history).expect("fit should succeed");
    assert_eq!(fitted.provenance.series_ids, vec![0, 1]);

    let validator = Validator::default();
    assert!(matches!(
        validator.validate(&fitted, &all),
        Err(HWError::ShapeMismatch { expected: 2, found: 5, .. })
    ));
    let rows = all.select_rows(&fitted.provenance.series_ids).expect("rows exist");
    let result = validator.validate(&fitted, &rows).expect("validation runs");
    assert_eq!(result.steps(), L);
}

#[test]
// Purpose
// -------
// Validation refuses to return an empty result when no series is active.
fn inactive_series_give_insufficient_data() {
    let all = counts(2, 7 * L, 0.0);
    let history = prefix(&all, 6 * L);
    let fitted = HoltWintersModel::new(fit_options(
        SearchStrategy::NelderMead,
        ObjectiveConfig::default(),
    ))
    .fit_with_weights(&history, WeightTriple::new(0.3, 0.1, 0.1).expect("valid weights"))
    .expect("fixed-weight model");

    let strict = ValidationOptions { min_total: 1e6, ..ValidationOptions::default() };
    assert!(matches!(
        Validator::new(strict).validate(&fitted, &all),
        Err(HWError::InsufficientData { .. })
    ));
}

#[test]
// Purpose
// -------
// A tiny time budget still yields a usable, non-converged model.
fn time_budget_returns_best_so_far() {
    let data = counts(3, 6 * L, 0.1);
    let mut opts = fit_options(SearchStrategy::DifferentialEvolution, ObjectiveConfig::default());
    opts.search.time_budget = Some(std::time::Duration::from_nanos(1));

    let fitted = HoltWintersModel::new(opts).fit(&data).expect("fit should succeed");

    assert!(!fitted.converged);
    let w = fitted.weights;
    assert!([w.alpha, w.beta, w.gamma].iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(fitted.predict(6 * L - 1, 1).expect("predict").iter().all(|v| v.is_finite()));
}
