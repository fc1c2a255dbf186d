//! Fitted Holt-Winters model: weights, retained state, fit diagnostics and
//! provenance, with JSON persistence.
//!
//! A [`FittedModel`] is a self-contained snapshot. Everything forecasting and
//! validation need lives inside it, so a model fitted in one process can be
//! saved, reloaded elsewhere and produce identical forecasts.
use crate::forecasting::{
    core::{
        forecasts::{Clamp, ForecastResult, one_step_ahead, predict, predict_path},
        smoother::SmootherState,
        weights::WeightTriple,
    },
    errors::{HWError, HWResult},
};
use chrono::{DateTime, Duration, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Metadata about the data a model was fitted on.
///
/// Fields
/// ------
/// - `times`: timestamp of every fitted column.
/// - `interval`: sampling interval (persisted as whole milliseconds).
/// - `totals`: per-series total count over the fitted range.
/// - `trending_order`: series ranking consumed by validation, most
///   interesting first.
/// - `last_observation`: final observed column, used as the naive baseline.
/// - `series_ids`: row of each fitted series in the caller's original matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub times: Vec<DateTime<Utc>>,
    #[serde(with = "interval_millis")]
    pub interval: Duration,
    pub totals: Array1<f64>,
    pub trending_order: Vec<usize>,
    pub last_observation: Array1<f64>,
    pub series_ids: Vec<usize>,
}

/// Result of fitting the Holt-Winters weights.
///
/// Fields
/// ------
/// - `weights`: best `(alpha, beta, gamma)`.
/// - `state`: smoother state at `weights` over the fitted range.
/// - `objective_value`: forecast error at `weights`.
/// - `converged`, `status`, `iterations`, `cost_evals`: search diagnostics.
///   A model with `converged = false` is still usable; it carries the best
///   weights found within the budget.
/// - `provenance`: [`Provenance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub weights: WeightTriple,
    pub state: SmootherState,
    pub objective_value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub cost_evals: u64,
    pub provenance: Provenance,
}

impl FittedModel {
    pub fn series_count(&self) -> usize {
        self.state.series_count()
    }

    pub fn time_steps(&self) -> usize {
        self.state.time_steps()
    }

    /// Index of the last fitted column, the default forecast origin.
    pub fn last_origin(&self) -> usize {
        self.time_steps() - 1
    }

    pub fn last_time(&self) -> DateTime<Utc> {
        self.provenance.times[self.provenance.times.len() - 1]
    }

    /// Check every internal invariant.
    ///
    /// Errors
    /// ------
    /// - `HWError::InvalidWeight` for out-of-range weights.
    /// - `HWError::ShapeMismatch` when the state and the provenance disagree.
    /// - `HWError::TooFewObservations` when the state holds fewer than two
    ///   seasonal cycles.
    /// - `HWError::UnorderedTimes` / `HWError::InvalidInterval` for a broken
    ///   time index.
    /// - `HWError::SeriesOutOfRange` for a bad ranking entry.
    pub fn validate(&self) -> HWResult<()> {
        self.weights.validate()?;
        self.state.validate()?;
        self.state.period.check_history(self.time_steps())?;
        let rows = self.series_count();
        let p = &self.provenance;
        let lengths = [
            ("provenance times", self.time_steps(), p.times.len()),
            ("provenance totals", rows, p.totals.len()),
            ("last observation", rows, p.last_observation.len()),
            ("series ids", rows, p.series_ids.len()),
        ];
        for (what, expected, found) in lengths {
            if expected != found {
                return Err(HWError::ShapeMismatch { what, expected, found });
            }
        }
        if p.interval <= Duration::zero() {
            return Err(HWError::InvalidInterval { reason: "interval must be positive" });
        }
        if let Some(index) = p.times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(HWError::UnorderedTimes { index: index + 1 });
        }
        check_ranking(&p.trending_order, rows)
    }

    /// Replace the ranking used by validation.
    ///
    /// Errors
    /// ------
    /// - `HWError::SeriesOutOfRange` for an index `>= series_count()`.
    /// - `HWError::InvalidValidationOptions` for a repeated index.
    pub fn with_trending_order(mut self, order: Vec<usize>) -> HWResult<Self> {
        check_ranking(&order, self.series_count())?;
        self.provenance.trending_order = order;
        Ok(self)
    }

    /// Forecast every series `periods_ahead` steps after `origin`.
    pub fn predict(&self, origin: usize, periods_ahead: usize) -> HWResult<Array1<f64>> {
        predict(&self.state, origin, periods_ahead)
    }

    /// Path `h = 0..=max_horizon` from the last fitted column, time-stamped.
    pub fn forecast(&self, max_horizon: usize, clamp: Clamp) -> HWResult<ForecastResult> {
        self.forecast_from(self.last_origin(), max_horizon, clamp)
    }

    /// Path `h = 0..=max_horizon` from `origin`, time-stamped from the
    /// origin's own timestamp.
    ///
    /// Errors
    /// ------
    /// - `HWError::OriginOutOfRange` if `origin >= time_steps()`.
    pub fn forecast_from(
        &self, origin: usize, max_horizon: usize, clamp: Clamp,
    ) -> HWResult<ForecastResult> {
        let path = predict_path(&self.state, origin, max_horizon, clamp)?;
        path.with_times(self.provenance.times[origin], self.provenance.interval)
    }

    /// In-sample one-step-ahead predictions for one series.
    pub fn one_step_ahead(&self, series: usize) -> HWResult<Array1<f64>> {
        one_step_ahead(&self.state, series)
    }

    // ---- Persistence ----

    pub fn to_json(&self) -> HWResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and re-validate a snapshot.
    ///
    /// Errors
    /// ------
    /// - `HWError::Persistence` for malformed JSON.
    /// - Any error of [`FittedModel::validate`].
    pub fn from_json(text: &str) -> HWResult<Self> {
        let model: FittedModel = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> HWResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> HWResult<Self> {
        let text = fs::read_to_string(path)?;
        FittedModel::from_json(&text)
    }
}

fn check_ranking(order: &[usize], len: usize) -> HWResult<()> {
    let mut seen = vec![false; len];
    for &series in order {
        if series >= len {
            return Err(HWError::SeriesOutOfRange { series, len });
        }
        if seen[series] {
            return Err(HWError::InvalidValidationOptions {
                reason: "trending order repeats a series",
            });
        }
        seen[series] = true;
    }
    Ok(())
}

mod interval_millis {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(interval.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        Duration::try_milliseconds(millis)
            .ok_or_else(|| serde::de::Error::custom("interval out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecasting::core::{
        data::regular_times, period::SeasonalPeriod, smoother::smooth,
    };
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover snapshot validation, ranking replacement, forecasting
    // through the model and the JSON round trip. Fitting is covered in
    // `holt_winters`.
    // -------------------------------------------------------------------------

    fn model() -> FittedModel {
        let y = Array2::from_shape_fn((3, 12), |(r, t)| {
            [4.0, 1.0, 0.0, 2.0][t % 4] + r as f64 + 0.25 * t as f64
        });
        let period = SeasonalPeriod::new(4).unwrap();
        let weights = WeightTriple::new(0.3, 0.1, 0.2).unwrap();
        let state = smooth(y.view(), period, &weights).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let interval = Duration::hours(4);
        FittedModel {
            weights,
            state,
            objective_value: 1.5,
            converged: true,
            status: "Solver converged".to_string(),
            iterations: 10,
            cost_evals: 450,
            provenance: Provenance {
                times: regular_times(start, interval, 12).unwrap(),
                interval,
                totals: y.sum_axis(ndarray::Axis(1)),
                trending_order: vec![2, 0, 1],
                last_observation: y.column(11).to_owned(),
                series_ids: vec![4, 7, 9],
            },
        }
    }

    #[test]
    // Purpose
    // -------
    // A reloaded snapshot is identical and forecasts bit-for-bit the same.
    //
    // Given
    // -----
    // - A model smoothed on a 3 × 12 trending periodic matrix.
    //
    // Expect
    // ------
    // - `from_json(to_json(m)) == m` and equal predictions at every origin.
    fn json_round_trip_preserves_forecasts() {
        let m = model();
        let back = FittedModel::from_json(&m.to_json().unwrap()).unwrap();

        assert_eq!(back, m);
        for origin in [0, 5, 11] {
            assert_eq!(back.predict(origin, 3).unwrap(), m.predict(origin, 3).unwrap());
        }
    }

    #[test]
    fn save_and_load_through_a_file() {
        let m = model();
        let path = std::env::temp_dir().join(format!("hw_fitted_{}.json", std::process::id()));
        m.save(&path).unwrap();
        let back = FittedModel::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, m);
    }

    #[test]
    // Purpose
    // -------
    // Decoding rejects snapshots whose parts disagree.
    fn from_json_revalidates() {
        let mut m = model();
        m.provenance.totals = Array1::zeros(2);
        let err = FittedModel::from_json(&m.to_json().unwrap()).unwrap_err();
        assert!(matches!(err, HWError::ShapeMismatch { what: "provenance totals", .. }));

        assert!(matches!(
            FittedModel::from_json("{\"weights\": 1}"),
            Err(HWError::Persistence { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A snapshot cut shorter than its seasonal period is rejected on load
    // instead of failing later inside `predict`.
    //
    // Given
    // -----
    // - The 3 × 12 model (L = 4) with state, times and last observation
    //   consistently truncated to the first 3 columns.
    //
    // Expect
    // ------
    // - `TooFewObservations { needed: 8, got: 3 }` from `from_json`.
    fn from_json_rejects_state_shorter_than_history_floor() {
        let mut m = model();
        m.state.level = m.state.level.slice(ndarray::s![.., ..3]).to_owned();
        m.state.trend = m.state.trend.slice(ndarray::s![.., ..3]).to_owned();
        m.state.seasonal = m.state.seasonal.slice(ndarray::s![.., ..3]).to_owned();
        m.provenance.times.truncate(3);
        m.provenance.last_observation = m.state.level.column(2).to_owned();

        let err = FittedModel::from_json(&m.to_json().unwrap()).unwrap_err();
        assert_eq!(err, HWError::TooFewObservations { needed: 8, got: 3 });
    }

    #[test]
    fn trending_order_is_validated() {
        assert_eq!(model().with_trending_order(vec![1]).unwrap().provenance.trending_order, vec![1]);
        assert_eq!(
            model().with_trending_order(vec![0, 3]).unwrap_err(),
            HWError::SeriesOutOfRange { series: 3, len: 3 }
        );
        assert!(model().with_trending_order(vec![1, 1]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The forecast path starts at the last fitted column and is stamped one
    // interval per step.
    fn forecast_is_time_stamped_from_the_origin() {
        let m = model();
        let path = m.forecast(3, Clamp::None).unwrap();
        let times = path.times.clone().unwrap();

        assert_eq!(path.origin, 11);
        assert_eq!(times[0], m.last_time());
        assert_eq!(times[3], m.last_time() + Duration::hours(12));
        for h in 0..=3 {
            let direct = m.predict(11, h).unwrap();
            for r in 0..3 {
                assert_abs_diff_eq!(path.values[[r, h]], direct[r], epsilon = 1e-12);
            }
        }
        assert!(matches!(m.forecast_from(12, 1, Clamp::None), Err(HWError::OriginOutOfRange { .. })));
    }
}
