//! Point forecasts from a retained smoother state.
//!
//! Purpose
//! -------
//! Read a [`SmootherState`] and produce additive Holt-Winters forecasts
//! `s[:, origin] + h·b[:, origin] + c[:, (origin + h) mod L]` for one or many
//! horizons, one or all series. Nothing here mutates the state.
//!
//! Key behaviors
//! -------------
//! - [`predict`]: all series, one horizon.
//! - [`predict_series`]: one series, one horizon.
//! - [`predict_path`]: all series, horizons `0..=max_horizon`, returned as a
//!   [`ForecastResult`]; an optional [`Clamp`] is applied to the output only.
//! - [`one_step_ahead`]: in-sample one-step predictions for one series,
//!   clamped at zero, for eyeballing how well the fit tracks the data.
//!
//! Invariants & assumptions
//! ------------------------
//! - `origin` must be in `[0, time_steps)`; otherwise
//!   `HWError::OriginOutOfRange`.
//! - The seasonal term is read from column `(origin + h) mod L` of the
//!   retained seasonal matrix, i.e. from the first stored cycle, matching the
//!   index the objective scores during calibration.
//! - `h = 0` returns the level plus the seasonal value at the origin's offset.
use crate::forecasting::{
    core::smoother::SmootherState,
    errors::{HWError, HWResult},
};
use chrono::{DateTime, Duration, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Post-processing applied to forecasts at the output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Clamp {
    /// Raw additive forecasts.
    #[default]
    None,
    /// Negative forecasts are raised to 0 (counts cannot go negative).
    NonNegative,
}

impl Clamp {
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Clamp::None => value,
            Clamp::NonNegative => value.max(0.0),
        }
    }
}

/// Forecasts for every series over a set of horizons.
///
/// Fields
/// ------
/// - `origin`: time index the forecasts start from.
/// - `horizons`: steps ahead, one per column of `values`.
/// - `values`: `Array2<f64>` (series × horizons).
/// - `times`: optional calendar time of each column
///   (`origin time + h·interval`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub origin: usize,
    pub horizons: Vec<usize>,
    pub values: Array2<f64>,
    pub times: Option<Vec<DateTime<Utc>>>,
}

impl ForecastResult {
    /// Stamp each horizon with `origin_time + h·interval`.
    ///
    /// Errors
    /// ------
    /// - `HWError::InvalidInterval` if a timestamp overflows.
    pub fn with_times(mut self, origin_time: DateTime<Utc>, interval: Duration) -> HWResult<Self> {
        let times = self
            .horizons
            .iter()
            .map(|&h| {
                i64::try_from(h)
                    .ok()
                    .and_then(|h| interval.num_milliseconds().checked_mul(h))
                    .and_then(|ms| origin_time.checked_add_signed(Duration::milliseconds(ms)))
                    .ok_or(HWError::InvalidInterval { reason: "forecast time overflows" })
            })
            .collect::<HWResult<Vec<_>>>()?;
        self.times = Some(times);
        Ok(self)
    }
}

fn check_origin(state: &SmootherState, origin: usize) -> HWResult<()> {
    let len = state.time_steps();
    if origin >= len {
        return Err(HWError::OriginOutOfRange { origin, len });
    }
    Ok(())
}

fn check_horizon(origin: usize, horizon: usize) -> HWResult<()> {
    match origin.checked_add(horizon).and_then(|end| end.checked_add(1)) {
        Some(_) => Ok(()),
        None => Err(HWError::InvalidHorizon { origin, horizon }),
    }
}

#[inline]
fn point(state: &SmootherState, series: usize, origin: usize, h: usize) -> f64 {
    let season = state.period.offset(origin + h);
    state.level[[series, origin]]
        + h as f64 * state.trend[[series, origin]]
        + state.seasonal[[series, season]]
}

/// Forecast every series `periods_ahead` steps after `origin`.
///
/// Errors
/// ------
/// - `HWError::OriginOutOfRange` if `origin >= time_steps`.
/// - `HWError::InvalidHorizon` if `origin + periods_ahead` overflows.
pub fn predict(state: &SmootherState, origin: usize, periods_ahead: usize) -> HWResult<Array1<f64>> {
    check_origin(state, origin)?;
    check_horizon(origin, periods_ahead)?;
    Ok(Array1::from_shape_fn(state.series_count(), |r| point(state, r, origin, periods_ahead)))
}

/// Forecast a single series.
///
/// Errors
/// ------
/// - `HWError::SeriesOutOfRange` if `series >= series_count`.
/// - `HWError::OriginOutOfRange` if `origin >= time_steps`.
pub fn predict_series(
    state: &SmootherState, series: usize, origin: usize, periods_ahead: usize,
) -> HWResult<f64> {
    let len = state.series_count();
    if series >= len {
        return Err(HWError::SeriesOutOfRange { series, len });
    }
    check_origin(state, origin)?;
    check_horizon(origin, periods_ahead)?;
    Ok(point(state, series, origin, periods_ahead))
}

/// Forecast every series for horizons `0..=max_horizon`.
///
/// Parameters
/// ----------
/// - `state`: retained smoother state.
/// - `origin`: forecast origin.
/// - `max_horizon`: last horizon; the result has `max_horizon + 1` columns.
/// - `clamp`: [`Clamp`] applied to each value.
///
/// Returns
/// -------
/// `HWResult<ForecastResult>` with `times = None`.
///
/// Errors
/// ------
/// - `HWError::OriginOutOfRange` if `origin >= time_steps`.
/// - `HWError::InvalidHorizon` if `origin + max_horizon + 1` overflows.
pub fn predict_path(
    state: &SmootherState, origin: usize, max_horizon: usize, clamp: Clamp,
) -> HWResult<ForecastResult> {
    check_origin(state, origin)?;
    check_horizon(origin, max_horizon)?;
    let values = Array2::from_shape_fn((state.series_count(), max_horizon + 1), |(r, h)| {
        clamp.apply(point(state, r, origin, h))
    });
    Ok(ForecastResult { origin, horizons: (0..=max_horizon).collect(), values, times: None })
}

/// In-sample one-step-ahead predictions for one series.
///
/// Returns
/// -------
/// `p[0] = 0` and `p[i] = max(0, predict(i − 1, 1))` for `i ≥ 1`.
///
/// Errors
/// ------
/// - `HWError::SeriesOutOfRange` if `series >= series_count`.
pub fn one_step_ahead(state: &SmootherState, series: usize) -> HWResult<Array1<f64>> {
    let len = state.series_count();
    if series >= len {
        return Err(HWError::SeriesOutOfRange { series, len });
    }
    let mut out = Array1::<f64>::zeros(state.time_steps());
    for i in 1..state.time_steps() {
        out[i] = Clamp::NonNegative.apply(point(state, series, i - 1, 1));
    }
    Ok(out)
}
