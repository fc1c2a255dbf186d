//! Observation containers for parallel count series.
//!
//! Purpose
//! -------
//! Provide a validated container for the matrix of per-series counts that
//! feeds the Holt-Winters stack, together with its time index and sampling
//! interval. This module centralizes input validation so the smoother,
//! objective and validator can assume clean, rectangular, finite data.
//!
//! Key behaviors
//! -------------
//! - [`ObservationMatrix`] enforces shape agreement between the value matrix
//!   and the time index, finiteness of every value, a strictly increasing
//!   time index, and a positive sampling interval.
//! - Small helpers expose row totals, column filtering by time
//!   ([`ObservationMatrix::after`]) and row selection
//!   ([`ObservationMatrix::select_rows`]) without breaking those invariants.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values` is `series_count × time_steps` with both dimensions > 0.
//! - `times.len() == time_steps` and `times` is strictly increasing.
//! - `interval > 0`. Consecutive timestamps are *not* required to be exactly
//!   one interval apart; the interval is used to derive the seasonal period
//!   and to stamp forecast times.
//! - Values are finite. Sign is not checked: counts are non-negative in the
//!   originating domain but the additive smoother is sign-agnostic.
//!
//! Conventions
//! -----------
//! - Rows are series (topics), columns are time steps; indexing is 0-based.
//! - Timestamps are UTC.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each rejection path of [`ObservationMatrix::new`], the
//!   regular-grid constructor, and the `after` / `select_rows` helpers.
use crate::forecasting::errors::{HWError, HWResult};
use chrono::{DateTime, Duration, Utc};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// `ObservationMatrix` — validated counts matrix plus time index.
///
/// Fields
/// ------
/// - `values`: `Array2<f64>`
///   Observations, rows = series, columns = time steps.
/// - `times`: `Vec<DateTime<Utc>>`
///   One timestamp per column, strictly increasing.
/// - `interval`: `chrono::Duration`
///   Fixed sampling interval of the time buckets (> 0).
///
/// Invariants
/// ----------
/// - See the module docs; all of them are checked by
///   [`ObservationMatrix::new`] in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationMatrix {
    /// Observations (series × time steps), all finite.
    pub values: Array2<f64>,
    /// Column timestamps, strictly increasing.
    pub times: Vec<DateTime<Utc>>,
    /// Sampling interval of the time buckets.
    pub interval: Duration,
}

impl ObservationMatrix {
    /// Construct a validated [`ObservationMatrix`].
    ///
    /// Parameters
    /// ----------
    /// - `values`: `Array2<f64>`
    ///   Observation matrix (series × time steps).
    /// - `times`: `Vec<DateTime<Utc>>`
    ///   One timestamp per column.
    /// - `interval`: `Duration`
    ///   Sampling interval; must be strictly positive.
    ///
    /// Returns
    /// -------
    /// `HWResult<ObservationMatrix>`
    ///
    /// Errors
    /// ------
    /// - `HWError::EmptyMatrix` if either dimension is zero.
    /// - `HWError::ShapeMismatch` if `times.len() != values.ncols()`.
    /// - `HWError::NonFiniteData { row, col, value }` for the first NaN/±∞.
    /// - `HWError::UnorderedTimes { index }` at the first non-increasing step.
    /// - `HWError::InvalidInterval` if `interval <= 0`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use chrono::{Duration, TimeZone, Utc};
    /// # use topic_forecast::forecasting::core::data::ObservationMatrix;
    /// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let times = vec![start, start + Duration::hours(4)];
    /// let obs = ObservationMatrix::new(array![[1.0, 2.0]], times, Duration::hours(4)).unwrap();
    /// assert_eq!(obs.time_steps(), 2);
    /// ```
    pub fn new(
        values: Array2<f64>, times: Vec<DateTime<Utc>>, interval: Duration,
    ) -> HWResult<Self> {
        let (rows, cols) = values.dim();
        if rows == 0 || cols == 0 {
            return Err(HWError::EmptyMatrix { rows, cols });
        }
        if times.len() != cols {
            return Err(HWError::ShapeMismatch {
                what: "time index",
                expected: cols,
                found: times.len(),
            });
        }
        if interval <= Duration::zero() {
            return Err(HWError::InvalidInterval { reason: "interval must be positive" });
        }
        for ((row, col), &value) in values.indexed_iter() {
            if !value.is_finite() {
                return Err(HWError::NonFiniteData { row, col, value });
            }
        }
        if let Some(index) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(HWError::UnorderedTimes { index: index + 1 });
        }

        Ok(ObservationMatrix { values, times, interval })
    }

    /// Construct an [`ObservationMatrix`] on a regular grid
    /// `start, start + interval, start + 2·interval, ...`.
    ///
    /// Errors
    /// ------
    /// - As [`ObservationMatrix::new`], plus `HWError::InvalidInterval` if
    ///   the grid overflows the representable date range.
    pub fn with_regular_times(
        values: Array2<f64>, start: DateTime<Utc>, interval: Duration,
    ) -> HWResult<Self> {
        let times = regular_times(start, interval, values.ncols())?;
        Self::new(values, times, interval)
    }

    pub fn series_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn time_steps(&self) -> usize {
        self.values.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Timestamp of the final column. Never fails: the index is non-empty.
    pub fn last_time(&self) -> DateTime<Utc> {
        self.times[self.times.len() - 1]
    }

    /// Per-series total count (row sums).
    pub fn totals(&self) -> Array1<f64> {
        self.values.sum_axis(Axis(1))
    }

    /// Columns strictly after `cutoff`, or `None` when nothing is left.
    ///
    /// Notes
    /// -----
    /// - Because `times` is strictly increasing, the kept columns form a
    ///   contiguous suffix and the result stays a valid matrix.
    pub fn after(&self, cutoff: DateTime<Utc>) -> Option<ObservationMatrix> {
        let first = self.times.iter().position(|t| *t > cutoff)?;
        let values = self.values.slice(ndarray::s![.., first..]).to_owned();
        Some(ObservationMatrix {
            values,
            times: self.times[first..].to_vec(),
            interval: self.interval,
        })
    }

    /// Keep the given rows, in the given order.
    ///
    /// Errors
    /// ------
    /// - `HWError::SeriesOutOfRange` for an index `>= series_count()`.
    /// - `HWError::EmptyMatrix` if `rows` is empty.
    pub fn select_rows(&self, rows: &[usize]) -> HWResult<ObservationMatrix> {
        if rows.is_empty() {
            return Err(HWError::EmptyMatrix { rows: 0, cols: self.time_steps() });
        }
        let len = self.series_count();
        if let Some(&series) = rows.iter().find(|&&r| r >= len) {
            return Err(HWError::SeriesOutOfRange { series, len });
        }
        Ok(ObservationMatrix {
            values: self.values.select(Axis(0), rows),
            times: self.times.clone(),
            interval: self.interval,
        })
    }
}

/// Timestamps `start + k·interval` for `k in 0..len`.
///
/// Errors
/// ------
/// - `HWError::InvalidInterval` if a timestamp overflows.
pub fn regular_times(
    start: DateTime<Utc>, interval: Duration, len: usize,
) -> HWResult<Vec<DateTime<Utc>>> {
    let mut times = Vec::with_capacity(len);
    let mut current = start;
    for k in 0..len {
        if k > 0 {
            current = current
                .checked_add_signed(interval)
                .ok_or(HWError::InvalidInterval { reason: "time grid overflows" })?;
        }
        times.push(current);
    }
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Every rejection path of `ObservationMatrix::new`.
    // - The regular-grid constructor and its timestamps.
    // - `after`, `select_rows` and `totals`.
    // -------------------------------------------------------------------------

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn four_hours() -> Duration {
        Duration::hours(4)
    }

    #[test]
    // Purpose
    // -------
    // A well-formed matrix on a regular grid is accepted and stamped with
    // evenly spaced timestamps.
    //
    // Given
    // -----
    // - 2 × 3 finite matrix, start at 2024-01-01T00:00Z, 4-hour interval.
    //
    // Expect
    // ------
    // - `Ok`, with the last timestamp 8 hours after the start.
    fn with_regular_times_builds_evenly_spaced_index() {
        let obs = ObservationMatrix::with_regular_times(
            array![[1.0, 2.0, 3.0], [0.0, 0.0, 1.0]],
            start(),
            four_hours(),
        )
        .unwrap();

        assert_eq!(obs.series_count(), 2);
        assert_eq!(obs.time_steps(), 3);
        assert_eq!(obs.last_time(), start() + Duration::hours(8));
        assert_eq!(obs.totals(), array![6.0, 1.0]);
    }

    #[test]
    fn new_rejects_time_index_length_mismatch() {
        let times = vec![start(), start() + four_hours()];
        let err = ObservationMatrix::new(array![[1.0, 2.0, 3.0]], times, four_hours()).unwrap_err();
        assert_eq!(err, HWError::ShapeMismatch { what: "time index", expected: 3, found: 2 });
    }

    #[test]
    fn new_rejects_empty_matrix() {
        let values = Array2::<f64>::zeros((0, 3));
        let times = regular_times(start(), four_hours(), 3).unwrap();
        let err = ObservationMatrix::new(values, times, four_hours()).unwrap_err();
        assert_eq!(err, HWError::EmptyMatrix { rows: 0, cols: 3 });
    }

    #[test]
    // Purpose
    // -------
    // The first non-finite entry is reported with its (row, col) position.
    fn new_rejects_non_finite_values() {
        let values = array![[1.0, 2.0], [3.0, f64::NAN]];
        let times = regular_times(start(), four_hours(), 2).unwrap();
        let err = ObservationMatrix::new(values, times, four_hours()).unwrap_err();
        assert!(matches!(err, HWError::NonFiniteData { row: 1, col: 1, .. }));
    }

    #[test]
    fn new_rejects_unordered_times() {
        let times = vec![start(), start() + four_hours(), start() + four_hours()];
        let err = ObservationMatrix::new(array![[1.0, 2.0, 3.0]], times, four_hours()).unwrap_err();
        assert_eq!(err, HWError::UnorderedTimes { index: 2 });
    }

    #[test]
    fn new_rejects_non_positive_interval() {
        let times = regular_times(start(), four_hours(), 2).unwrap();
        let err = ObservationMatrix::new(array![[1.0, 2.0]], times, Duration::zero()).unwrap_err();
        assert!(matches!(err, HWError::InvalidInterval { .. }));
    }

    #[test]
    // Purpose
    // -------
    // `after` keeps exactly the columns strictly later than the cutoff and
    // returns `None` when nothing qualifies.
    //
    // Given
    // -----
    // - 4 columns on a 4-hour grid; cutoff equal to the second timestamp.
    //
    // Expect
    // ------
    // - Two columns survive, starting at the third timestamp.
    // - A cutoff at the last timestamp yields `None`.
    fn after_keeps_strictly_later_columns() {
        let obs = ObservationMatrix::with_regular_times(
            array![[1.0, 2.0, 3.0, 4.0]],
            start(),
            four_hours(),
        )
        .unwrap();

        let tail = obs.after(obs.times[1]).unwrap();

        assert_eq!(tail.values, array![[3.0, 4.0]]);
        assert_eq!(tail.times[0], obs.times[2]);
        assert!(obs.after(obs.last_time()).is_none());
    }

    #[test]
    fn select_rows_reorders_and_checks_bounds() {
        let obs = ObservationMatrix::with_regular_times(
            array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
            start(),
            four_hours(),
        )
        .unwrap();

        let picked = obs.select_rows(&[2, 0]).unwrap();
        assert_eq!(picked.values, array![[3.0, 3.0], [1.0, 1.0]]);

        let err = obs.select_rows(&[3]).unwrap_err();
        assert_eq!(err, HWError::SeriesOutOfRange { series: 3, len: 3 });
    }
}
