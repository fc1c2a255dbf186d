//! Initial seasonal profile and trend for the Holt-Winters recursion.
//!
//! Purpose
//! -------
//! Compute the starting values the smoother needs before its first update:
//! the additive seasonal profile `c_0` (one value per cycle offset) and the
//! initial trend `b_0`, both per series.
//!
//! Key behaviors
//! -------------
//! - [`initial_seasonal`]: for each whole cycle `j`, subtract that cycle's
//!   mean from its values, then average the deviations offset by offset
//!   across cycles.
//! - [`initial_trend`]: averaged one-cycle-ahead slope,
//!   `Σ_{i<L} (Y[:, i+L] − Y[:, i]) / (L·L)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Callers guarantee `L > 0` and `time_steps ≥ 2L` (see
//!   [`SeasonalPeriod::check_history`]); these helpers do not re-check and
//!   would panic on an out-of-range slice otherwise.
//! - Trailing columns beyond the last whole cycle are ignored by
//!   [`initial_seasonal`].
use crate::forecasting::core::period::SeasonalPeriod;
use ndarray::{Array1, Array2, ArrayView2, Axis, s};

/// Additive seasonal profile `c_0` of shape `(series_count, L)`.
///
/// Parameters
/// ----------
/// - `y`: observations (series × time steps), at least two whole cycles.
/// - `period`: seasonal period `L`.
///
/// Returns
/// -------
/// `Array2<f64>` where `c_0[r, i]` is the mean over whole cycles of
/// `y[r, jL + i] − mean(y[r, jL .. (j+1)L])`.
pub fn initial_seasonal(y: ArrayView2<f64>, period: SeasonalPeriod) -> Array2<f64> {
    let l = period.get();
    let n_cycles = y.ncols() / l;
    let mut c0 = Array2::<f64>::zeros((y.nrows(), l));

    for j in 0..n_cycles {
        let cycle = y.slice(s![.., j * l..(j + 1) * l]);
        let mean = cycle.sum_axis(Axis(1)) / l as f64;
        c0 += &cycle;
        c0 -= &mean.insert_axis(Axis(1));
    }
    c0 /= n_cycles as f64;
    c0
}

/// Initial trend `b_0`, one value per series.
pub fn initial_trend(y: ArrayView2<f64>, period: SeasonalPeriod) -> Array1<f64> {
    let l = period.get();
    let ahead = y.slice(s![.., l..2 * l]);
    let now = y.slice(s![.., 0..l]);
    (&ahead - &now).sum_axis(Axis(1)) / (l * l) as f64
}
