//! Additive seasonal Holt-Winters smoother.
//!
//! Purpose
//! -------
//! Decompose every series of an observation matrix into level `s`, trend `b`
//! and seasonal `c` components with the additive triple-exponential
//! recursion. The resulting [`SmootherState`] is what the objective scores,
//! what a fitted model retains, and what the forecaster reads.
//!
//! Key behaviors
//! -------------
//! - Preconditions (`L > 0`, at least `2L` time steps, weights in `[0, 1]`)
//!   are checked by [`smooth`] before any arithmetic.
//! - Initialization: `s[:,0] = Y[:,0]`, `b[:,0]` from [`initial_trend`],
//!   `c[:,0] = c_0[:,0]` from [`initial_seasonal`].
//! - For `i ≥ 1`, with `ref` the seasonal value one cycle back:
//!   - `s_i = α (Y_i − ref) + (1 − α)(s_{i−1} + b_{i−1})`
//!   - `b_i = β (s_i − s_{i−1}) + (1 − β) b_{i−1}`
//!   - `c_i = γ (Y_i − s_i) + (1 − γ) ref`
//!
//! Invariants & assumptions
//! ------------------------
//! - The seasonal reference comes from a length-`L` cyclic buffer seeded with
//!   `c_0` and overwritten slot `i mod L` after each step. Slot `k` therefore
//!   holds `c_0[:,k]` during the first cycle and `c[:, i − L]` afterwards, so
//!   there is no separate first-cycle branch.
//! - Purely additive; nothing is clamped here. Negative levels or forecasts
//!   are the caller's concern at the forecasting boundary.
//! - Rows are independent; all of them are advanced in the same pass.
//!
//! Conventions
//! -----------
//! - All arrays are `series_count × time_steps` except `initial_seasonal`,
//!   which is `series_count × L`.
//! - The smoother performs no I/O and holds no state between calls.
use crate::forecasting::{
    core::{
        init::{initial_seasonal, initial_trend},
        period::SeasonalPeriod,
        weights::WeightTriple,
    },
    errors::{HWError, HWResult},
};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Level, trend and seasonal components of a smoothed matrix.
///
/// Fields
/// ------
/// - `level`, `trend`, `seasonal`: `Array2<f64>` (series × time steps).
/// - `initial_seasonal`: `Array2<f64>` (series × `L`), the profile `c_0`.
/// - `period`: the [`SeasonalPeriod`] used for the pass.
///
/// Notes
/// -----
/// - The state is owned by whoever called [`smooth`]; a fitted model keeps
///   the final one for forecasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmootherState {
    pub level: Array2<f64>,
    pub trend: Array2<f64>,
    pub seasonal: Array2<f64>,
    pub initial_seasonal: Array2<f64>,
    pub period: SeasonalPeriod,
}

impl SmootherState {
    pub fn series_count(&self) -> usize {
        self.level.nrows()
    }

    pub fn time_steps(&self) -> usize {
        self.level.ncols()
    }

    /// Check that the four matrices agree with each other and with `period`.
    ///
    /// Errors
    /// ------
    /// - `HWError::ShapeMismatch` naming the first inconsistent component.
    /// - `HWError::EmptyMatrix` if the state has no rows or columns.
    pub fn validate(&self) -> HWResult<()> {
        let (rows, cols) = self.level.dim();
        if rows == 0 || cols == 0 {
            return Err(HWError::EmptyMatrix { rows, cols });
        }
        for (what, m) in [("trend", &self.trend), ("seasonal", &self.seasonal)] {
            if m.nrows() != rows {
                return Err(HWError::ShapeMismatch { what, expected: rows, found: m.nrows() });
            }
            if m.ncols() != cols {
                return Err(HWError::ShapeMismatch { what, expected: cols, found: m.ncols() });
            }
        }
        if self.initial_seasonal.nrows() != rows {
            return Err(HWError::ShapeMismatch {
                what: "initial seasonal",
                expected: rows,
                found: self.initial_seasonal.nrows(),
            });
        }
        if self.initial_seasonal.ncols() != self.period.get() {
            return Err(HWError::ShapeMismatch {
                what: "initial seasonal",
                expected: self.period.get(),
                found: self.initial_seasonal.ncols(),
            });
        }
        Ok(())
    }
}

/// Run the additive Holt-Winters recursion over every row of `y`.
///
/// Parameters
/// ----------
/// - `y`: `ArrayView2<f64>`
///   Observations (series × time steps), finite.
/// - `period`: [`SeasonalPeriod`]
///   Seasonal period `L`.
/// - `weights`: [`WeightTriple`]
///   Smoothing weights; re-validated here.
///
/// Returns
/// -------
/// `HWResult<SmootherState>`
///
/// Errors
/// ------
/// - `HWError::EmptyMatrix` if `y` has no rows.
/// - `HWError::TooFewObservations` if `time_steps < 2L`.
/// - `HWError::InvalidWeight` if a weight is outside `[0, 1]`.
///
/// Performance
/// -----------
/// - O(series_count × time_steps); allocates the three output matrices and
///   one `series_count × L` buffer.
pub fn smooth(
    y: ArrayView2<f64>, period: SeasonalPeriod, weights: &WeightTriple,
) -> HWResult<SmootherState> {
    let (rows, t_len) = y.dim();
    if rows == 0 {
        return Err(HWError::EmptyMatrix { rows, cols: t_len });
    }
    period.check_history(t_len)?;
    weights.validate()?;

    let WeightTriple { alpha, beta, gamma } = *weights;
    let initial_seasonal = initial_seasonal(y, period);
    let b0 = initial_trend(y, period);

    let mut level = Array2::<f64>::zeros((rows, t_len));
    let mut trend = Array2::<f64>::zeros((rows, t_len));
    let mut seasonal = Array2::<f64>::zeros((rows, t_len));
    level.column_mut(0).assign(&y.column(0));
    trend.column_mut(0).assign(&b0);
    seasonal.column_mut(0).assign(&initial_seasonal.column(0));

    let mut cycle = initial_seasonal.clone();
    for i in 1..t_len {
        let k = period.offset(i);
        for r in 0..rows {
            let reference = cycle[[r, k]];
            let obs = y[[r, i]];
            let s_prev = level[[r, i - 1]];
            let b_prev = trend[[r, i - 1]];

            let s_i = alpha * (obs - reference) + (1.0 - alpha) * (s_prev + b_prev);
            let b_i = beta * (s_i - s_prev) + (1.0 - beta) * b_prev;
            let c_i = gamma * (obs - s_i) + (1.0 - gamma) * reference;

            level[[r, i]] = s_i;
            trend[[r, i]] = b_i;
            seasonal[[r, i]] = c_i;
            cycle[[r, k]] = c_i;
        }
    }

    Ok(SmootherState { level, trend, seasonal, initial_seasonal, period })
}
