//! Numerical stability utilities.
//!
//! Provides guarded versions of the logistic transform and its inverse,
//! plus the box mapping built on them. The simplex strategy searches an
//! unconstrained space and reaches the box only through these functions, so
//! every point it evaluates is feasible.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: clamp applied before taking a logit so box corners map to
//!   large but finite coordinates.
//! - [`safe_logistic(x)`]: `1 / (1 + exp(−x))` without overflow.
//! - [`safe_logit(p)`]: inverse of the logistic on `(0, 1)`.
//! - [`to_box`] / [`from_box`]: `x = lo + (hi − lo)·logistic(θ)` and its
//!   inverse, coordinate by coordinate.
use ndarray::{Array1, Zip};

/// Probability clamp for [`safe_logit`].
///
/// `logit(1e-10) ≈ −23`, so a start point on a box face sits a bounded
/// distance from the interior.
pub const LOGIT_EPS: f64 = 1e-10;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(−x))`.
///
/// Uses `exp(x) / (1 + exp(x))` for negative `x` so the exponential never
/// overflows.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Inverse logistic on `[LOGIT_EPS, 1 − LOGIT_EPS]`:
/// `logit(p) = ln(p) − ln(1 − p)`.
///
/// Inputs outside that range are clamped first.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Map unconstrained `theta` into the box `[lower, upper]`.
///
/// The result is clipped to the box to absorb rounding at the faces.
pub fn to_box(theta: &Array1<f64>, lower: &Array1<f64>, upper: &Array1<f64>) -> Array1<f64> {
    Zip::from(theta).and(lower).and(upper).map_collect(|&t, &lo, &hi| {
        (lo + (hi - lo) * safe_logistic(t)).clamp(lo, hi)
    })
}

/// Map a box point back to unconstrained coordinates.
pub fn from_box(x: &Array1<f64>, lower: &Array1<f64>, upper: &Array1<f64>) -> Array1<f64> {
    Zip::from(x).and(lower).and(upper).map_collect(|&v, &lo, &hi| safe_logit((v - lo) / (hi - lo)))
}
