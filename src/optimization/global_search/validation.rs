//! Validation helpers for the bounded search layer.
//!
//! - **Option checks**: [`verify_tolerance`], [`verify_mutation`],
//!   [`verify_crossover`] keep solver settings finite and in range.
//! - **Box checks**: [`validate_bounds`] and [`validate_start`].
//! - **Outcomes**: [`validate_x_hat`] and [`validate_value`] make sure a
//!   finished search reports a finite point and cost.
use crate::optimization::{
    errors::{OptError, OptResult},
    global_search::types::Theta,
};

/// Tolerance must be finite and non-negative.
///
/// # Errors
/// Returns [`OptError::InvalidTolerance`].
pub fn verify_tolerance(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be finite." });
    }
    if tol < 0.0 {
        return Err(OptError::InvalidTolerance { tol, reason: "Tolerance must be non-negative." });
    }
    Ok(())
}

/// Mutation (dither) range must satisfy `0 <= lower <= upper <= 2`.
///
/// # Errors
/// Returns [`OptError::InvalidMutation`].
pub fn verify_mutation(lower: f64, upper: f64) -> OptResult<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OptError::InvalidMutation { lower, upper, reason: "Bounds must be finite." });
    }
    if lower < 0.0 || upper > 2.0 {
        return Err(OptError::InvalidMutation {
            lower,
            upper,
            reason: "Mutation must lie in [0, 2].",
        });
    }
    if lower > upper {
        return Err(OptError::InvalidMutation {
            lower,
            upper,
            reason: "Lower mutation bound exceeds the upper bound.",
        });
    }
    Ok(())
}

/// Crossover probability must lie in `[0, 1]`.
///
/// # Errors
/// Returns [`OptError::InvalidCrossover`].
pub fn verify_crossover(value: f64) -> OptResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(OptError::InvalidCrossover {
            value,
            reason: "Crossover probability must lie in [0, 1].",
        });
    }
    Ok(())
}

/// Validate a box given as lower/upper vectors.
///
/// # Errors
/// - [`OptError::BoundsLengthMismatch`] for unequal lengths.
/// - [`OptError::EmptyBounds`] for zero dimensions.
/// - [`OptError::InvalidBounds`] for the first non-finite or empty side.
pub fn validate_bounds(lower: &Theta, upper: &Theta) -> OptResult<()> {
    if lower.len() != upper.len() {
        return Err(OptError::BoundsLengthMismatch { lower: lower.len(), upper: upper.len() });
    }
    if lower.is_empty() {
        return Err(OptError::EmptyBounds);
    }
    for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(OptError::InvalidBounds {
                index,
                lower: lo,
                upper: hi,
                reason: "Bounds must be finite.",
            });
        }
        if lo >= hi {
            return Err(OptError::InvalidBounds {
                index,
                lower: lo,
                upper: hi,
                reason: "Lower bound must be strictly below the upper bound.",
            });
        }
    }
    Ok(())
}

/// Starting point must match the box dimension and lie inside it.
///
/// # Errors
/// - [`OptError::StartDimMismatch`] for a wrong length.
/// - [`OptError::StartOutOfBounds`] for the first coordinate outside
///   `[lower, upper]` (NaN included).
pub fn validate_start(start: &Theta, lower: &Theta, upper: &Theta) -> OptResult<()> {
    if start.len() != lower.len() {
        return Err(OptError::StartDimMismatch { expected: lower.len(), found: start.len() });
    }
    for (index, ((&x, &lo), &hi)) in start.iter().zip(lower.iter()).zip(upper.iter()).enumerate() {
        if !(lo..=hi).contains(&x) {
            return Err(OptError::StartOutOfBounds { index, value: x });
        }
    }
    Ok(())
}

/// Validate and unwrap the best point of a finished search.
///
/// # Errors
/// - [`OptError::MissingBestParam`] if the solver recorded none.
/// - [`OptError::InvalidXHat`] for the first non-finite coordinate.
pub fn validate_x_hat(x_hat: Option<Theta>) -> OptResult<Theta> {
    let x = x_hat.ok_or(OptError::MissingBestParam)?;
    for (index, &value) in x.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidXHat {
                index,
                value,
                reason: "Best point must be finite.",
            });
        }
    }
    Ok(x)
}

/// Best cost must be finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`].
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
