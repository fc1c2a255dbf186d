//! Smoothing weights `(alpha, beta, gamma)` of the additive Holt-Winters model.
//!
//! Each weight lives in `[0, 1]`: `alpha` drives the level, `beta` the trend
//! and `gamma` the seasonal profile. The optimizer works on a plain length-3
//! vector; [`WeightTriple::from_slice`] and [`WeightTriple::to_array`] are the
//! bridge between the two representations.
use crate::forecasting::errors::{HWError, HWResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Validated smoothing weights, each finite and in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTriple {
    /// Level responsiveness.
    pub alpha: f64,
    /// Trend responsiveness.
    pub beta: f64,
    /// Seasonal responsiveness.
    pub gamma: f64,
}

impl WeightTriple {
    /// Number of free weights (dimension of the search box).
    pub const DIM: usize = 3;

    /// Errors
    /// ------
    /// - `HWError::InvalidWeight { name, value }` for the first weight that is
    ///   non-finite or outside `[0, 1]`.
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> HWResult<Self> {
        let weights = WeightTriple { alpha, beta, gamma };
        weights.validate()?;
        Ok(weights)
    }

    /// Re-check the invariants, e.g. after deserialization.
    pub fn validate(&self) -> HWResult<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(HWError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }

    /// Build from an optimizer point `[alpha, beta, gamma]`.
    ///
    /// Errors
    /// ------
    /// - `HWError::ShapeMismatch` if `theta.len() != 3`.
    /// - `HWError::InvalidWeight` as in [`WeightTriple::new`].
    pub fn from_slice(theta: &[f64]) -> HWResult<Self> {
        match *theta {
            [alpha, beta, gamma] => WeightTriple::new(alpha, beta, gamma),
            _ => Err(HWError::ShapeMismatch {
                what: "weight vector",
                expected: Self::DIM,
                found: theta.len(),
            }),
        }
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(vec![self.alpha, self.beta, self.gamma])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_cube_corners() {
        assert!(WeightTriple::new(0.0, 0.0, 0.0).is_ok());
        assert!(WeightTriple::new(1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // The first offending weight is named in the error.
    fn new_rejects_out_of_range_and_non_finite() {
        assert_eq!(
            WeightTriple::new(0.5, 1.5, 0.2).unwrap_err(),
            HWError::InvalidWeight { name: "beta", value: 1.5 }
        );
        assert!(matches!(
            WeightTriple::new(0.5, 0.5, f64::NAN),
            Err(HWError::InvalidWeight { name: "gamma", .. })
        ));
    }

    #[test]
    fn from_slice_checks_length() {
        let err = WeightTriple::from_slice(&[0.1, 0.2]).unwrap_err();
        assert_eq!(err, HWError::ShapeMismatch { what: "weight vector", expected: 3, found: 2 });

        let w = WeightTriple::from_slice(&[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(w.to_array().to_vec(), vec![0.1, 0.2, 0.3]);
    }
}
