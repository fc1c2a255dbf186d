//! Adapter that exposes a user `Objective` as an `argmin` problem.
//!
//! Population search evaluates points directly in box coordinates
//! ([`ParamMapping::Identity`]). The simplex strategy works in unconstrained
//! coordinates and reaches the box through the logistic map
//! ([`ParamMapping::Logistic`]), so the user objective only ever sees
//! feasible points.
use crate::optimization::{
    errors::OptError,
    global_search::{
        traits::{Bounds, Objective},
        types::{Cost, Theta},
    },
    numerical_stability::transformations::{from_box, to_box},
};
use argmin::core::{CostFunction, Error};

/// How solver coordinates relate to box coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMapping {
    /// Solver points are box points.
    Identity,
    /// `x = lo + (hi − lo)·logistic(θ)`.
    Logistic,
}

impl ParamMapping {
    /// Solver coordinates → box coordinates.
    pub fn to_box(self, theta: &Theta, bounds: &Bounds) -> Theta {
        match self {
            ParamMapping::Identity => theta.clone(),
            ParamMapping::Logistic => to_box(theta, bounds.lower(), bounds.upper()),
        }
    }

    /// Box coordinates → solver coordinates.
    pub fn from_box(self, x: &Theta, bounds: &Bounds) -> Theta {
        match self {
            ParamMapping::Identity => x.clone(),
            ParamMapping::Logistic => from_box(x, bounds.lower(), bounds.upper()),
        }
    }
}

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction`.
///
/// - `CostFunction::cost` maps the solver point into the box, evaluates the
///   objective and rejects non-finite results.
/// - The adapter is `Sync` whenever the objective and its data are, which
///   lets `argmin` evaluate whole populations in parallel.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub bounds: Bounds,
    pub mapping: ParamMapping,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data, bounds: Bounds, mapping: ParamMapping) -> Self {
        Self { f, data, bounds, mapping }
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// # Errors
    /// - Propagates any `OptError` from the user's `value` via `?`.
    /// - `OptError::NonFiniteCost` if the value is NaN/±∞.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let x = self.mapping.to_box(theta, &self.bounds);
        let output = self.f.value(&x, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}
