//! global_search::types — shared numeric aliases and defaults.
//!
//! Purpose
//! -------
//! Centralize the numeric types and default constants used by the bounded
//! search layer so the solvers, the adapter and the runner agree on a single
//! parameter/cost representation.
//!
//! Conventions
//! -----------
//! - Points are `ndarray::Array1<f64>` ([`Theta`]); costs are plain `f64`.
//! - [`SearchState`] is the `argmin` state both strategies run on: no
//!   gradient, Jacobian, Hessian or residuals.
use argmin::core::IterState;
use ndarray::Array1;
use std::collections::HashMap;

/// A point in the search space (box coordinates or, for the simplex
/// strategy, unconstrained coordinates).
pub type Theta = Array1<f64>;

/// Scalar objective value being minimized.
pub type Cost = f64;

/// Function-evaluation counters as reported by `argmin`
/// (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// `argmin` state shared by the derivative-free strategies.
pub type SearchState = IterState<Theta, (), (), (), (), Cost>;

/// Population members per search dimension.
pub const DEFAULT_POPSIZE: usize = 15;

/// Smallest population differential evolution will run with.
pub const MIN_POPULATION: usize = 5;

/// Dithered mutation range `[lower, upper)`, redrawn every generation.
pub const DEFAULT_MUTATION: (f64, f64) = (0.5, 1.0);

/// Binomial crossover probability.
pub const DEFAULT_CROSSOVER: f64 = 0.7;

/// Relative convergence tolerance on the spread of population costs.
pub const DEFAULT_DE_TOL: f64 = 0.01;

/// Generation / iteration cap.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Default starting point of the simplex search, as a fraction of each box
/// side.
pub const DEFAULT_START_FRACTION: f64 = 0.2;

/// Initial simplex edge in unconstrained coordinates.
pub const DEFAULT_SIMPLEX_STEP: f64 = 0.5;

/// Standard-deviation tolerance of the simplex costs.
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-10;
