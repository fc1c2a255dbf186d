//! optimization — bounded search stack, numerical helpers, and unified error
//! surface.
//!
//! Purpose
//! -------
//! Provide the derivative-free optimization layer used to fit smoothing
//! weights: an Argmin-backed bounded minimizer, guarded transforms between
//! unconstrained coordinates and a box, and a single error/result surface.
//! Callers implement an objective, choose a strategy and budgets, and obtain
//! the best point and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing a cost over a box**
//!   (`global_search`), with differential evolution and Nelder–Mead
//!   strategies, iteration and wall-clock budgets and optional seeding.
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   unconstrained coordinates into the box.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives only ever see feasible points and must return finite costs;
//!   anything else is reported as `OptError`, not a panic.
//! - Search options are validated on construction and treated as
//!   internally consistent by the solver layer.
//!
//! Conventions
//! -----------
//! - Points are `ndarray::Array1<f64>` (`Theta`); costs are `f64`.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Progress reporting only happens through the optional `obs_slog`
//!   observer when a caller asks for verbose output.
//!
//! Downstream usage
//! ----------------
//! - The forecasting layer implements `Objective` for the Holt–Winters
//!   forecast-error criterion and calls `minimize` over the unit cube.
//! - Front-ends typically import `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: option and box
//!   validation, mappings, population mechanics, end-to-end toy searches and
//!   error conversions.

pub mod errors;
pub mod global_search;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use topic_forecast::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::global_search::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
