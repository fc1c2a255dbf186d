//! global_search — bounded, derivative-free minimization on top of `argmin`.
//!
//! Purpose
//! -------
//! Minimize a scalar cost over a closed box when no gradient is available
//! and the landscape may have several basins. Callers implement a single
//! trait, [`Objective`], and invoke [`minimize`] (or go through the
//! [`Minimizer`] capability on [`SearchOptions`]).
//!
//! Key behaviors
//! -------------
//! - [`differential_evolution`]: a population solver implementing `argmin`'s
//!   `Solver` trait, evaluating each generation in parallel.
//! - Nelder–Mead from `argmin`, run in logistic coordinates so the box is
//!   respected without penalty terms (see [`adapter::ParamMapping`]).
//! - [`minimize`] validates inputs with [`Objective::check`], builds the
//!   solver via [`builders`], runs it via [`run::run_search`] and normalizes
//!   the result into a [`SearchOutcome`].
//! - Optional polishing of the population result with a simplex search.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every point handed to [`Objective::value`] lies inside the box.
//! - Costs must be finite; a NaN/∞ cost aborts the run with
//!   `OptError::NonFiniteCost`.
//! - `SearchOutcome::converged` is `true` only when the solver met its own
//!   convergence test; budget exhaustion is reported through `status`.
//!
//! Conventions
//! -----------
//! - Points are [`Theta`] (`Array1<f64>`), costs are [`Cost`] (`f64`).
//! - Errors bubble up as `OptResult<T>`; nothing here intentionally panics.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover option validation, the mapping in
//!   [`adapter`], population mechanics in [`differential_evolution`] and
//!   end-to-end runs in [`api`].
//! - Integration tests exercise [`minimize`] by fitting Holt–Winters weights.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod differential_evolution;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::differential_evolution::DifferentialEvolution;
pub use self::traits::{
    Bounds, DEOptions, Minimizer, NelderMeadOptions, Objective, SearchOptions, SearchOutcome,
    SearchStrategy,
};
pub use self::types::{Cost, FnEvalMap, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{Bounds, Minimizer, Objective, SearchOptions, SearchOutcome};
    pub use super::types::{Cost, Theta};
}
