//! numerical_stability — guarded transforms between unconstrained space and
//! a search box.
//!
//! Purpose
//! -------
//! Collect the small numerical helpers the search layer needs to run a
//! local, unconstrained solver on a bounded problem without ever evaluating
//! an infeasible point.
//!
//! Key behaviors
//! -------------
//! - Stable scalar transforms (`safe_logistic`, `safe_logit`) that avoid
//!   overflow in the tails.
//! - Vector box mappings (`to_box`, `from_box`) built on them.
//! - A single clamp constant (`LOGIT_EPS`) shared by every caller.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite `f64`; box validation (finite, `lo < hi`) happens in
//!   the search layer before these helpers run.
//! - `to_box` always returns a point inside the closed box.
//!
//! Conventions
//! -----------
//! - This module never logs or performs I/O; it is safe to call inside cost
//!   evaluations.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check agreement with naive formulas,
//!   tail saturation, and box round trips.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{LOGIT_EPS, from_box, safe_logistic, safe_logit, to_box};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{LOGIT_EPS, from_box, safe_logistic, safe_logit, to_box};
}
