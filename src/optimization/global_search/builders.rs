//! global_search::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Build configured solvers for the two search strategies so the runner can
//! stay generic over the `argmin` solver type.
//!
//! Key behaviors
//! -------------
//! - [`build_differential_evolution`]: population solver over the box,
//!   seeded from [`SearchOptions::seed`].
//! - [`build_nelder_mead`]: `argmin`'s simplex solver on an axis-aligned
//!   simplex around a start point in unconstrained coordinates, with the
//!   configured standard-deviation tolerance.
//!
//! Conventions
//! -----------
//! - Builders never set `max_iters`, the time budget, or observers; those
//!   belong to the runner.
//! - `argmin` configuration errors are surfaced as [`OptError`](crate::optimization::errors::OptError)
//!   through the crate's `From<argmin::core::Error>`.
use crate::optimization::{
    errors::OptResult,
    global_search::{
        differential_evolution::DifferentialEvolution,
        traits::{Bounds, NelderMeadOptions, SearchOptions},
        types::{Cost, Theta},
    },
};
use argmin::solver::neldermead::NelderMead;

/// Simplex solver on the crate's numeric types.
pub type SimplexSolver = NelderMead<Theta, Cost>;

/// Construct a differential-evolution solver for `bounds`.
///
/// # Errors
/// Propagates option validation errors from [`DifferentialEvolution::new`].
pub fn build_differential_evolution(
    bounds: &Bounds, opts: &SearchOptions,
) -> OptResult<DifferentialEvolution> {
    DifferentialEvolution::new(bounds.clone(), &opts.de, opts.seed)
}

/// Axis-aligned simplex: `theta0` plus `theta0 + step·e_i` for every axis.
pub fn initial_simplex(theta0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}

/// Construct a simplex solver around `theta0` (unconstrained coordinates).
///
/// # Errors
/// - `OptError` if `argmin` rejects the standard-deviation tolerance.
pub fn build_nelder_mead(theta0: &Theta, opts: &NelderMeadOptions) -> OptResult<SimplexSolver> {
    let solver = NelderMead::new(initial_simplex(theta0, opts.step))
        .with_sd_tolerance(opts.sd_tolerance)?;
    Ok(solver)
}
