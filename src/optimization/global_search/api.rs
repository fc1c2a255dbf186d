//! High-level entry point for minimizing a user-provided `Objective` over a box.
//!
//! Differential evolution runs directly in box coordinates and is optionally
//! polished by a simplex search started from its best member. The simplex
//! strategy alone runs in logistic coordinates from a fixed start. Both
//! delegate execution to `run_search`.
use crate::optimization::{
    errors::OptResult,
    global_search::{
        adapter::{ArgMinAdapter, ParamMapping},
        builders::{build_differential_evolution, build_nelder_mead},
        run::run_search,
        traits::{Bounds, Minimizer, Objective, SearchOptions, SearchOutcome, SearchStrategy},
        types::{FnEvalMap, Theta},
    },
};
use std::time::{Duration, Instant};

/// Minimize `f` over `bounds` with the strategy selected in `opts`.
///
/// # Behavior
/// - Differential evolution: checks `data` once at the box centre, evolves
///   the population until convergence or a budget runs out, then (when
///   `opts.de.polish` is set) runs a simplex search from the best member and
///   keeps its point only if the cost strictly improves. Evaluation counts
///   of both phases are merged.
/// - Nelder–Mead: validates the start point with `f.check`, maps it to
///   logistic coordinates and runs the simplex there, so every evaluated
///   point stays inside the box.
/// - The time budget covers the whole call; the polish step only gets what
///   is left of it.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates option and builder errors.
/// - Propagates runtime errors from `run_search` (including objective
///   failures and non-finite costs).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use topic_forecast::optimization::errors::OptResult;
/// use topic_forecast::optimization::global_search::{minimize, Bounds, Objective, SearchOptions, Theta};
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, x: &Theta, _: &()) -> OptResult<f64> {
///         Ok((x - 0.25).mapv(|d| d * d).sum())
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let bounds = Bounds::unit_cube(2)?;
/// let opts = SearchOptions { seed: Some(7), ..SearchOptions::default() };
/// let out = minimize(&Bowl, &(), &bounds, &opts)?;
/// println!("x̂ = {:?}", out.x_hat);
/// # Ok::<(), topic_forecast::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, data: &F::Data, bounds: &Bounds, opts: &SearchOptions,
) -> OptResult<SearchOutcome> {
    let started = Instant::now();
    match opts.strategy {
        SearchStrategy::DifferentialEvolution => {
            f.check(&bounds.point_at(0.5), data)?;
            let problem = ArgMinAdapter::new(f, data, bounds.clone(), ParamMapping::Identity);
            let solver = build_differential_evolution(bounds, opts)?;
            let outcome = run_search(None, opts, problem, solver)?;
            if !opts.de.polish {
                return Ok(outcome);
            }
            match remaining_budget(opts.time_budget, started.elapsed()) {
                Some(budget) => polish(f, data, bounds, opts, budget, outcome),
                None => Ok(outcome),
            }
        }
        SearchStrategy::NelderMead => {
            let x0 = opts.nelder_mead.start_in(bounds)?;
            f.check(&x0, data)?;
            simplex_search(f, data, bounds, opts, &x0)
        }
    }
}

impl Minimizer for SearchOptions {
    fn minimize<F: Objective>(
        &self, f: &F, data: &F::Data, bounds: &Bounds,
    ) -> OptResult<SearchOutcome> {
        minimize(f, data, bounds, self)
    }
}

// ---- Helper Methods ----

fn simplex_search<F: Objective>(
    f: &F, data: &F::Data, bounds: &Bounds, opts: &SearchOptions, x0: &Theta,
) -> OptResult<SearchOutcome> {
    let theta0 = ParamMapping::Logistic.from_box(x0, bounds);
    let solver = build_nelder_mead(&theta0, &opts.nelder_mead)?;
    let problem = ArgMinAdapter::new(f, data, bounds.clone(), ParamMapping::Logistic);
    run_search(Some(theta0), opts, problem, solver)
}

// `Some(None)` means no budget; `None` means the budget is spent.
fn remaining_budget(budget: Option<Duration>, elapsed: Duration) -> Option<Option<Duration>> {
    match budget {
        None => Some(None),
        Some(total) => total.checked_sub(elapsed).filter(|left| !left.is_zero()).map(Some),
    }
}

fn polish<F: Objective>(
    f: &F, data: &F::Data, bounds: &Bounds, opts: &SearchOptions, budget: Option<Duration>,
    global: SearchOutcome,
) -> OptResult<SearchOutcome> {
    let local_opts = SearchOptions { time_budget: budget, ..opts.clone() };
    let local = simplex_search(f, data, bounds, &local_opts, &global.x_hat)?;
    let fn_evals = merge_counts(&global.fn_evals, &local.fn_evals);
    if local.value < global.value {
        Ok(SearchOutcome { x_hat: local.x_hat, value: local.value, fn_evals, ..global })
    } else {
        Ok(SearchOutcome { fn_evals, ..global })
    }
}

fn merge_counts(a: &FnEvalMap, b: &FnEvalMap) -> FnEvalMap {
    let mut merged = a.clone();
    for (key, count) in b {
        *merged.entry(key.clone()).or_insert(0) += count;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::{OptError, OptResult},
        global_search::traits::{DEOptions, NelderMeadOptions},
    };
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // End-to-end runs of both strategies through `argmin` on small bowls:
    // accuracy, box feasibility, seed determinism, budget handling and
    // propagation of `check` failures.
    // -------------------------------------------------------------------------

    struct Bowl;

    impl Objective for Bowl {
        type Data = Array1<f64>;

        // Squared distance to `centre`, which may lie outside the box.
        fn value(&self, x: &Theta, centre: &Array1<f64>) -> OptResult<f64> {
            Ok((x - centre).mapv(|d| d * d).sum())
        }

        fn check(&self, x: &Theta, centre: &Array1<f64>) -> OptResult<()> {
            if x.len() != centre.len() {
                return Err(OptError::StartDimMismatch { expected: centre.len(), found: x.len() });
            }
            Ok(())
        }
    }

    fn de_options(seed: u64, polish: bool) -> SearchOptions {
        let de = DEOptions { polish, ..DEOptions::default() };
        SearchOptions { seed: Some(seed), ..SearchOptions::default() }.with_de(de)
    }

    #[test]
    // Purpose
    // -------
    // Differential evolution with polishing locates an interior minimum.
    //
    // Given
    // -----
    // - Unit cube in 3-D, bowl centred at (0.3, 0.7, 0.1), seed 5.
    //
    // Expect
    // ------
    // - `x_hat` within 1e-4 of the centre, cost near zero.
    fn differential_evolution_finds_interior_minimum() {
        let centre = array![0.3, 0.7, 0.1];
        let out = minimize(&Bowl, &centre, &Bounds::unit_cube(3).unwrap(), &de_options(5, true))
            .unwrap();

        for j in 0..3 {
            assert_abs_diff_eq!(out.x_hat[j], centre[j], epsilon = 1e-4);
        }
        assert!(out.value < 1e-8);
        assert!(out.cost_evals() > 0);
    }

    #[test]
    fn same_seed_reproduces_the_search() {
        let centre = array![0.6, 0.2];
        let cube = Bounds::unit_cube(2).unwrap();
        let a = minimize(&Bowl, &centre, &cube, &de_options(99, false)).unwrap();
        let b = minimize(&Bowl, &centre, &cube, &de_options(99, false)).unwrap();

        assert_eq!(a.x_hat, b.x_hat);
        assert_eq!(a.value, b.value);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    // Purpose
    // -------
    // Both strategies keep their answer inside the box when the unconstrained
    // minimum lies outside it.
    //
    // Given
    // -----
    // - Unit square, bowl centred at (2, −1).
    //
    // Expect
    // ------
    // - `x_hat` inside `[0, 1]²` and close to the nearest corner (1, 0).
    fn strategies_respect_the_box() {
        let centre = array![2.0, -1.0];
        let cube = Bounds::unit_cube(2).unwrap();
        let nm = SearchOptions {
            strategy: SearchStrategy::NelderMead,
            max_iter: 2000,
            ..SearchOptions::default()
        };

        for opts in [de_options(3, true), nm] {
            let out = minimize(&Bowl, &centre, &cube, &opts).unwrap();
            assert!(cube.contains(&out.x_hat), "{:?}", out.x_hat);
            assert_abs_diff_eq!(out.x_hat[0], 1.0, epsilon = 1e-2);
            assert_abs_diff_eq!(out.x_hat[1], 0.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn nelder_mead_from_default_start_converges() {
        let centre = array![0.55, 0.45, 0.35];
        let opts = SearchOptions::new(SearchStrategy::NelderMead, 1000, None, None, false).unwrap();

        let out = minimize(&Bowl, &centre, &Bounds::unit_cube(3).unwrap(), &opts).unwrap();

        assert!(out.converged, "{}", out.status);
        for j in 0..3 {
            assert_abs_diff_eq!(out.x_hat[j], centre[j], epsilon = 1e-3);
        }
    }

    #[test]
    // Purpose
    // -------
    // Stopping on a budget is not convergence, but still yields the best
    // point seen so far.
    fn budgets_stop_without_convergence() {
        let centre = array![0.3, 0.3, 0.3];
        let cube = Bounds::unit_cube(3).unwrap();

        let one_step = SearchOptions { max_iter: 1, ..de_options(1, false) };
        let out = minimize(&Bowl, &centre, &cube, &one_step).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, 1);
        assert!(cube.contains(&out.x_hat));

        let timed = SearchOptions {
            time_budget: Some(Duration::from_nanos(1)),
            ..de_options(1, true)
        };
        let out = minimize(&Bowl, &centre, &cube, &timed).unwrap();
        assert!(!out.converged);
        assert!(cube.contains(&out.x_hat));
    }

    #[test]
    fn check_failures_propagate() {
        let centre = array![0.5];
        let cube = Bounds::unit_cube(2).unwrap();
        let nm = SearchOptions { strategy: SearchStrategy::NelderMead, ..SearchOptions::default() };

        for opts in [de_options(1, false), nm] {
            assert_eq!(
                opts.minimize(&Bowl, &centre, &cube).unwrap_err(),
                OptError::StartDimMismatch { expected: 1, found: 2 }
            );
        }
    }

    #[test]
    fn explicit_nelder_mead_start_must_fit_the_box() {
        let centre = array![0.5, 0.5];
        let start = NelderMeadOptions { start: Some(array![0.5, 1.5]), ..NelderMeadOptions::default() };
        let opts = SearchOptions { strategy: SearchStrategy::NelderMead, ..SearchOptions::default() }
            .with_nelder_mead(start);

        assert_eq!(
            minimize(&Bowl, &centre, &Bounds::unit_cube(2).unwrap(), &opts).unwrap_err(),
            OptError::StartOutOfBounds { index: 1, value: 1.5 }
        );
    }

    #[test]
    fn evaluation_counts_are_merged() {
        let mut a = FnEvalMap::new();
        a.insert("cost_count".to_string(), 10);
        let mut b = FnEvalMap::new();
        b.insert("cost_count".to_string(), 5);
        b.insert("gradient_count".to_string(), 1);

        let merged = merge_counts(&a, &b);
        assert_eq!(merged["cost_count"], 15);
        assert_eq!(merged["gradient_count"], 1);
        assert_eq!(remaining_budget(Some(Duration::from_secs(1)), Duration::from_secs(2)), None);
        assert_eq!(remaining_budget(None, Duration::from_secs(2)), Some(None));
    }
}
