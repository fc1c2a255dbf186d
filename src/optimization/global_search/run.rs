//! Execution helper that runs an `argmin` solver on a bounded search problem
//! and returns a crate-friendly [`SearchOutcome`].
use crate::optimization::{
    errors::OptResult,
    global_search::{
        adapter::{ArgMinAdapter, ParamMapping},
        traits::{Bounds, Objective, SearchOptions, SearchOutcome},
        types::{SearchState, Theta},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::CostFunction;
use argmin::core::{Executor, Solver, State};

/// Run an `argmin` solver for a bounded search problem.
///
/// This is the shared runner used by both strategies. It wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - the chosen `Solver`,
/// - the optional starting point `theta0` (solver coordinates),
/// - optional observers (behind the `obs_slog` feature),
/// - `max_iters` and the optional wall-clock budget,
///   then executes the solver and converts the result into [`SearchOutcome`].
///
/// # Type Parameters
/// - `F`: objective implementing [`Objective`].
/// - `S`: any `argmin` solver over [`SearchState`] whose problem is
///   `ArgMinAdapter<'a, F>`.
///
/// # Arguments
/// - `theta0`: optional starting point; set on the state via
///   `state.param(theta0)` when present.
/// - `opts`: search options (iteration cap, time budget, verbosity).
/// - `problem`: adapter over the objective, its data and the box.
/// - `solver`: a fully constructed solver.
///
/// # Feature flags
/// If `obs_slog` is enabled and `opts.verbose == true`, a terminal slog
/// observer is attached with `ObserverMode::Always` and the cost at the
/// starting point (or the box centre) is printed once before the run.
///
/// # Returns
/// A [`SearchOutcome`] whose `x_hat` is mapped back into box coordinates.
///
/// # Errors
/// - Propagates any `argmin` runtime error, including objective failures
///   raised through the adapter.
/// - Propagates validation errors when building the [`SearchOutcome`].
pub fn run_search<'a, F, S>(
    theta0: Option<Theta>, opts: &SearchOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<SearchOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, SearchState>,
{
    let bounds: Bounds = problem.bounds.clone();
    let mapping: ParamMapping = problem.mapping;

    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(theta0.as_ref(), &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    if let Some(theta0) = theta0 {
        optimizer = optimizer.configure(|state| state.param(theta0));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    let max_iter = opts.max_iter as u64;
    optimizer = optimizer.configure(|state| state.max_iters(max_iter));
    if let Some(budget) = opts.time_budget {
        optimizer = optimizer.timeout(budget);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    SearchOutcome::new(
        result.take_best_param().map(|theta| mapping.to_box(&theta, &bounds)),
        result.get_best_cost(),
        termination,
        iterations,
        function_counts,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: Option<&Theta>, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let start = match theta0 {
        Some(theta) => theta.clone(),
        None => problem.mapping.from_box(&problem.bounds.point_at(0.5), &problem.bounds),
    };
    let c0 = problem.cost(&start)?;
    eprintln!("init: cost(x0) = {c0:.6}, dim = {}", problem.bounds.dim());
    Ok(())
}
