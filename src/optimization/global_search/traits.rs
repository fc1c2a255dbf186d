//! Public API surface for bounded, derivative-free minimization.
//!
//! - [`Objective`]: trait users implement for the function being minimized.
//! - [`Bounds`]: validated search box.
//! - [`SearchStrategy`], [`DEOptions`], [`NelderMeadOptions`] and
//!   [`SearchOptions`]: configuration.
//! - [`SearchOutcome`]: normalized result of a search.
//! - [`Minimizer`]: capability interface so callers can swap strategies
//!   without touching the objective.
//!
//! Convention: costs are *minimized*; every point handed to
//! [`Objective::value`] lies inside the box.
use crate::optimization::{
    errors::{OptError, OptResult},
    global_search::{
        types::{
            Cost, DEFAULT_CROSSOVER, DEFAULT_DE_TOL, DEFAULT_MAX_ITER, DEFAULT_MUTATION,
            DEFAULT_POPSIZE, DEFAULT_SD_TOLERANCE, DEFAULT_SIMPLEX_STEP, DEFAULT_START_FRACTION,
            FnEvalMap, Theta,
        },
        validation::{
            validate_bounds, validate_start, validate_value, validate_x_hat, verify_crossover,
            verify_mutation, verify_tolerance,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use std::{str::FromStr, time::Duration};

/// User-implemented objective.
///
/// - `type Data`: read-only payload carried into `value`/`check`. It is
///   shared across worker threads while a population is evaluated, hence
///   `Sync`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate the cost at a point
///   inside the box. Return a descriptive `OptError` on failure.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject unusable `data` (or a
///   start point) once, before the search starts.
pub trait Objective: Sync {
    type Data: Sync;

    fn value(&self, x: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, x: &Theta, data: &Self::Data) -> OptResult<()>;
}

/// Closed search box `[lower, upper]`, with `lower < upper` coordinate-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Theta,
    upper: Theta,
}

impl Bounds {
    /// # Errors
    /// See [`validate_bounds`].
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        validate_bounds(&lower, &upper)?;
        Ok(Bounds { lower, upper })
    }

    /// The unit cube `[0, 1]^dim`.
    ///
    /// # Errors
    /// [`OptError::EmptyBounds`] if `dim == 0`.
    pub fn unit_cube(dim: usize) -> OptResult<Self> {
        Bounds::new(Theta::zeros(dim), Theta::ones(dim))
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    pub fn contains(&self, x: &Theta) -> bool {
        validate_start(x, &self.lower, &self.upper).is_ok()
    }

    /// `lower + fraction·(upper − lower)`, coordinate-wise.
    pub fn point_at(&self, fraction: f64) -> Theta {
        &self.lower + &((&self.upper - &self.lower) * fraction)
    }
}

/// Which strategy [`SearchOptions`] dispatches to.
///
/// Parsing accepts case-insensitive `"differential_evolution"` / `"de"` and
/// `"nelder_mead"` / `"nm"`; anything else is
/// `OptError::InvalidStrategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Population search over the whole box.
    #[default]
    DifferentialEvolution,
    /// Local simplex search in logistic coordinates.
    NelderMead,
}

impl FromStr for SearchStrategy {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "differential_evolution" | "de" => Ok(SearchStrategy::DifferentialEvolution),
            "nelder_mead" | "nm" => Ok(SearchStrategy::NelderMead),
            _ => Err(OptError::InvalidStrategy {
                name: s.to_string(),
                reason: "Valid options are 'differential_evolution' or 'nelder_mead'.",
            }),
        }
    }
}

/// Differential-evolution settings.
///
/// - `popsize`: members per dimension; the population is
///   `max(popsize · dim, 5)`.
/// - `mutation`: dither range `[lower, upper)` for the scale factor `F`,
///   redrawn once per generation (a degenerate range means constant `F`).
/// - `crossover`: binomial crossover probability `CR`.
/// - `tol`, `atol`: stop once `std(costs) <= atol + tol·|mean(costs)|`.
/// - `polish`: run a simplex search from the best member afterwards and keep
///   it only if it improves the cost.
///
/// Default: `popsize = 15`, `mutation = (0.5, 1.0)`, `crossover = 0.7`,
/// `tol = 0.01`, `atol = 0`, `polish = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct DEOptions {
    pub popsize: usize,
    pub mutation: (f64, f64),
    pub crossover: f64,
    pub tol: f64,
    pub atol: f64,
    pub polish: bool,
}

impl DEOptions {
    /// # Errors
    /// - `OptError::InvalidPopulationSize` if `popsize == 0`.
    /// - `OptError::InvalidMutation`, `OptError::InvalidCrossover`,
    ///   `OptError::InvalidTolerance` for out-of-range settings.
    pub fn new(
        popsize: usize, mutation: (f64, f64), crossover: f64, tol: f64, atol: f64, polish: bool,
    ) -> OptResult<Self> {
        if popsize == 0 {
            return Err(OptError::InvalidPopulationSize {
                size: popsize,
                reason: "Population multiplier must be greater than zero.",
            });
        }
        verify_mutation(mutation.0, mutation.1)?;
        verify_crossover(crossover)?;
        verify_tolerance(tol)?;
        verify_tolerance(atol)?;
        Ok(Self { popsize, mutation, crossover, tol, atol, polish })
    }
}

impl Default for DEOptions {
    fn default() -> Self {
        Self {
            popsize: DEFAULT_POPSIZE,
            mutation: DEFAULT_MUTATION,
            crossover: DEFAULT_CROSSOVER,
            tol: DEFAULT_DE_TOL,
            atol: 0.0,
            polish: true,
        }
    }
}

/// Simplex-search settings.
///
/// - `start`: starting point in box coordinates; `None` means 20% of the way
///   along each side (`(0.2, 0.2, 0.2)` on the unit cube).
/// - `step`: initial simplex edge in unconstrained coordinates.
/// - `sd_tolerance`: stop once the standard deviation of the vertex costs
///   falls below this value.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMeadOptions {
    pub start: Option<Theta>,
    pub step: f64,
    pub sd_tolerance: f64,
}

impl NelderMeadOptions {
    /// # Errors
    /// - `OptError::InvalidSimplexStep` if `step` is not finite and positive.
    /// - `OptError::InvalidTolerance` for a bad `sd_tolerance`.
    pub fn new(start: Option<Theta>, step: f64, sd_tolerance: f64) -> OptResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(OptError::InvalidSimplexStep {
                step,
                reason: "Simplex step must be finite and positive.",
            });
        }
        verify_tolerance(sd_tolerance)?;
        Ok(Self { start, step, sd_tolerance })
    }

    /// Starting point inside `bounds`.
    ///
    /// # Errors
    /// `OptError::StartDimMismatch` / `OptError::StartOutOfBounds` for an
    /// explicit start that does not fit the box.
    pub fn start_in(&self, bounds: &Bounds) -> OptResult<Theta> {
        match &self.start {
            Some(x0) => {
                validate_start(x0, bounds.lower(), bounds.upper())?;
                Ok(x0.clone())
            }
            None => Ok(bounds.point_at(DEFAULT_START_FRACTION)),
        }
    }
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self { start: None, step: DEFAULT_SIMPLEX_STEP, sd_tolerance: DEFAULT_SD_TOLERANCE }
    }
}

/// Search-level configuration.
///
/// - `strategy`: [`SearchStrategy`].
/// - `max_iter`: generations (DE) or simplex iterations (NM).
/// - `time_budget`: optional wall-clock limit; when hit, the best point so
///   far is returned with `converged = false`.
/// - `seed`: `Some(s)` makes differential evolution reproducible; `None`
///   seeds from entropy and results vary from run to run.
/// - `verbose`: with the `obs_slog` feature, print the initial cost and
///   attach a terminal observer.
/// - `de`, `nelder_mead`: per-strategy settings (the simplex settings are
///   also used for the DE polish step).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub strategy: SearchStrategy,
    pub max_iter: usize,
    pub time_budget: Option<Duration>,
    pub seed: Option<u64>,
    pub verbose: bool,
    pub de: DEOptions,
    pub nelder_mead: NelderMeadOptions,
}

impl SearchOptions {
    /// # Errors
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    /// - `OptError::InvalidTimeBudget` for a zero budget.
    pub fn new(
        strategy: SearchStrategy, max_iter: usize, time_budget: Option<Duration>,
        seed: Option<u64>, verbose: bool,
    ) -> OptResult<Self> {
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        if time_budget.is_some_and(|budget| budget.is_zero()) {
            return Err(OptError::InvalidTimeBudget);
        }
        Ok(Self {
            strategy,
            max_iter,
            time_budget,
            seed,
            verbose,
            de: DEOptions::default(),
            nelder_mead: NelderMeadOptions::default(),
        })
    }

    pub fn with_de(mut self, de: DEOptions) -> Self {
        self.de = de;
        self
    }

    pub fn with_nelder_mead(mut self, nelder_mead: NelderMeadOptions) -> Self {
        self.nelder_mead = nelder_mead;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::DifferentialEvolution,
            max_iter: DEFAULT_MAX_ITER,
            time_budget: None,
            seed: None,
            verbose: false,
            de: DEOptions::default(),
            nelder_mead: NelderMeadOptions::default(),
        }
    }
}

/// Canonical result of a bounded search.
///
/// - `x_hat`: best point found, always inside the box.
/// - `value`: cost at `x_hat`.
/// - `converged`: `true` only when the solver met its own convergence test;
///   budget exhaustion (iterations or time) leaves it `false`.
/// - `status`: human-readable termination status.
/// - `iterations`: generations / simplex iterations performed.
/// - `fn_evals`: evaluation counters reported by `argmin`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub x_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl SearchOutcome {
    /// Build a validated [`SearchOutcome`] from raw solver state.
    ///
    /// # Errors
    /// Propagates validation errors for `x_hat` or `value`.
    pub fn new(
        x_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let x_hat = validate_x_hat(x_hat_opt)?;
        validate_value(value)?;
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        Ok(Self { x_hat, value, converged, status, iterations: iterations as usize, fn_evals })
    }

    /// Number of objective evaluations (`cost_count`).
    pub fn cost_evals(&self) -> u64 {
        self.fn_evals.get("cost_count").copied().unwrap_or(0)
    }
}

/// Capability interface over bounded minimizers.
pub trait Minimizer {
    fn minimize<F: Objective>(
        &self, f: &F, data: &F::Data, bounds: &Bounds,
    ) -> OptResult<SearchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn strategy_parsing_is_case_insensitive() {
        assert_eq!("Differential_Evolution".parse::<SearchStrategy>().unwrap(), SearchStrategy::DifferentialEvolution);
        assert_eq!("nelder-mead".parse::<SearchStrategy>().unwrap(), SearchStrategy::NelderMead);
        assert!(matches!("lbfgs".parse::<SearchStrategy>(), Err(OptError::InvalidStrategy { .. })));
    }

    #[test]
    fn options_reject_degenerate_settings() {
        assert!(matches!(
            SearchOptions::new(SearchStrategy::NelderMead, 0, None, None, false),
            Err(OptError::InvalidMaxIter { .. })
        ));
        assert_eq!(
            SearchOptions::new(SearchStrategy::NelderMead, 10, Some(Duration::ZERO), None, false)
                .unwrap_err(),
            OptError::InvalidTimeBudget
        );
        assert!(DEOptions::new(0, DEFAULT_MUTATION, 0.7, 0.01, 0.0, false).is_err());
        assert!(NelderMeadOptions::new(None, 0.0, 1e-8).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The default simplex start sits 20% of the way along each side and an
    // explicit start must fit the box.
    fn nelder_mead_start_defaults_and_validates() {
        let cube = Bounds::unit_cube(3).unwrap();
        let opts = NelderMeadOptions::default();
        assert_eq!(opts.start_in(&cube).unwrap(), array![0.2, 0.2, 0.2]);

        let bad = NelderMeadOptions { start: Some(array![0.5, 0.5]), ..opts };
        assert_eq!(
            bad.start_in(&cube).unwrap_err(),
            OptError::StartDimMismatch { expected: 3, found: 2 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Only the solver's own convergence test counts as converged.
    fn outcome_converged_only_on_solver_convergence() {
        let ok = SearchOutcome::new(
            Some(array![0.1]),
            1.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            3,
            FnEvalMap::new(),
        )
        .unwrap();
        assert!(ok.converged);

        let budget = SearchOutcome::new(
            Some(array![0.1]),
            1.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            3,
            FnEvalMap::new(),
        )
        .unwrap();
        assert!(!budget.converged);
        assert!(budget.status.contains("MaxItersReached"));
    }
}
