//! Differential evolution as an `argmin` solver.
//!
//! Purpose
//! -------
//! Minimize a cost over a closed box without derivatives, using a population
//! of candidate points that evolves by mutation, crossover and greedy
//! selection. One `argmin` iteration is one generation.
//!
//! Key behaviors
//! -------------
//! - Initial population: Latin hypercube over the box, `max(popsize·dim, 5)`
//!   members.
//! - Mutation `best1bin`: `v = x_best + F·(x_r0 − x_r1)` with `r0 ≠ r1`
//!   drawn from the members other than the target; `F` is dithered, i.e.
//!   redrawn uniformly from the mutation range once per generation.
//! - Binomial crossover with probability `CR`; one coordinate chosen at
//!   random always comes from the mutant.
//! - Mutant coordinates that leave the box are resampled uniformly inside
//!   it, so every evaluated point is feasible.
//! - Selection is deferred: the whole generation of trials is built first
//!   and evaluated with `Problem::bulk_cost` (parallel under `argmin`'s
//!   `rayon` feature), then each trial replaces its target if it is no worse.
//! - Convergence: `std(costs) <= atol + tol·|mean(costs)|`, reported as
//!   `TerminationReason::SolverConverged`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Members always lie inside the box.
//! - The population, its costs and the index of the best member stay in
//!   sync after `init` and every `next_iter`.
//! - With a fixed seed the sequence of generations is deterministic:
//!   random draws happen on one thread, parallel work only evaluates costs.
use crate::optimization::{
    errors::OptResult,
    global_search::{
        traits::{Bounds, DEOptions},
        types::{Cost, MIN_POPULATION, SearchState, Theta},
    },
};
use argmin::core::{
    CostFunction, Error, KV, Problem, Solver, SyncAlias, TerminationReason, TerminationStatus,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Differential-evolution solver state.
#[derive(Debug, Clone)]
pub struct DifferentialEvolution {
    bounds: Bounds,
    size: usize,
    mutation: (f64, f64),
    crossover: f64,
    tol: f64,
    atol: f64,
    rng: StdRng,
    population: Vec<Theta>,
    costs: Vec<Cost>,
    best: usize,
}

impl DifferentialEvolution {
    /// Build a solver over `bounds`.
    ///
    /// Parameters
    /// ----------
    /// - `bounds`: validated search box.
    /// - `opts`: validated [`DEOptions`].
    /// - `seed`: `Some(s)` for a reproducible run, `None` for entropy.
    pub fn new(bounds: Bounds, opts: &DEOptions, seed: Option<u64>) -> OptResult<Self> {
        let DEOptions { popsize, mutation, crossover, tol, atol, .. } = DEOptions::new(
            opts.popsize,
            opts.mutation,
            opts.crossover,
            opts.tol,
            opts.atol,
            opts.polish,
        )?;
        let size = (popsize * bounds.dim()).max(MIN_POPULATION);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            bounds,
            size,
            mutation,
            crossover,
            tol,
            atol,
            rng,
            population: Vec::new(),
            costs: Vec::new(),
            best: 0,
        })
    }

    pub fn population_size(&self) -> usize {
        self.size
    }

    pub fn population(&self) -> &[Theta] {
        &self.population
    }

    fn uniform_in_side(&mut self, j: usize) -> f64 {
        let lo = self.bounds.lower()[j];
        let hi = self.bounds.upper()[j];
        lo + (hi - lo) * self.rng.gen::<f64>()
    }

    // One stratum per member along every axis, strata shuffled per axis.
    fn latin_hypercube(&mut self) -> Vec<Theta> {
        let n = self.size;
        let dim = self.bounds.dim();
        let mut population = vec![Theta::zeros(dim); n];
        let mut strata: Vec<usize> = (0..n).collect();
        for j in 0..dim {
            strata.shuffle(&mut self.rng);
            let lo = self.bounds.lower()[j];
            let width = self.bounds.upper()[j] - lo;
            for (member, &stratum) in population.iter_mut().zip(strata.iter()) {
                let u = (stratum as f64 + self.rng.gen::<f64>()) / n as f64;
                member[j] = lo + width * u;
            }
        }
        population
    }

    fn scale_factor(&mut self) -> f64 {
        let (lo, hi) = self.mutation;
        if hi > lo { self.rng.gen_range(lo..hi) } else { lo }
    }

    // Two distinct members, both different from `target`.
    fn pick_pair(&mut self, target: usize) -> (usize, usize) {
        let picks = rand::seq::index::sample(&mut self.rng, self.size, 3);
        let mut others = picks.into_iter().filter(|&i| i != target);
        let r0 = others.next().unwrap_or(0);
        let r1 = others.next().unwrap_or(1);
        (r0, r1)
    }

    fn trial(&mut self, target: usize, scale: f64) -> Theta {
        let dim = self.bounds.dim();
        let (r0, r1) = self.pick_pair(target);
        let fill = self.rng.gen_range(0..dim);
        let mut trial = self.population[target].clone();
        for j in 0..dim {
            if j == fill || self.rng.gen::<f64>() < self.crossover {
                let v = self.population[self.best][j]
                    + scale * (self.population[r0][j] - self.population[r1][j]);
                let inside = v >= self.bounds.lower()[j] && v <= self.bounds.upper()[j];
                trial[j] = if inside { v } else { self.uniform_in_side(j) };
            }
        }
        trial
    }

    fn update_best(&mut self) {
        self.best = self
            .costs
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
    }

    fn converged(&self) -> bool {
        let n = self.costs.len() as f64;
        if n == 0.0 {
            return false;
        }
        let mean = self.costs.iter().sum::<f64>() / n;
        let var = self.costs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        var.sqrt() <= self.atol + self.tol * mean.abs()
    }

    fn best_state(&self, state: SearchState) -> SearchState {
        state.param(self.population[self.best].clone()).cost(self.costs[self.best])
    }
}

impl<O> Solver<O, SearchState> for DifferentialEvolution
where
    O: CostFunction<Param = Theta, Output = Cost> + SyncAlias,
{
    const NAME: &'static str = "Differential Evolution";

    fn init(
        &mut self, problem: &mut Problem<O>, state: SearchState,
    ) -> Result<(SearchState, Option<KV>), Error> {
        self.population = self.latin_hypercube();
        self.costs = problem.bulk_cost(&self.population)?;
        self.update_best();
        Ok((self.best_state(state), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: SearchState,
    ) -> Result<(SearchState, Option<KV>), Error> {
        let scale = self.scale_factor();
        let trials: Vec<Theta> = (0..self.size).map(|i| self.trial(i, scale)).collect();
        let trial_costs = problem.bulk_cost(&trials)?;

        for (i, (trial, cost)) in trials.into_iter().zip(trial_costs).enumerate() {
            if cost <= self.costs[i] {
                self.population[i] = trial;
                self.costs[i] = cost;
            }
        }
        self.update_best();
        Ok((self.best_state(state), None))
    }

    fn terminate(&mut self, _state: &SearchState) -> TerminationStatus {
        if self.converged() {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        } else {
            TerminationStatus::NotTerminated
        }
    }
}
