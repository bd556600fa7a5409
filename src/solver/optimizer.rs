use std::time::Duration;

use rayon::prelude::*;
use tracing::{info, span, warn, Level};

use crate::config::SolverConfig;
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::{Location, ProblemInstance, Solution};
use crate::error::RoutingError;
use crate::setup::init::{setup, setup_from_matrix};
use crate::solver::construction::construct_solution;
use crate::solver::tabu_search::search::{run_search, SearchParams};
use crate::utils::{CancellationToken, Deadline};

/// Everything that parameterises one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOptions {
    pub vehicle_count: usize,
    pub depot: usize,
    /// Per-vehicle ceiling in kilometres.
    pub max_distance: f64,
    pub search: SearchParams,
}

impl OptimizeOptions {
    pub fn new(vehicle_count: usize, depot: usize, max_distance: f64) -> Self {
        Self {
            vehicle_count,
            depot,
            max_distance,
            search: SearchParams::default(),
        }
    }

    pub fn with_time_budget(mut self, time_budget: Option<Duration>) -> Self {
        self.search.time_budget = time_budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.seed = seed;
        self
    }

    pub fn with_escape_iterations(mut self, escape_iterations: usize) -> Self {
        self.search.escape_iterations = Some(escape_iterations);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.search.max_iterations = Some(max_iterations);
        self
    }
}

impl From<&SolverConfig> for OptimizeOptions {
    fn from(config: &SolverConfig) -> Self {
        Self::new(config.vehicle_count, config.depot_index, config.max_distance_km)
            .with_time_budget(config.time_budget)
            .with_seed(config.seed)
    }
}

/// Compute one depot-anchored route per vehicle.
///
/// Fails only on caller contract violations. When the ceiling makes full
/// coverage impossible the unserved locations are listed in
/// [`Solution::unvisited`].
///
/// The search does not stop at the first local optimum: it keeps exploring
/// non-improving moves for a stagnation window sized from the instance (at
/// least 300 iterations), bounded by `time_budget`. Use [`optimize_with`]
/// and [`OptimizeOptions::with_escape_iterations`]`(0)` for pure descent.
pub fn optimize(
    locations: &[Location],
    vehicle_count: usize,
    depot_index: usize,
    max_distance: f64,
    time_budget: Option<Duration>,
) -> Result<Solution, RoutingError> {
    let options = OptimizeOptions::new(vehicle_count, depot_index, max_distance)
        .with_time_budget(time_budget);
    optimize_with(locations, &options, None)
}

/// [`optimize`] with full control over the search and optional cooperative
/// cancellation. The time budget covers matrix construction as well.
pub fn optimize_with(
    locations: &[Location],
    options: &OptimizeOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Solution, RoutingError> {
    let deadline = Deadline::start(options.search.time_budget);
    let problem = setup(
        locations,
        options.vehicle_count,
        options.depot,
        options.max_distance,
    )?;
    Ok(solve(&problem, &options.search, &deadline, cancel))
}

/// Optimize over a caller-supplied distance matrix.
pub fn optimize_matrix(
    distance_matrix: DistanceMatrix,
    options: &OptimizeOptions,
    cancel: Option<&CancellationToken>,
) -> Result<Solution, RoutingError> {
    let deadline = Deadline::start(options.search.time_budget);
    let problem = setup_from_matrix(
        distance_matrix,
        options.vehicle_count,
        options.depot,
        options.max_distance,
    )?;
    Ok(solve(&problem, &options.search, &deadline, cancel))
}

/// Construction followed by local search on a validated problem. Time spent
/// since `deadline` was started, construction included, counts against it.
pub fn solve(
    problem: &ProblemInstance,
    params: &SearchParams,
    deadline: &Deadline,
    cancel: Option<&CancellationToken>,
) -> Solution {
    let run_span = span!(
        Level::INFO,
        "optimize",
        locations = problem.location_count(),
        vehicles = problem.vehicle_count
    );
    let _guard = run_span.enter();

    let initial = construct_solution(problem);
    let (best, stats) = run_search(problem, initial, params, deadline, cancel);
    let solution = best.into_solution(problem, stats);

    if solution.is_full_coverage() {
        info!(
            "All {} locations covered, total distance {:.2} km",
            solution.coverage(),
            solution.total_distance
        );
    } else {
        warn!(
            "Full coverage infeasible under {:.1} km ceiling: {} covered, {} unvisited",
            problem.max_distance,
            solution.coverage(),
            solution.unvisited.len()
        );
    }

    solution
}

/// Run independent optimizations in parallel, one per option set.
///
/// Each run builds its own matrix and candidate solutions; results come back
/// in the order of `runs`.
pub fn optimize_batch(
    locations: &[Location],
    runs: &[OptimizeOptions],
) -> Vec<Result<Solution, RoutingError>> {
    info!("Running {} independent optimizations", runs.len());
    runs.par_iter()
        .map(|options| optimize_with(locations, options, None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TerminationReason;

    fn line_matrix(xs: &[f64]) -> DistanceMatrix {
        let rows = xs
            .iter()
            .map(|a| xs.iter().map(|b| (a - b).abs()).collect())
            .collect();
        DistanceMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn matrix_run_produces_one_route_per_vehicle() {
        let options = OptimizeOptions::new(3, 0, 100.0)
            .with_time_budget(None)
            .with_escape_iterations(20);
        let dm = line_matrix(&[0.0, 1.0, 2.0, -1.0, -2.0]);
        let solution = optimize_matrix(dm, &options, None).unwrap();

        assert_eq!(solution.routes.len(), 3);
        assert!(solution.is_full_coverage());
        // Two out-and-back trips of 4 km is optimal on a line.
        assert!((solution.total_distance - 8.0).abs() < 1e-9);
    }

    #[test]
    fn budget_interrupts_a_running_pass() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let points: Vec<(f64, f64)> = (0..1500)
            .map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();
        let rows = points
            .iter()
            .map(|a| {
                points
                    .iter()
                    .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        let dm = DistanceMatrix::from_rows(rows).unwrap();
        let budget = Duration::from_millis(100);
        let options = OptimizeOptions::new(1, 0, 1e6).with_time_budget(Some(budget));

        let started = std::time::Instant::now();
        let solution = optimize_matrix(dm, &options, None).unwrap();
        let wall = started.elapsed();

        assert_eq!(solution.stats.termination, TerminationReason::TimeBudget);
        assert!(solution.is_full_coverage());
        assert!(solution.stats.elapsed <= wall);
        assert!(wall < budget + Duration::from_millis(300), "ran for {:?}", wall);
    }

    #[test]
    fn contract_violations_are_errors() {
        let options = OptimizeOptions::new(0, 0, 60.0);
        assert!(optimize_matrix(line_matrix(&[0.0, 1.0]), &options, None).is_err());
    }

    #[test]
    fn options_follow_config() {
        let config = SolverConfig {
            vehicle_count: 4,
            seed: 9,
            time_budget: None,
            ..SolverConfig::default()
        };
        let options = OptimizeOptions::from(&config);
        assert_eq!(options.vehicle_count, 4);
        assert_eq!(options.search.seed, 9);
        assert_eq!(options.search.time_budget, None);
    }
}
