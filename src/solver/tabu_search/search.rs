use std::collections::VecDeque;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, span, trace, warn, Level};

use crate::config::constant::{
    DISTANCE_TOLERANCE, SEED, TABU_TENURE_LOWER, TABU_TENURE_UPPER, TIME_BUDGET_SECS,
};
use crate::domain::types::{ProblemInstance, SearchStats, TerminationReason};
use crate::solver::plan::Plan;
use crate::utils::{calculate_max_no_improvement, CancellationToken, Deadline};

use super::diversification::{perform_rollback, random_kick};
use super::neighborhood::{apply_move, find_neighbours, Candidate};
use super::tabu::{insert_and_adjust_tabu_list, is_admissible};

/// Knobs of the improvement phase.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Hard wall-clock cutoff; `None` disables it.
    pub time_budget: Option<Duration>,
    pub max_iterations: Option<usize>,
    /// Non-improving iterations allowed after the first local optimum.
    /// `Some(0)` stops at the first pass without an improving move; `None`
    /// derives the window from the instance size.
    pub escape_iterations: Option<usize>,
    /// Tabu tenure is redrawn from `lower..upper` every 20 iterations.
    pub tabu_tenure: (usize, usize),
    pub seed: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            time_budget: Some(Duration::from_secs(TIME_BUDGET_SECS)),
            max_iterations: None,
            escape_iterations: None,
            tabu_tenure: (TABU_TENURE_LOWER, TABU_TENURE_UPPER),
            seed: SEED,
        }
    }
}

/// Mutable state of one search run.
#[derive(Debug)]
pub struct SearchState {
    pub current_solution: Plan,
    pub best_so_far: Plan,
    pub best_so_far_iteration: usize,
    pub stagnation: usize,
    pub max_stagnation: usize,
    pub improvements: usize,
    pub kicks: usize,
    pub tabu_list: VecDeque<usize>,
    pub len_tabu_list: usize,
    pub tenure_bounds: (usize, usize),
    pub rng: ChaCha8Rng,
}

impl SearchState {
    pub fn new(initial_solution: Plan, params: &SearchParams) -> Self {
        let (lower, upper) = params.tabu_tenure;
        Self {
            current_solution: initial_solution.clone(),
            best_so_far: initial_solution,
            best_so_far_iteration: 0,
            stagnation: 0,
            max_stagnation: 0,
            improvements: 0,
            kicks: 0,
            tabu_list: VecDeque::new(),
            len_tabu_list: (lower + upper) / 2,
            tenure_bounds: (lower, upper),
            rng: ChaCha8Rng::seed_from_u64(params.seed),
        }
    }
}

/// Improve `initial` by tabu-guided local search and return the best
/// feasible plan found, never an infeasible one.
///
/// The search ends at the first of: `deadline`, cancellation, the iteration
/// cap, or the stagnation window running out (with a zero window, the first
/// pass that finds no improving move). The deadline is started by the caller
/// so that setup and construction count against the same budget.
pub fn run_search(
    problem: &ProblemInstance,
    initial: Plan,
    params: &SearchParams,
    deadline: &Deadline,
    cancel: Option<&CancellationToken>,
) -> (Plan, SearchStats) {
    let escape_limit = params
        .escape_iterations
        .unwrap_or_else(|| calculate_max_no_improvement(problem.location_count()));
    let two_opt = problem.distance_matrix.is_symmetric();
    let is_cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);
    let should_stop = || is_cancelled() || deadline.expired();

    let mut state = SearchState::new(initial, params);
    let mut iteration = 0;

    let loop_span = span!(Level::INFO, "main_search_loop", escape_limit = escape_limit);
    let _loop_guard = loop_span.enter();

    let termination = loop {
        if is_cancelled() {
            break TerminationReason::Cancelled;
        }
        if deadline.expired() {
            break TerminationReason::TimeBudget;
        }
        if params.max_iterations.is_some_and(|max| iteration >= max) {
            break TerminationReason::IterationLimit;
        }

        iteration += 1;
        let step = perform_iteration(
            iteration,
            &mut state,
            problem,
            two_opt,
            escape_limit,
            &should_stop,
        );
        match step {
            Step::Continue => {}
            Step::Interrupted => {
                break if is_cancelled() {
                    TerminationReason::Cancelled
                } else {
                    TerminationReason::TimeBudget
                };
            }
            Step::Finished(reason) => break reason,
        }
    };

    let stats = SearchStats {
        iterations: iteration,
        improvements: state.improvements,
        best_iteration: state.best_so_far_iteration,
        elapsed: deadline.elapsed(),
        termination,
    };
    report_final_stats(&state, &stats);

    (state.best_so_far, stats)
}

enum Step {
    Continue,
    Interrupted,
    Finished(TerminationReason),
}

/// One neighbourhood pass followed by the move it selects.
fn perform_iteration(
    iteration: usize,
    state: &mut SearchState,
    problem: &ProblemInstance,
    two_opt: bool,
    escape_limit: usize,
    should_stop: &dyn Fn() -> bool,
) -> Step {
    let iter_span = span!(Level::DEBUG, "iteration", iter = iteration);
    let _iter_guard = iter_span.enter();

    let current_score = state.current_solution.score();
    let best_score = state.best_so_far.score();
    let admissible = |candidate: &Candidate| {
        is_admissible(candidate, &state.current_solution, &state.tabu_list, &best_score)
    };
    let Some(neighbourhood) =
        find_neighbours(&state.current_solution, problem, two_opt, &admissible, should_stop)
    else {
        return Step::Interrupted;
    };

    let Some(best) = neighbourhood.best else {
        return Step::Finished(TerminationReason::LocalOptimum);
    };
    if escape_limit == 0 && !best.improves(&current_score) {
        return Step::Finished(TerminationReason::LocalOptimum);
    }

    let Some(chosen) = neighbourhood.best_admissible else {
        debug!("Every candidate is tabu at iteration {}", iteration);
        return Step::Finished(TerminationReason::Stagnation);
    };
    trace!("chosen move: {:?} ({:+.3} km)", chosen.mv, chosen.distance_delta);

    let moved = chosen.mv.touched(&state.current_solution);
    if let Some(next) = apply_move(&state.current_solution, chosen.mv, problem) {
        state.current_solution = next;
    } else {
        warn!("Move {:?} breaks the ceiling once recomputed, skipping", chosen.mv);
    }
    insert_and_adjust_tabu_list(&mut state.tabu_list, &moved, state.len_tabu_list);

    if state
        .current_solution
        .score()
        .improves_on(&best_score, DISTANCE_TOLERANCE)
    {
        state.best_so_far = state.current_solution.clone();
        state.best_so_far_iteration = iteration;
        state.improvements += 1;
        state.max_stagnation = state.max_stagnation.max(state.stagnation);
        state.stagnation = 0;
        debug!(
            "New best at iteration {}: {:.3} km, {} unvisited",
            iteration,
            state.best_so_far.total_distance(),
            state.best_so_far.unvisited.len()
        );
    } else {
        state.stagnation += 1;
        if state.stagnation >= escape_limit {
            return Step::Finished(TerminationReason::Stagnation);
        }
        if state.stagnation == escape_limit / 2 {
            apply_diversifications(state, problem);
        }
    }

    let (lower, upper) = state.tenure_bounds;
    if iteration % 20 == 0 && lower < upper {
        state.len_tabu_list = state.rng.gen_range(lower..upper);
    }

    Step::Continue
}

/// Roll back to the best plan and shake it.
fn apply_diversifications(state: &mut SearchState, problem: &ProblemInstance) {
    let mut restart = perform_rollback(&state.current_solution, &state.best_so_far);
    let strength = 1 + restart.visit_count() / 10;
    let applied = random_kick(&mut restart, problem, &mut state.rng, strength);
    debug!("Diversified from best with {} random relocations", applied);

    state.current_solution = restart;
    state.tabu_list.clear();
    state.kicks += 1;
}

fn report_final_stats(state: &SearchState, stats: &SearchStats) {
    info!(
        "Search finished after {} iterations ({:?}): best at iteration {}, {:.2} km, {} unvisited",
        stats.iterations,
        stats.termination,
        stats.best_iteration,
        state.best_so_far.total_distance(),
        state.best_so_far.unvisited.len()
    );
    debug!(
        "Improvements: {}, max stagnation: {}, kicks: {}, elapsed {:?}",
        state.improvements, state.max_stagnation, state.kicks, stats.elapsed
    );
}
