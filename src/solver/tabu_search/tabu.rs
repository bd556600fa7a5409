use std::collections::VecDeque;

use crate::config::constant::DISTANCE_TOLERANCE;
use crate::evaluation::fitness::Score;
use crate::solver::plan::Plan;

use super::neighborhood::Candidate;

/// Whether the search may take `candidate`.
///
/// A candidate is admissible when none of the locations it moves are tabu,
/// or when it would produce a new best solution (aspiration). Covering an
/// unvisited location is never tabu.
pub fn is_admissible(
    candidate: &Candidate,
    plan: &Plan,
    tabu_list: &VecDeque<usize>,
    best_so_far: &Score,
) -> bool {
    candidate.mv.covers_location()
        || candidate.score.improves_on(best_so_far, DISTANCE_TOLERANCE)
        || !candidate.mv.touches_any(plan, |loc| tabu_list.contains(&loc))
}

/// Record freshly moved locations and trim the list to `len_tabu_list`.
pub fn insert_and_adjust_tabu_list(
    tabu_list: &mut VecDeque<usize>,
    moved: &[usize],
    len_tabu_list: usize,
) {
    for &loc in moved {
        tabu_list.retain(|&t| t != loc);
        tabu_list.push_front(loc);
    }

    while tabu_list.len() > len_tabu_list {
        tabu_list.pop_back();
    }
}
