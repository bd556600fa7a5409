use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::domain::types::ProblemInstance;
use crate::solver::plan::Plan;

use super::neighborhood::{apply_move, Move};

/// Return to the best plan seen so far if the search has drifted away from it.
pub fn perform_rollback(current: &Plan, best_so_far: &Plan) -> Plan {
    if current.routes != best_so_far.routes {
        best_so_far.clone()
    } else {
        current.clone()
    }
}

/// Shake a plan with random relocations that keep every route within the
/// ceiling. Cost is ignored; coverage never drops.
///
/// Returns the number of relocations applied.
pub fn random_kick(
    plan: &mut Plan,
    problem: &ProblemInstance,
    rng: &mut ChaCha8Rng,
    strength: usize,
) -> usize {
    let vehicles = plan.routes.len();
    let mut applied = 0;

    for _ in 0..strength.saturating_mul(4) {
        if applied == strength || plan.visit_count() == 0 {
            break;
        }

        let from_route = rng.gen_range(0..vehicles);
        let from_len = plan.routes[from_route].len();
        if from_len == 0 {
            continue;
        }
        let from_pos = rng.gen_range(0..from_len);
        let to_route = rng.gen_range(0..vehicles);
        let to_len = if to_route == from_route {
            from_len - 1
        } else {
            plan.routes[to_route].len()
        };
        let to_pos = rng.gen_range(0..=to_len);
        if to_route == from_route && to_pos == from_pos {
            continue;
        }

        let mv = Move::Relocate {
            from_route,
            from_pos,
            to_route,
            to_pos,
        };
        if let Some(next) = apply_move(plan, mv, problem) {
            trace!("Kick {:?}", mv);
            *plan = next;
            applied += 1;
        }
    }

    applied
}
