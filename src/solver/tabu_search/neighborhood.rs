use crate::config::constant::DISTANCE_TOLERANCE;
use crate::domain::types::ProblemInstance;
use crate::evaluation::fitness::Score;
use crate::evaluation::penalty::within_ceiling;
use crate::solver::plan::Plan;

/// A structural change to a [`Plan`]. Positions index the visit lists, which
/// exclude the depot anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Serve an unvisited location at `pos` of `route`.
    Insert {
        location: usize,
        route: usize,
        pos: usize,
    },
    /// Move the visit at `from_pos` of `from_route` to `to_pos` of `to_route`.
    /// For an intra-route move `to_pos` indexes the list after removal.
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Exchange two visits of different routes.
    Swap {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    /// Reverse the visits `from..=to` of `route`.
    TwoOpt { route: usize, from: usize, to: usize },
}

impl Move {
    fn touched_pair(&self, plan: &Plan) -> (usize, Option<usize>) {
        match *self {
            Move::Insert { location, .. } => (location, None),
            Move::Relocate {
                from_route,
                from_pos,
                ..
            } => (plan.routes[from_route][from_pos], None),
            Move::Swap {
                route_a,
                pos_a,
                route_b,
                pos_b,
            } => (plan.routes[route_a][pos_a], Some(plan.routes[route_b][pos_b])),
            Move::TwoOpt { route, from, to } => {
                (plan.routes[route][from], Some(plan.routes[route][to]))
            }
        }
    }

    /// Locations whose placement this move changes.
    pub fn touched(&self, plan: &Plan) -> Vec<usize> {
        let (first, second) = self.touched_pair(plan);
        std::iter::once(first).chain(second).collect()
    }

    /// Whether `pred` holds for any location this move changes.
    pub fn touches_any(&self, plan: &Plan, mut pred: impl FnMut(usize) -> bool) -> bool {
        let (first, second) = self.touched_pair(plan);
        pred(first) || second.is_some_and(pred)
    }

    pub fn covers_location(&self) -> bool {
        matches!(self, Move::Insert { .. })
    }
}

/// A feasible move together with the score it leads to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub mv: Move,
    pub distance_delta: f64,
    pub score: Score,
}

impl Candidate {
    pub fn improves(&self, current: &Score) -> bool {
        self.score.improves_on(current, DISTANCE_TOLERANCE)
    }
}

/// Outcome of one neighbourhood pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Neighbourhood {
    /// Best feasible move, tabu or not.
    pub best: Option<Candidate>,
    /// Best feasible move the acceptance rule admits.
    pub best_admissible: Option<Candidate>,
}

/// Move evaluations between two polls of the stop condition.
const STOP_POLL_INTERVAL: usize = 256;

struct Scan<'a> {
    current: Score,
    admissible: &'a dyn Fn(&Candidate) -> bool,
    should_stop: &'a dyn Fn() -> bool,
    evaluated: usize,
    found: Neighbourhood,
}

impl Scan<'_> {
    /// Count one evaluation and report whether the pass has to be abandoned.
    fn interrupted(&mut self) -> bool {
        self.evaluated += 1;
        self.evaluated % STOP_POLL_INTERVAL == 0 && (self.should_stop)()
    }

    fn offer(&mut self, mv: Move, delta: f64) {
        let unvisited = if mv.covers_location() {
            self.current.unvisited - 1
        } else {
            self.current.unvisited
        };
        let candidate = Candidate {
            mv,
            distance_delta: delta,
            score: Score::new(unvisited, self.current.distance + delta),
        };

        if beats(&candidate, self.found.best) {
            self.found.best = Some(candidate);
        }
        if beats(&candidate, self.found.best_admissible) && (self.admissible)(&candidate) {
            self.found.best_admissible = Some(candidate);
        }
    }
}

/// Strictly better score; on ties the earlier enumerated move is kept.
fn beats(candidate: &Candidate, incumbent: Option<Candidate>) -> bool {
    incumbent.map_or(true, |held| candidate.score.total_cmp(&held.score).is_lt())
}

/// Score every feasible move around `plan`, keeping the best one and the best
/// one `admissible` accepts.
///
/// Moves that would push a route past the ceiling are dropped. Enumeration
/// order is fixed so the outcome is deterministic. `should_stop` is polled
/// at the start and periodically throughout the pass; `None` means it fired.
pub fn find_neighbours(
    plan: &Plan,
    problem: &ProblemInstance,
    two_opt: bool,
    admissible: &dyn Fn(&Candidate) -> bool,
    should_stop: &dyn Fn() -> bool,
) -> Option<Neighbourhood> {
    if should_stop() {
        return None;
    }

    let mut scan = Scan {
        current: plan.score(),
        admissible,
        should_stop,
        evaluated: 0,
        found: Neighbourhood::default(),
    };
    let vehicles = plan.routes.len();
    let ceiling = problem.max_distance;

    for &location in &plan.unvisited {
        for route in 0..vehicles {
            for pos in 0..=plan.routes[route].len() {
                if scan.interrupted() {
                    return None;
                }
                let delta = insertion_delta(plan, problem, location, route, pos);
                if within_ceiling(plan.distances[route] + delta, ceiling) {
                    scan.offer(Move::Insert { location, route, pos }, delta);
                }
            }
        }
    }

    for from_route in 0..vehicles {
        for from_pos in 0..plan.routes[from_route].len() {
            let removal = removal_delta(plan, problem, from_route, from_pos);
            let x = plan.routes[from_route][from_pos];
            for to_route in 0..vehicles {
                let same_route = to_route == from_route;
                let to_len = if same_route {
                    plan.routes[from_route].len() - 1
                } else {
                    plan.routes[to_route].len()
                };
                for to_pos in 0..=to_len {
                    if same_route && to_pos == from_pos {
                        continue;
                    }
                    if scan.interrupted() {
                        return None;
                    }
                    let mv = Move::Relocate {
                        from_route,
                        from_pos,
                        to_route,
                        to_pos,
                    };
                    if same_route {
                        let delta = removal
                            + reinsertion_delta(plan, problem, from_route, from_pos, to_pos);
                        if within_ceiling(plan.distances[from_route] + delta, ceiling) {
                            scan.offer(mv, delta);
                        }
                    } else {
                        let gain = insertion_delta(plan, problem, x, to_route, to_pos);
                        if within_ceiling(plan.distances[from_route] + removal, ceiling)
                            && within_ceiling(plan.distances[to_route] + gain, ceiling)
                        {
                            scan.offer(mv, removal + gain);
                        }
                    }
                }
            }
        }
    }

    for route_a in 0..vehicles {
        for route_b in (route_a + 1)..vehicles {
            for pos_a in 0..plan.routes[route_a].len() {
                for pos_b in 0..plan.routes[route_b].len() {
                    if scan.interrupted() {
                        return None;
                    }
                    let (delta_a, delta_b) =
                        swap_deltas(plan, problem, route_a, pos_a, route_b, pos_b);
                    if within_ceiling(plan.distances[route_a] + delta_a, ceiling)
                        && within_ceiling(plan.distances[route_b] + delta_b, ceiling)
                    {
                        let mv = Move::Swap {
                            route_a,
                            pos_a,
                            route_b,
                            pos_b,
                        };
                        scan.offer(mv, delta_a + delta_b);
                    }
                }
            }
        }
    }

    if two_opt {
        for route in 0..vehicles {
            let len = plan.routes[route].len();
            for from in 0..len {
                for to in (from + 1)..len {
                    if scan.interrupted() {
                        return None;
                    }
                    let delta = two_opt_delta(plan, problem, route, from, to);
                    if within_ceiling(plan.distances[route] + delta, ceiling) {
                        scan.offer(Move::TwoOpt { route, from, to }, delta);
                    }
                }
            }
        }
    }

    Some(scan.found)
}

/// Apply `mv` to a copy of `plan`, recomputing the touched routes exactly.
/// Returns `None` if the exact distances break the ceiling.
pub fn apply_move(plan: &Plan, mv: Move, problem: &ProblemInstance) -> Option<Plan> {
    let mut next = plan.clone();
    let touched: Vec<usize> = match mv {
        Move::Insert { location, route, pos } => {
            next.routes[route].insert(pos, location);
            next.unvisited.retain(|&u| u != location);
            vec![route]
        }
        Move::Relocate {
            from_route,
            from_pos,
            to_route,
            to_pos,
        } => {
            let x = next.routes[from_route].remove(from_pos);
            next.routes[to_route].insert(to_pos, x);
            vec![from_route, to_route]
        }
        Move::Swap {
            route_a,
            pos_a,
            route_b,
            pos_b,
        } => {
            let x = next.routes[route_a][pos_a];
            next.routes[route_a][pos_a] = next.routes[route_b][pos_b];
            next.routes[route_b][pos_b] = x;
            vec![route_a, route_b]
        }
        Move::TwoOpt { route, from, to } => {
            next.routes[route][from..=to].reverse();
            vec![route]
        }
    };

    for route in touched {
        next.refresh(route, problem);
        if !within_ceiling(next.distances[route], problem.max_distance) {
            return None;
        }
    }
    Some(next)
}

fn insertion_delta(
    plan: &Plan,
    problem: &ProblemInstance,
    x: usize,
    route: usize,
    pos: usize,
) -> f64 {
    let depot = problem.depot;
    let before = plan.prev(route, pos, depot);
    let at = plan.routes[route].get(pos).copied().unwrap_or(depot);
    problem.dist(before, x) + problem.dist(x, at) - problem.dist(before, at)
}

fn removal_delta(plan: &Plan, problem: &ProblemInstance, route: usize, pos: usize) -> f64 {
    let depot = problem.depot;
    let a = plan.prev(route, pos, depot);
    let x = plan.routes[route][pos];
    let b = plan.next(route, pos, depot);
    problem.dist(a, b) - problem.dist(a, x) - problem.dist(x, b)
}

/// Cost of putting the visit at `from_pos` back at `to_pos` of the same route
/// once it has been removed.
fn reinsertion_delta(
    plan: &Plan,
    problem: &ProblemInstance,
    route: usize,
    from_pos: usize,
    to_pos: usize,
) -> f64 {
    let depot = problem.depot;
    let visits = &plan.routes[route];
    let x = visits[from_pos];
    // Index into the list with `from_pos` removed.
    let reduced = |k: usize| if k < from_pos { visits[k] } else { visits[k + 1] };
    let reduced_len = visits.len() - 1;

    let before = if to_pos == 0 { depot } else { reduced(to_pos - 1) };
    let at = if to_pos == reduced_len { depot } else { reduced(to_pos) };
    problem.dist(before, x) + problem.dist(x, at) - problem.dist(before, at)
}

fn swap_deltas(
    plan: &Plan,
    problem: &ProblemInstance,
    route_a: usize,
    pos_a: usize,
    route_b: usize,
    pos_b: usize,
) -> (f64, f64) {
    let x = plan.routes[route_a][pos_a];
    let y = plan.routes[route_b][pos_b];
    (
        replacement_delta(plan, problem, route_a, pos_a, y),
        replacement_delta(plan, problem, route_b, pos_b, x),
    )
}

fn replacement_delta(
    plan: &Plan,
    problem: &ProblemInstance,
    route: usize,
    pos: usize,
    by: usize,
) -> f64 {
    let depot = problem.depot;
    let a = plan.prev(route, pos, depot);
    let old = plan.routes[route][pos];
    let b = plan.next(route, pos, depot);
    problem.dist(a, by) + problem.dist(by, b) - problem.dist(a, old) - problem.dist(old, b)
}

/// Only valid on a symmetric matrix: the reversed inner edges keep their cost.
fn two_opt_delta(
    plan: &Plan,
    problem: &ProblemInstance,
    route: usize,
    from: usize,
    to: usize,
) -> f64 {
    let depot = problem.depot;
    let visits = &plan.routes[route];
    let prev = plan.prev(route, from, depot);
    let next = plan.next(route, to, depot);
    problem.dist(prev, visits[to]) + problem.dist(visits[from], next)
        - problem.dist(prev, visits[from])
        - problem.dist(visits[to], next)
}
