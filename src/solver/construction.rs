use tracing::{debug, info, warn};

use crate::domain::types::ProblemInstance;
use crate::evaluation::penalty::within_ceiling;
use crate::solver::plan::Plan;

/// Nearest-neighbour construction under the distance ceiling.
///
/// Vehicles are filled one after another. From its current stop a vehicle
/// moves to the closest unvisited location it can still serve and return to
/// the depot from; ties go to the lowest index. The vehicle returns to the
/// depot once nothing fits, and locations left over after the last vehicle
/// stay unvisited.
pub fn construct_solution(problem: &ProblemInstance) -> Plan {
    let n = problem.location_count();
    let depot = problem.depot;
    let mut visited = vec![false; n];
    visited[depot] = true;

    let mut plan = Plan::empty(problem);

    for vehicle in 0..problem.vehicle_count {
        let mut current = depot;
        let mut travelled = 0.0;
        let mut route: Vec<usize> = vec![];

        loop {
            let mut best: Option<(usize, f64)> = None;
            for (candidate, &done) in visited.iter().enumerate() {
                if done {
                    continue;
                }
                let leg = problem.dist(current, candidate);
                let round_trip = travelled + leg + problem.dist(candidate, depot);
                if !within_ceiling(round_trip, problem.max_distance) {
                    continue;
                }
                // Strict comparison keeps the lowest index on ties.
                if best.map_or(true, |(_, best_leg)| leg < best_leg) {
                    best = Some((candidate, leg));
                }
            }

            match best {
                Some((next, leg)) => {
                    visited[next] = true;
                    route.push(next);
                    travelled += leg;
                    current = next;
                }
                None => break,
            }
        }

        debug!("Vehicle {} constructed with {} stops", vehicle, route.len());
        plan.routes[vehicle] = route;
    }

    plan.unvisited = (0..n).filter(|&i| !visited[i]).collect();
    plan.refresh_all(problem);

    if plan.unvisited.is_empty() {
        info!(
            "Initial solution covers all {} locations, distance {:.2} km",
            plan.visit_count(),
            plan.total_distance()
        );
    } else {
        warn!(
            "Initial solution leaves {} locations unvisited under the {:.1} km ceiling",
            plan.unvisited.len(),
            problem.max_distance
        );
    }

    plan
}
