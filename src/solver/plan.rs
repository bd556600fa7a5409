use crate::domain::types::{ProblemInstance, SearchStats, Solution, VehicleRoute};
use crate::evaluation::fitness::{find_distance, path_distance, Score};

/// Working solution of the search: one visit list per vehicle (depot
/// anchors implicit) plus the locations nobody serves yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub routes: Vec<Vec<usize>>,
    /// Exact distance of each route, recomputed whenever a route changes.
    pub distances: Vec<f64>,
    /// Ascending.
    pub unvisited: Vec<usize>,
}

impl Plan {
    /// All vehicles idle, every non-depot location unvisited.
    pub fn empty(problem: &ProblemInstance) -> Self {
        Self {
            routes: vec![vec![]; problem.vehicle_count],
            distances: vec![0.0; problem.vehicle_count],
            unvisited: (0..problem.location_count())
                .filter(|&i| i != problem.depot)
                .collect(),
        }
    }

    pub fn score(&self) -> Score {
        Score::new(self.unvisited.len(), self.total_distance())
    }

    pub fn total_distance(&self) -> f64 {
        self.distances.iter().sum()
    }

    pub fn visit_count(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    pub fn refresh(&mut self, route: usize, problem: &ProblemInstance) {
        self.distances[route] =
            find_distance(&self.routes[route], problem.depot, &problem.distance_matrix);
    }

    pub fn refresh_all(&mut self, problem: &ProblemInstance) {
        for r in 0..self.routes.len() {
            self.refresh(r, problem);
        }
    }

    #[cfg(test)]
    pub fn is_feasible(&self, problem: &ProblemInstance) -> bool {
        self.distances
            .iter()
            .all(|&d| crate::evaluation::penalty::within_ceiling(d, problem.max_distance))
    }

    /// Location before visit `pos` of `route`.
    pub fn prev(&self, route: usize, pos: usize, depot: usize) -> usize {
        if pos == 0 {
            depot
        } else {
            self.routes[route][pos - 1]
        }
    }

    /// Location after visit `pos` of `route`.
    pub fn next(&self, route: usize, pos: usize, depot: usize) -> usize {
        self.routes[route].get(pos + 1).copied().unwrap_or(depot)
    }

    pub fn into_solution(self, problem: &ProblemInstance, stats: SearchStats) -> Solution {
        let depot = problem.depot;
        let routes: Vec<VehicleRoute> = self
            .routes
            .into_iter()
            .enumerate()
            .map(|(vehicle, visits)| {
                let mut stops = Vec::with_capacity(visits.len() + 2);
                stops.push(depot);
                stops.extend(visits);
                stops.push(depot);
                let distance = path_distance(&stops, &problem.distance_matrix);
                VehicleRoute {
                    vehicle,
                    stops,
                    distance,
                }
            })
            .collect();
        let total_distance = routes.iter().map(|r| r.distance).sum();

        Solution {
            depot,
            routes,
            unvisited: self.unvisited,
            total_distance,
            stats,
        }
    }
}
