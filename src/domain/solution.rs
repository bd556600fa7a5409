use std::collections::HashSet;

use crate::domain::types::{Location, ProblemInstance, RouteRecord, Solution};
use crate::evaluation::fitness::path_distance;
use crate::evaluation::penalty::{excess_distance, within_ceiling};

impl Solution {
    /// Number of locations served, depot excluded.
    pub fn coverage(&self) -> usize {
        self.routes.iter().map(|r| r.visits().len()).sum()
    }

    pub fn is_full_coverage(&self) -> bool {
        self.unvisited.is_empty()
    }

    /// Flatten into one record per route position, depot anchors included.
    pub fn records(&self, locations: &[Location]) -> Vec<RouteRecord> {
        self.routes
            .iter()
            .flat_map(|route| {
                route
                    .stops
                    .iter()
                    .enumerate()
                    .map(move |(order, &index)| (route.vehicle, order, index))
            })
            .filter_map(|(vehicle, order, index)| {
                locations.get(index).map(|loc| RouteRecord {
                    vehicle: vehicle_label(vehicle),
                    route_order: order,
                    location_id: loc.id.clone(),
                    city: loc.city.clone(),
                    latitude: loc.latitude,
                    longitude: loc.longitude,
                    waste_volume: loc.waste_volume,
                    waste_type: loc.waste_type,
                })
            })
            .collect()
    }

    /// Check the structural invariants of a solution against its problem:
    /// depot-anchored routes, no location served twice, every location either
    /// served or reported unvisited, and every route within the ceiling.
    pub fn verify(&self, problem: &ProblemInstance) -> Result<(), String> {
        let n = problem.location_count();
        let depot = problem.depot;

        if self.routes.len() != problem.vehicle_count {
            return Err(format!(
                "expected {} routes, found {}",
                problem.vehicle_count,
                self.routes.len()
            ));
        }

        let mut seen: HashSet<usize> = HashSet::new();
        for route in &self.routes {
            if route.stops.len() < 2
                || route.stops.first() != Some(&depot)
                || route.stops.last() != Some(&depot)
            {
                return Err(format!(
                    "vehicle {} route is not anchored at depot {}",
                    route.vehicle, depot
                ));
            }
            for &loc in route.visits() {
                if loc == depot || loc >= n {
                    return Err(format!("vehicle {} visits invalid index {}", route.vehicle, loc));
                }
                if !seen.insert(loc) {
                    return Err(format!("location {} is served more than once", loc));
                }
            }
            let distance = path_distance(&route.stops, &problem.distance_matrix);
            if !within_ceiling(distance, problem.max_distance) {
                return Err(format!(
                    "vehicle {} travels {:.3} km, {:.3} km over the {:.3} km ceiling",
                    route.vehicle,
                    distance,
                    excess_distance(distance, problem.max_distance),
                    problem.max_distance
                ));
            }
        }

        for &loc in &self.unvisited {
            if loc == depot || loc >= n || !seen.insert(loc) {
                return Err(format!("unvisited list contains invalid index {}", loc));
            }
        }
        if seen.len() != n.saturating_sub(1) {
            return Err(format!(
                "{} of {} locations accounted for",
                seen.len(),
                n.saturating_sub(1)
            ));
        }

        Ok(())
    }
}

pub fn vehicle_label(vehicle: usize) -> String {
    format!("Vehicle {}", vehicle + 1)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::distance::matrix::DistanceMatrix;
    use crate::domain::types::{SearchStats, TerminationReason, VehicleRoute};
    use crate::setup::init::setup_from_matrix;

    fn problem() -> ProblemInstance {
        let xs = [0.0_f64, 1.0, 2.0, 3.0];
        let rows = xs
            .iter()
            .map(|a| xs.iter().map(|b| (a - b).abs()).collect())
            .collect();
        setup_from_matrix(DistanceMatrix::from_rows(rows).unwrap(), 2, 0, 5.0).unwrap()
    }

    fn solution(routes: Vec<Vec<usize>>, unvisited: Vec<usize>) -> Solution {
        let dm = problem().distance_matrix;
        let routes: Vec<VehicleRoute> = routes
            .into_iter()
            .enumerate()
            .map(|(vehicle, stops)| VehicleRoute {
                vehicle,
                distance: path_distance(&stops, &dm),
                stops,
            })
            .collect();
        Solution {
            depot: 0,
            total_distance: routes.iter().map(|r| r.distance).sum(),
            routes,
            unvisited,
            stats: SearchStats {
                iterations: 0,
                improvements: 0,
                best_iteration: 0,
                elapsed: Duration::ZERO,
                termination: TerminationReason::LocalOptimum,
            },
        }
    }

    #[test]
    fn accepts_a_partial_solution() {
        let s = solution(vec![vec![0, 1, 2, 0], vec![0, 0]], vec![3]);
        assert_eq!(s.verify(&problem()), Ok(()));
        assert_eq!(s.coverage(), 2);
        assert!(!s.is_full_coverage());
    }

    #[test]
    fn rejects_double_service() {
        let s = solution(vec![vec![0, 1, 2, 0], vec![0, 2, 0]], vec![3]);
        assert!(s.verify(&problem()).is_err());
    }

    #[test]
    fn rejects_ceiling_violation() {
        let s = solution(vec![vec![0, 3, 0], vec![0, 1, 2, 0]], vec![]);
        let err = s.verify(&problem()).unwrap_err();
        assert!(err.contains("1.000 km over the 5.000 km ceiling"), "{err}");
    }

    #[test]
    fn rejects_missing_location() {
        let s = solution(vec![vec![0, 1, 0], vec![0, 2, 0]], vec![]);
        assert!(s.verify(&problem()).is_err());
    }

    #[test]
    fn vehicle_labels_are_one_based() {
        assert_eq!(vehicle_label(0), "Vehicle 1");
    }
}
