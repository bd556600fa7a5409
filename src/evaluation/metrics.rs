use itertools::Itertools;
use serde::Serialize;

use crate::distance::haversine::road_distance;
use crate::domain::types::{Location, Solution};

/// Distance of a route recomputed from coordinates, summing the distance
/// model over consecutive stops.
pub fn route_distance_from_locations(route: &[usize], locations: &[Location]) -> f64 {
    route
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| {
            road_distance(locations[from].coordinates(), locations[to].coordinates())
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMetrics {
    pub vehicle: usize,
    /// Served locations, depot anchors excluded.
    pub visits: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionMetrics {
    pub vehicles: Vec<VehicleMetrics>,
    pub total_distance: f64,
    pub covered: usize,
    pub unvisited: usize,
}

impl SolutionMetrics {
    /// Re-derive per-vehicle and total distance for reporting.
    pub fn from_solution(solution: &Solution, locations: &[Location]) -> Self {
        let vehicles: Vec<VehicleMetrics> = solution
            .routes
            .iter()
            .map(|route| VehicleMetrics {
                vehicle: route.vehicle,
                visits: route.visits().len(),
                distance: route_distance_from_locations(&route.stops, locations),
            })
            .collect();
        let total_distance = vehicles.iter().map(|v| v.distance).sum();
        let covered = vehicles.iter().map(|v| v.visits).sum();

        Self {
            vehicles,
            total_distance,
            covered,
            unvisited: solution.unvisited.len(),
        }
    }
}
