//! Shared builders for the integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use waste_routing::fixtures::LocationSource;
use waste_routing::setup::setup;
use waste_routing::{Location, OptimizeOptions, SampleDataSource, Solution, WasteType};

pub fn location(index: usize, latitude: f64, longitude: f64) -> Location {
    Location {
        id: format!("LOC_{:03}", index + 1),
        city: "Test".to_string(),
        latitude,
        longitude,
        waste_volume: 1.0,
        waste_type: WasteType::Residential,
        collection_frequency: 1,
        last_collection: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn sample_locations(count: usize, seed: u64, city: Option<&str>) -> Vec<Location> {
    let mut source = SampleDataSource::new(count, seed)
        .with_reference_time(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    if let Some(city) = city {
        source = source.with_base_city(city);
    }
    source.load().expect("sample generation never fails")
}

/// Options with the wall-clock budget disabled so runs are reproducible.
pub fn deterministic_options(vehicles: usize, depot: usize, max_distance: f64) -> OptimizeOptions {
    OptimizeOptions::new(vehicles, depot, max_distance)
        .with_time_budget(None)
        .with_seed(7)
        .with_escape_iterations(60)
}

pub fn assert_valid(solution: &Solution, locations: &[Location], options: &OptimizeOptions) {
    let problem = setup(
        locations,
        options.vehicle_count,
        options.depot,
        options.max_distance,
    )
    .expect("valid problem");
    if let Err(reason) = solution.verify(&problem) {
        panic!("invalid solution: {reason}");
    }
}
