use tracing::{debug, info};

use crate::distance::matrix::{create_dm, print_dist_matrix, DistanceMatrix};
use crate::domain::types::{Location, ProblemInstance};
use crate::error::RoutingError;

/// Validate the request and build the problem instance for one run.
///
/// All contract violations are rejected here, before the matrix is built.
pub fn setup(
    locations: &[Location],
    vehicle_count: usize,
    depot: usize,
    max_distance: f64,
) -> Result<ProblemInstance, RoutingError> {
    validate(locations.len(), vehicle_count, depot, max_distance)?;
    info!(
        "Starting setup with {} vehicles, {} locations, depot {}",
        vehicle_count,
        locations.len(),
        depot
    );

    let dm = create_dm(locations);
    print_dist_matrix(&dm);

    Ok(ProblemInstance {
        distance_matrix: dm,
        depot,
        vehicle_count,
        max_distance,
    })
}

/// Same as [`setup`] for a caller-supplied distance matrix.
pub fn setup_from_matrix(
    distance_matrix: DistanceMatrix,
    vehicle_count: usize,
    depot: usize,
    max_distance: f64,
) -> Result<ProblemInstance, RoutingError> {
    validate(distance_matrix.size(), vehicle_count, depot, max_distance)?;
    debug!(
        "Using supplied {}x{} distance matrix",
        distance_matrix.size(),
        distance_matrix.size()
    );

    Ok(ProblemInstance {
        distance_matrix,
        depot,
        vehicle_count,
        max_distance,
    })
}

fn validate(
    location_count: usize,
    vehicle_count: usize,
    depot: usize,
    max_distance: f64,
) -> Result<(), RoutingError> {
    if vehicle_count == 0 {
        return Err(RoutingError::InvalidConfiguration(
            "vehicle count must be at least 1".to_string(),
        ));
    }
    if location_count == 0 {
        return Err(RoutingError::InvalidConfiguration(
            "location set is empty".to_string(),
        ));
    }
    if depot >= location_count {
        return Err(RoutingError::InvalidConfiguration(format!(
            "depot index {} out of range for {} locations",
            depot, location_count
        )));
    }
    if !max_distance.is_finite() || max_distance < 0.0 {
        return Err(RoutingError::InvalidConfiguration(format!(
            "maximum route distance must be a non-negative number, got {}",
            max_distance
        )));
    }
    Ok(())
}
