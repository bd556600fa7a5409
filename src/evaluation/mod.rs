pub mod fitness;
pub mod metrics;
pub mod penalty;

pub use fitness::{find_distance, path_distance, Score};
pub use metrics::{route_distance_from_locations, SolutionMetrics, VehicleMetrics};
pub use penalty::{excess_distance, within_ceiling};
