pub mod app;
pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod report;
pub mod setup;
pub mod solver;
pub mod utils;

pub use config::SolverConfig;
pub use distance::{build_distance_matrix, road_distance, DistanceMatrix};
pub use domain::types::{
    Coordinates, Location, RouteRecord, SearchStats, Solution, TerminationReason, VehicleRoute,
    WasteType,
};
pub use error::{ConfigError, ReportError, RoutingError, SourceError};
pub use evaluation::metrics::{route_distance_from_locations, SolutionMetrics, VehicleMetrics};
pub use fixtures::{CsvLocationSource, LocationSource, SampleDataSource};
pub use solver::{optimize, optimize_batch, optimize_matrix, optimize_with, OptimizeOptions};
pub use utils::CancellationToken;
