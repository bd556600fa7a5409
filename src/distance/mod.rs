pub mod haversine;
pub mod matrix;

pub use haversine::{haversine_km, road_distance};
pub use matrix::{build_distance_matrix, create_dm, DistanceMatrix};
