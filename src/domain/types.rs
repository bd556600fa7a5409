use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::distance::matrix::DistanceMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteType {
    Residential,
    Commercial,
    Construction,
    Organic,
}

impl WasteType {
    pub const ALL: [WasteType; 4] = [
        WasteType::Residential,
        WasteType::Commercial,
        WasteType::Construction,
        WasteType::Organic,
    ];
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WasteType::Residential => "Residential",
            WasteType::Commercial => "Commercial",
            WasteType::Construction => "Construction",
            WasteType::Organic => "Organic",
        };
        f.write_str(name)
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A waste collection point. Only the coordinates take part in routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "Location_ID")]
    pub id: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Tons.
    #[serde(rename = "Waste_Volume")]
    pub waste_volume: f64,
    #[serde(rename = "Waste_Type")]
    pub waste_type: WasteType,
    /// Collections per week.
    #[serde(rename = "Collection_Frequency")]
    pub collection_frequency: u32,
    #[serde(rename = "Last_Collection")]
    pub last_collection: DateTime<Utc>,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Ordered stops of one vehicle, anchored at the depot on both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRoute {
    pub vehicle: usize,
    pub stops: Vec<usize>,
    /// Kilometres, as accounted by the optimizer.
    pub distance: f64,
}

impl VehicleRoute {
    /// Stops excluding the two depot anchors.
    pub fn visits(&self) -> &[usize] {
        match self.stops.len() {
            0..=2 => &[],
            n => &self.stops[1..n - 1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    /// A neighbourhood pass found no improving move.
    LocalOptimum,
    /// The escape window after a local optimum ran out without a new best.
    Stagnation,
    TimeBudget,
    Cancelled,
    IterationLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchStats {
    pub iterations: usize,
    pub improvements: usize,
    pub best_iteration: usize,
    pub elapsed: Duration,
    pub termination: TerminationReason,
}

/// Result of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub depot: usize,
    pub routes: Vec<VehicleRoute>,
    /// Locations no vehicle could serve within the distance ceiling.
    pub unvisited: Vec<usize>,
    pub total_distance: f64,
    pub stats: SearchStats,
}

/// Everything a single run needs; built fresh per run and owned by it.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub distance_matrix: DistanceMatrix,
    pub depot: usize,
    pub vehicle_count: usize,
    pub max_distance: f64,
}

impl ProblemInstance {
    pub fn location_count(&self) -> usize {
        self.distance_matrix.size()
    }

    pub fn dist(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix.get(from, to)
    }
}

/// One exported row: a location at a given position of a vehicle's route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    #[serde(rename = "Vehicle")]
    pub vehicle: String,
    #[serde(rename = "Route_Order")]
    pub route_order: usize,
    #[serde(rename = "Location_ID")]
    pub location_id: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Waste_Volume")]
    pub waste_volume: f64,
    #[serde(rename = "Waste_Type")]
    pub waste_type: WasteType,
}
