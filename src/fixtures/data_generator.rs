use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::domain::types::{Location, WasteType};
use crate::error::SourceError;

use super::LocationSource;

pub const INDIAN_CITIES: [(&str, f64, f64); 10] = [
    ("Mumbai", 19.0760, 72.8777),
    ("Delhi", 28.7041, 77.1025),
    ("Bangalore", 12.9716, 77.5946),
    ("Hyderabad", 17.3850, 78.4867),
    ("Chennai", 13.0827, 80.2707),
    ("Kolkata", 22.5726, 88.3639),
    ("Pune", 18.5204, 73.8567),
    ("Jaipur", 26.9124, 75.7873),
    ("Ahmedabad", 23.0225, 72.5714),
    ("Lucknow", 26.8467, 80.9462),
];

/// Max jitter applied to a city centre, in degrees.
const JITTER_DEG: f64 = 0.05;
const COLLECTION_FREQUENCIES: [u32; 3] = [1, 2, 3];

/// Seeded generator of sample collection points around Indian cities.
#[derive(Debug, Clone)]
pub struct SampleDataSource {
    count: usize,
    seed: u64,
    base_city: Option<String>,
    reference_time: DateTime<Utc>,
}

impl SampleDataSource {
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            base_city: None,
            reference_time: Utc::now(),
        }
    }

    /// Restrict generation to one city instead of sampling all of them.
    pub fn with_base_city(mut self, city: impl Into<String>) -> Self {
        self.base_city = Some(city.into());
        self
    }

    /// Time the last-collection timestamps are counted back from.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    fn cities(&self) -> Vec<(&'static str, f64, f64)> {
        match &self.base_city {
            Some(name) => {
                let matching: Vec<_> = INDIAN_CITIES
                    .iter()
                    .copied()
                    .filter(|(city, _, _)| city.eq_ignore_ascii_case(name))
                    .collect();
                if matching.is_empty() {
                    warn!("Unknown base city {:?}, sampling all cities", name);
                    INDIAN_CITIES.to_vec()
                } else {
                    matching
                }
            }
            None => INDIAN_CITIES.to_vec(),
        }
    }
}

impl LocationSource for SampleDataSource {
    fn load(&mut self) -> Result<Vec<Location>, SourceError> {
        let cities = self.cities();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut locations = Vec::with_capacity(self.count);

        for i in 0..self.count {
            let (city, lat, lon) = cities[rng.gen_range(0..cities.len())];
            let latitude = lat + rng.gen_range(-JITTER_DEG..JITTER_DEG);
            let longitude = lon + rng.gen_range(-JITTER_DEG..JITTER_DEG);
            let waste_volume = rng.gen_range(0.5..5.0);
            let waste_type = *WasteType::ALL.choose(&mut rng).unwrap_or(&WasteType::Residential);
            let collection_frequency = *COLLECTION_FREQUENCIES.choose(&mut rng).unwrap_or(&1);
            let days_ago = rng.gen_range(0..=7);

            locations.push(Location {
                id: format!("LOC_{:03}", i + 1),
                city: city.to_string(),
                latitude,
                longitude,
                waste_volume,
                waste_type,
                collection_frequency,
                last_collection: self.reference_time - TimeDelta::days(days_ago),
            });
        }

        info!(
            "Generated {} sample locations across {} cities",
            locations.len(),
            cities.len()
        );
        Ok(locations)
    }
}
