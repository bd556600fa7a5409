use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::ReaderBuilder;
use tracing::info;

use crate::domain::types::Location;
use crate::error::SourceError;

use super::LocationSource;

/// Reads locations from a CSV file with the columns `Location_ID`, `City`,
/// `Latitude`, `Longitude`, `Waste_Volume`, `Waste_Type`,
/// `Collection_Frequency` and `Last_Collection`.
#[derive(Debug, Clone)]
pub struct CsvLocationSource {
    path: PathBuf,
}

impl CsvLocationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocationSource for CsvLocationSource {
    fn load(&mut self) -> Result<Vec<Location>, SourceError> {
        let file = File::open(&self.path)?;
        let locations = read_locations(file)?;
        info!(
            "Loaded {} locations from {}",
            locations.len(),
            self.path.display()
        );
        Ok(locations)
    }
}

/// Parse location rows from any reader. The first row is a header.
pub fn read_locations<R: Read>(input: R) -> Result<Vec<Location>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut locations = Vec::new();
    for row in reader.deserialize::<Location>() {
        let location = row?;
        let line = locations.len() as u64 + 2;
        if !location.latitude.is_finite() || !location.longitude.is_finite() {
            return Err(SourceError::InvalidRecord {
                line,
                reason: "coordinates must be finite".to_string(),
            });
        }
        if location.collection_frequency == 0 {
            return Err(SourceError::InvalidRecord {
                line,
                reason: "collection frequency must be positive".to_string(),
            });
        }
        locations.push(location);
    }

    Ok(locations)
}
