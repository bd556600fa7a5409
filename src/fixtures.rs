pub mod csv_source;
pub mod data_generator;

use crate::domain::types::Location;
use crate::error::SourceError;

pub use csv_source::CsvLocationSource;
pub use data_generator::SampleDataSource;

/// Supplies the location set for a run. The optimizer only ever sees the
/// returned locations.
pub trait LocationSource {
    fn load(&mut self) -> Result<Vec<Location>, SourceError>;
}
