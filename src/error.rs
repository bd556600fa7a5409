use thiserror::Error;

/// Errors returned by the optimizer entry points.
///
/// Partial coverage and an expired time budget are not errors; they are
/// reported on the returned [`Solution`](crate::domain::types::Solution).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Caller contract violation, rejected before any computation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// An environment override could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Failures while loading locations from a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read location data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed location CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid location record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
}

/// Failures while writing route exports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write route CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize solution: {0}")]
    Json(#[from] serde_json::Error),
}
