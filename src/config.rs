use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ConfigError;

pub mod constant {
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    /// Straight-line to road distance correction.
    pub const ROAD_FACTOR: f64 = 1.3;
    pub const MAX_DISTANCE_KM: f64 = 60.0;
    pub const TIME_BUDGET_SECS: u64 = 10;
    pub const VEHICLE_COUNT: usize = 3;
    pub const LOCATION_COUNT: usize = 30;
    pub const DEPOT_INDEX: usize = 0;
    pub const SEED: u64 = 12345;
    pub const TABU_TENURE_LOWER: usize = 5;
    pub const TABU_TENURE_UPPER: usize = 12;
    pub const OUTPUT_CSV_PATH: &str = "optimized_routes.csv";
    /// Slack allowed when comparing a route length against the ceiling.
    pub const DISTANCE_TOLERANCE: f64 = 1e-9;
}

/// Runtime configuration for the `waste-router` binary.
///
/// Defaults come from [`constant`]; every field can be overridden through the
/// environment (or a `.env` file).
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub vehicle_count: usize,
    pub location_count: usize,
    pub depot_index: usize,
    pub max_distance_km: f64,
    /// `None` runs the search until it stagnates.
    pub time_budget: Option<Duration>,
    pub seed: u64,
    pub base_city: Option<String>,
    pub locations_csv: Option<PathBuf>,
    pub output_csv: PathBuf,
    pub output_json: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            vehicle_count: constant::VEHICLE_COUNT,
            location_count: constant::LOCATION_COUNT,
            depot_index: constant::DEPOT_INDEX,
            max_distance_km: constant::MAX_DISTANCE_KM,
            time_budget: Some(Duration::from_secs(constant::TIME_BUDGET_SECS)),
            seed: constant::SEED,
            base_city: None,
            locations_csv: None,
            output_csv: PathBuf::from(constant::OUTPUT_CSV_PATH),
            output_json: None,
        }
    }
}

impl SolverConfig {
    /// Apply `WASTE_*` overrides from the process environment on top of the
    /// defaults. The binary loads `.env` into the environment beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|name| env::var(name).ok())?;
        info!(
            "Loaded configuration: {} vehicles, {} locations, ceiling {:.1} km",
            config.vehicle_count, config.location_count, config.max_distance_km
        );
        Ok(config)
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "WASTE_VEHICLES")? {
            config.vehicle_count = v;
        }
        if let Some(v) = parse_var(&lookup, "WASTE_LOCATIONS")? {
            config.location_count = v;
        }
        if let Some(v) = parse_var(&lookup, "WASTE_DEPOT")? {
            config.depot_index = v;
        }
        if let Some(v) = parse_var(&lookup, "WASTE_MAX_DISTANCE_KM")? {
            config.max_distance_km = v;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "WASTE_TIME_BUDGET_SECS")? {
            config.time_budget = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = parse_var(&lookup, "WASTE_SEED")? {
            config.seed = v;
        }
        if let Some(city) = lookup("WASTE_BASE_CITY").filter(|c| !c.trim().is_empty()) {
            config.base_city = Some(city.trim().to_string());
        }
        if let Some(path) = lookup("WASTE_LOCATIONS_CSV").filter(|p| !p.trim().is_empty()) {
            config.locations_csv = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("WASTE_OUTPUT_CSV").filter(|p| !p.trim().is_empty()) {
            config.output_csv = PathBuf::from(path);
        }
        if let Some(path) = lookup("WASTE_OUTPUT_JSON").filter(|p| !p.trim().is_empty()) {
            config.output_json = Some(PathBuf::from(path));
        }

        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_constants() {
        let config = SolverConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.vehicle_count, constant::VEHICLE_COUNT);
        assert_eq!(config.max_distance_km, constant::MAX_DISTANCE_KM);
        assert_eq!(
            config.time_budget,
            Some(Duration::from_secs(constant::TIME_BUDGET_SECS))
        );
        assert!(config.locations_csv.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = SolverConfig::from_lookup(lookup_from(&[
            ("WASTE_VEHICLES", "5"),
            ("WASTE_MAX_DISTANCE_KM", "42.5"),
            ("WASTE_TIME_BUDGET_SECS", "0"),
            ("WASTE_BASE_CITY", " Pune "),
        ]))
        .unwrap();

        assert_eq!(config.vehicle_count, 5);
        assert_eq!(config.max_distance_km, 42.5);
        assert_eq!(config.time_budget, None);
        assert_eq!(config.base_city.as_deref(), Some("Pune"));
    }

    #[test]
    fn unparseable_value_is_reported() {
        let err = SolverConfig::from_lookup(lookup_from(&[("WASTE_VEHICLES", "three")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "WASTE_VEHICLES",
                value: "three".to_string()
            }
        );
    }
}
