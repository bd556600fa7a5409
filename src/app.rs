use std::error::Error;

use dotenv::dotenv;
use tracing::{info, span, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::SolverConfig;
use crate::domain::types::Location;
use crate::evaluation::metrics::SolutionMetrics;
use crate::fixtures::{CsvLocationSource, LocationSource, SampleDataSource};
use crate::report::{log_summary, print_summary, write_routes_csv, write_solution_json};
use crate::solver::optimizer::{optimize_batch, optimize_with, OptimizeOptions};

/// Load `.env` into the process environment, then initialize tracing so a
/// `RUST_LOG` set there takes effect.
pub fn init_tracing_and_env() {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE),
        )
        .init();
}

fn load_locations(config: &SolverConfig) -> Result<Vec<Location>, Box<dyn Error>> {
    let locations = match &config.locations_csv {
        Some(path) => CsvLocationSource::new(path).load()?,
        None => {
            let mut source = SampleDataSource::new(config.location_count, config.seed);
            if let Some(city) = &config.base_city {
                source = source.with_base_city(city.clone());
            }
            source.load()?
        }
    };
    Ok(locations)
}

/// Optimize the configured fleet alongside one vehicle fewer and one more,
/// and log how coverage and distance change.
fn compare_fleet_sizes(locations: &[Location], options: &OptimizeOptions) {
    let sizes: Vec<usize> = [options.vehicle_count.saturating_sub(1), options.vehicle_count + 1]
        .into_iter()
        .filter(|&v| v > 0)
        .collect();
    let runs: Vec<OptimizeOptions> = sizes
        .iter()
        .map(|&vehicle_count| OptimizeOptions {
            vehicle_count,
            ..options.clone()
        })
        .collect();

    for (size, result) in sizes.iter().zip(optimize_batch(locations, &runs)) {
        match result {
            Ok(solution) => info!(
                "Fleet of {}: {} covered, {} unvisited, {:.2} km",
                size,
                solution.coverage(),
                solution.unvisited.len(),
                solution.total_distance
            ),
            Err(e) => warn!("Fleet of {} could not be optimized: {}", size, e),
        }
    }
}

/// Entry point of the `waste-router` binary.
pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env();

    let config = SolverConfig::from_env()?;
    let run_span = span!(Level::INFO, "waste_router", seed = config.seed);
    let _guard = run_span.enter();

    let locations = load_locations(&config)?;
    let options = OptimizeOptions::from(&config);
    let solution = optimize_with(&locations, &options, None)?;
    let metrics = SolutionMetrics::from_solution(&solution, &locations);

    log_summary(&metrics);
    print_summary(&solution, &metrics, &locations);

    write_routes_csv(&config.output_csv, &solution.records(&locations))?;
    if let Some(path) = &config.output_json {
        write_solution_json(path, &solution, &metrics)?;
    }

    compare_fleet_sizes(&locations, &options);

    Ok(())
}
