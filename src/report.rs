use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use colored::*;
use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::domain::solution::vehicle_label;
use crate::domain::types::{Location, RouteRecord, Solution};
use crate::error::ReportError;
use crate::evaluation::metrics::SolutionMetrics;

/// Write route records as CSV, header row first.
pub fn write_routes<W: Write>(writer: W, records: &[RouteRecord]) -> Result<(), ReportError> {
    let mut wtr = Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_routes_csv(path: &Path, records: &[RouteRecord]) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_routes(BufWriter::new(file), records)?;
    info!("Wrote {} route records to {}", records.len(), path.display());
    Ok(())
}

#[derive(Serialize)]
struct SolutionExport<'a> {
    solution: &'a Solution,
    metrics: &'a SolutionMetrics,
}

/// Dump the full solution and its metrics as pretty JSON.
pub fn write_solution_json(
    path: &Path,
    solution: &Solution,
    metrics: &SolutionMetrics,
) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &SolutionExport { solution, metrics })?;
    writer.flush()?;
    info!("Wrote solution JSON to {}", path.display());
    Ok(())
}

pub fn log_summary(metrics: &SolutionMetrics) {
    for vehicle in &metrics.vehicles {
        info!(
            "{}: {} stops, {:.2} km",
            vehicle_label(vehicle.vehicle),
            vehicle.visits,
            vehicle.distance
        );
    }
    info!("Total system distance: {:.2} km", metrics.total_distance);
}

/// Human-readable route listing on stdout.
pub fn print_summary(solution: &Solution, metrics: &SolutionMetrics, locations: &[Location]) {
    println!();
    for (route, vehicle) in solution.routes.iter().zip(&metrics.vehicles) {
        let stops: Vec<&str> = route
            .stops
            .iter()
            .filter_map(|&i| locations.get(i).map(|l| l.id.as_str()))
            .collect();
        println!(
            "{} ({:.2} km): {}",
            vehicle_label(route.vehicle).bold(),
            vehicle.distance,
            stops.join(" -> ")
        );
    }

    let headline = format!(
        "Covered {}/{} locations, total distance {:.2} km ({:?} after {} iterations)",
        metrics.covered,
        metrics.covered + metrics.unvisited,
        metrics.total_distance,
        solution.stats.termination,
        solution.stats.iterations
    );
    if solution.is_full_coverage() {
        println!("{}", headline.green());
    } else {
        println!("{}", headline.red());
        let missing: Vec<&str> = solution
            .unvisited
            .iter()
            .filter_map(|&i| locations.get(i).map(|l| l.id.as_str()))
            .collect();
        println!("{}", format!("Unvisited: {}", missing.join(", ")).red());
    }
}
