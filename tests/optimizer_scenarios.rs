mod common;

use rstest::rstest;
use waste_routing::distance::road_distance;
use waste_routing::{
    optimize, optimize_batch, optimize_with, CancellationToken, Coordinates, RoutingError,
    SolutionMetrics, TerminationReason,
};

use common::{assert_valid, deterministic_options, location, sample_locations};

#[test]
fn depot_only_gives_empty_round_trip() {
    let locations = vec![location(0, 19.07, 72.87)];
    let solution = optimize_with(&locations, &deterministic_options(1, 0, 60.0), None).unwrap();

    assert_eq!(solution.routes.len(), 1);
    assert_eq!(solution.routes[0].stops, vec![0, 0]);
    assert_eq!(solution.total_distance, 0.0);
    assert!(solution.is_full_coverage());
}

#[test]
fn points_on_a_meridian_are_visited_outwards() {
    let locations = vec![location(0, 0.0, 0.0), location(1, 1.0, 0.0), location(2, 2.0, 0.0)];
    let solution = optimize_with(&locations, &deterministic_options(1, 0, 10_000.0), None).unwrap();

    assert_eq!(solution.routes[0].stops, vec![0, 1, 2, 0]);
    let far = road_distance(Coordinates::new(0.0, 0.0), Coordinates::new(2.0, 0.0));
    assert!((solution.total_distance - 2.0 * far).abs() < 1e-6);
}

#[rstest]
#[case::sampled_across_india(None)]
#[case::sampled_around_mumbai(Some("Mumbai"))]
fn ten_locations_three_vehicles_respect_the_ceiling(#[case] city: Option<&str>) {
    let locations = sample_locations(10, 12345, city);
    let options = deterministic_options(3, 0, 60.0);
    let solution = optimize_with(&locations, &options, None).unwrap();

    assert_eq!(solution.routes.len(), 3);
    assert_valid(&solution, &locations, &options);
    assert_eq!(solution.coverage() + solution.unvisited.len(), 9);
    for route in &solution.routes {
        assert!(route.distance <= 60.0 + 1e-9);
    }
    if city.is_some() {
        assert!(solution.is_full_coverage());
    }
}

#[test]
fn unreachable_locations_are_reported_not_routed() {
    // Delhi is far beyond a 60 km round trip from Mumbai.
    let mut locations = sample_locations(6, 3, Some("Mumbai"));
    locations.push(location(6, 28.7041, 77.1025));
    let options = deterministic_options(2, 0, 60.0);
    let solution = optimize_with(&locations, &options, None).unwrap();

    assert_eq!(solution.unvisited, vec![6]);
    assert_eq!(solution.coverage(), 5);
    assert_valid(&solution, &locations, &options);
}

#[test]
fn metrics_match_optimizer_accounting() {
    let locations = sample_locations(25, 99, Some("Pune"));
    let solution = optimize_with(&locations, &deterministic_options(3, 0, 60.0), None).unwrap();
    let metrics = SolutionMetrics::from_solution(&solution, &locations);

    for (route, vehicle) in solution.routes.iter().zip(&metrics.vehicles) {
        assert!((route.distance - vehicle.distance).abs() < 1e-9);
    }
    assert!((metrics.total_distance - solution.total_distance).abs() < 1e-9);
    assert_eq!(metrics.covered, solution.coverage());
}

#[test]
fn identical_inputs_give_identical_routes() {
    let locations = sample_locations(20, 5, Some("Chennai"));
    let options = deterministic_options(3, 0, 45.0);
    let a = optimize_with(&locations, &options, None).unwrap();
    let b = optimize_with(&locations, &options, None).unwrap();

    assert_eq!(a.routes, b.routes);
    assert_eq!(a.unvisited, b.unvisited);
    assert_eq!(a.stats.iterations, b.stats.iterations);
}

#[test]
fn cancelled_run_still_returns_a_feasible_solution() {
    let locations = sample_locations(15, 8, Some("Jaipur"));
    let options = deterministic_options(2, 0, 60.0);
    let token = CancellationToken::new();
    token.cancel();
    let solution = optimize_with(&locations, &options, Some(&token)).unwrap();

    assert_eq!(solution.stats.termination, TerminationReason::Cancelled);
    assert_valid(&solution, &locations, &options);
}

#[test]
fn time_budget_bounds_the_run() {
    let locations = sample_locations(30, 21, Some("Delhi"));
    let solution = optimize(&locations, 3, 0, 60.0, Some(std::time::Duration::ZERO)).unwrap();
    assert_eq!(solution.stats.termination, TerminationReason::TimeBudget);
    assert_eq!(solution.stats.iterations, 0);
}

#[rstest]
#[case::no_vehicles(0, 0, 60.0)]
#[case::depot_out_of_range(2, 5, 60.0)]
#[case::negative_ceiling(2, 0, -1.0)]
#[case::nan_ceiling(2, 0, f64::NAN)]
fn contract_violations_are_rejected(
    #[case] vehicles: usize,
    #[case] depot: usize,
    #[case] max_distance: f64,
) {
    let locations = sample_locations(5, 1, Some("Pune"));
    let result = optimize(&locations, vehicles, depot, max_distance, None);
    assert!(matches!(result, Err(RoutingError::InvalidConfiguration(_))));
}

#[test]
fn empty_location_set_is_rejected() {
    assert!(matches!(
        optimize(&[], 1, 0, 60.0, None),
        Err(RoutingError::InvalidConfiguration(_))
    ));
}

#[test]
fn batch_runs_come_back_in_order() {
    let locations = sample_locations(12, 4, Some("Kolkata"));
    let runs: Vec<_> = (1..=3).map(|v| deterministic_options(v, 0, 60.0)).collect();
    let results = optimize_batch(&locations, &runs);

    assert_eq!(results.len(), 3);
    for (options, result) in runs.iter().zip(&results) {
        let solution = result.as_ref().unwrap();
        assert_eq!(solution.routes.len(), options.vehicle_count);
        assert_valid(solution, &locations, options);
    }

    let sequential = optimize_with(&locations, &runs[1], None).unwrap();
    assert_eq!(results[1].as_ref().unwrap().routes, sequential.routes);
}
