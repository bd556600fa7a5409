use std::cmp::Ordering;

use crate::config::constant::{EARTH_RADIUS_KM, ROAD_FACTOR};
use crate::domain::types::Coordinates;

/// Great-circle distance in kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    // Canonical argument order keeps the result bit-for-bit symmetric.
    let (from, to) = match compare_coords(&from, &to) {
        Ordering::Greater => (to, from),
        _ => (from, to),
    };

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Estimated road distance in kilometres: great-circle distance scaled by
/// [`ROAD_FACTOR`].
pub fn road_distance(from: Coordinates, to: Coordinates) -> f64 {
    haversine_km(from, to) * ROAD_FACTOR
}

fn compare_coords(a: &Coordinates, b: &Coordinates) -> Ordering {
    a.latitude
        .total_cmp(&b.latitude)
        .then(a.longitude.total_cmp(&b.longitude))
}
