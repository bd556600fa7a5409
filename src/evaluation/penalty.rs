use crate::config::constant::DISTANCE_TOLERANCE;

/// Kilometres by which a route overshoots the per-vehicle ceiling.
pub fn excess_distance(route_distance: f64, max_distance: f64) -> f64 {
    (route_distance - max_distance).max(0.0)
}

pub fn within_ceiling(route_distance: f64, max_distance: f64) -> bool {
    route_distance <= max_distance + DISTANCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excess_is_zero_inside_the_ceiling() {
        assert_eq!(excess_distance(30.0, 60.0), 0.0);
        assert_eq!(excess_distance(75.0, 60.0), 15.0);
    }

    #[test]
    fn ceiling_check_tolerates_rounding() {
        assert!(within_ceiling(60.0, 60.0));
        assert!(within_ceiling(60.0 + 1e-12, 60.0));
        assert!(!within_ceiling(60.001, 60.0));
    }
}
