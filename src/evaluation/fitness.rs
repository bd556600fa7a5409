use std::cmp::Ordering;

use itertools::Itertools;

use crate::distance::matrix::DistanceMatrix;

/// Objective of the search, compared lexicographically: serving more
/// locations always beats a shorter total distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub unvisited: usize,
    pub distance: f64,
}

impl Score {
    pub const fn new(unvisited: usize, distance: f64) -> Self {
        Self {
            unvisited,
            distance,
        }
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.unvisited
            .cmp(&other.unvisited)
            .then(self.distance.total_cmp(&other.distance))
    }

    /// Strictly better, ignoring distance gains below `epsilon`.
    pub fn improves_on(&self, other: &Self, epsilon: f64) -> bool {
        match self.unvisited.cmp(&other.unvisited) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.distance < other.distance - epsilon,
        }
    }
}

pub fn dist_between(from_loc: usize, to_loc: usize, dm: &DistanceMatrix) -> f64 {
    dm.get(from_loc, to_loc)
}

/// Sum of consecutive-pair distances along a full path.
pub fn path_distance(path: &[usize], dm: &DistanceMatrix) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(&from, &to)| dist_between(from, to, dm))
        .sum()
}

/// Distance of a vehicle that leaves `depot`, serves `visits` in order and
/// returns to `depot`.
///
/// Summed in path order so the value equals [`path_distance`] of the
/// depot-anchored path.
pub fn find_distance(visits: &[usize], depot: usize, dm: &DistanceMatrix) -> f64 {
    let mut total = 0.0;
    let mut prev = depot;
    for &loc in visits {
        total += dist_between(prev, loc, dm);
        prev = loc;
    }
    total + dist_between(prev, depot, dm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0, 1.0],
            vec![1.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![1.0, 2.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn depot_anchored_distance_matches_path_distance() {
        let dm = square();
        let visits = [1, 2, 3];
        assert_eq!(find_distance(&visits, 0, &dm), 4.0);
        assert_eq!(
            find_distance(&visits, 0, &dm),
            path_distance(&[0, 1, 2, 3, 0], &dm)
        );
    }

    #[test]
    fn empty_route_costs_nothing() {
        let dm = square();
        assert_eq!(find_distance(&[], 0, &dm), 0.0);
        assert_eq!(path_distance(&[0, 0], &dm), 0.0);
        assert_eq!(path_distance(&[], &dm), 0.0);
    }

    #[test]
    fn coverage_dominates_distance() {
        let fewer_unvisited = Score::new(0, 100.0);
        let shorter = Score::new(1, 1.0);
        assert!(fewer_unvisited.improves_on(&shorter, 1e-9));
        assert!(!shorter.improves_on(&fewer_unvisited, 1e-9));
        assert_eq!(fewer_unvisited.total_cmp(&shorter), Ordering::Less);
    }

    #[test]
    fn tiny_gains_are_not_improvements() {
        let a = Score::new(0, 10.0);
        let b = Score::new(0, 10.0 - 1e-12);
        assert!(!b.improves_on(&a, 1e-9));
    }
}
