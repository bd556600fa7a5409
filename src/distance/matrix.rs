use tracing::{debug, info};

use crate::distance::haversine::road_distance;
use crate::domain::types::{Coordinates, Location};

/// Dense N×N table of travel distances in kilometres, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Zero-filled matrix.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Matrix from explicit rows. Returns `None` unless the rows form a
    /// square table of finite, non-negative values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        let data: Vec<f64> = rows.into_iter().flatten().collect();
        if data.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return None;
        }
        Some(Self { data, size })
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }
}

/// Build the distance matrix for a set of coordinates.
///
/// Each unordered pair is evaluated once and mirrored; the diagonal stays 0.
pub fn build_distance_matrix(points: &[Coordinates]) -> DistanceMatrix {
    let n = points.len();
    let mut dm = DistanceMatrix::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let d = road_distance(points[i], points[j]);
            dm.set(i, j, d);
            dm.set(j, i, d);
        }
    }

    debug!("Built {}x{} distance matrix", n, n);
    dm
}

/// Build the distance matrix for a location set.
pub fn create_dm(locations: &[Location]) -> DistanceMatrix {
    info!("Creating distance matrix for {} locations", locations.len());
    let points: Vec<Coordinates> = locations.iter().map(Location::coordinates).collect();
    build_distance_matrix(&points)
}

// Print distance matrix for debugging
pub fn print_dist_matrix(dm: &DistanceMatrix) {
    debug!("Distance matrix:");
    for i in 0..dm.size() {
        debug!("{:?}", dm.row(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_points() -> Vec<Coordinates> {
        vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, 1.0),
            Coordinates::new(0.0, 2.0),
        ]
    }

    #[test]
    fn diagonal_is_zero_and_matrix_symmetric() {
        let dm = build_distance_matrix(&line_points());
        assert_eq!(dm.size(), 3);
        for i in 0..3 {
            assert_eq!(dm.get(i, i), 0.0);
        }
        assert!(dm.is_symmetric());
    }

    #[test]
    fn entries_match_the_distance_model() {
        let points = line_points();
        let dm = build_distance_matrix(&points);
        assert_eq!(dm.get(0, 2), road_distance(points[0], points[2]));
        assert!(dm.get(0, 1) < dm.get(0, 2));
    }

    #[test]
    fn duplicate_points_are_zero_apart() {
        let p = Coordinates::new(19.0, 72.0);
        let dm = build_distance_matrix(&[p, p]);
        assert_eq!(dm.get(0, 1), 0.0);
    }

    #[test]
    fn from_rows_rejects_ragged_or_negative_input() {
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).is_none());
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, -1.0], vec![1.0, 0.0]]).is_none());
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(dm.get(1, 0), 2.0);
    }
}
