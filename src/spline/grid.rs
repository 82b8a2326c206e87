use crate::geom::Vec3;
use crate::spline::point::{PointId, SplinePoint};
use std::collections::HashMap;

/// Edge length (meters) of one grid cell. Chosen so a 3x3 neighborhood
/// always covers the longest segment between consecutive spline points.
const CELL_SIZE: f32 = 64.0;

/// Cell-keyed spatial index over spline points in the ground (XZ) plane.
///
/// The grid answers two queries the per-point neighbor index cannot:
/// nearest-point lookup for world-to-spline projection, and radius scans
/// used by the spawn controller to count vehicles around a player.
#[derive(Debug, Default)]
pub struct SplineGrid {
    cells: HashMap<(i32, i32), Vec<PointId>>,
}

impl SplineGrid {
    fn key_for(pos: &Vec3) -> (i32, i32) {
        (
            (pos.x / CELL_SIZE).floor() as i32,
            (pos.z / CELL_SIZE).floor() as i32,
        )
    }

    /// Builds the grid from a point array.
    pub fn build(points: &[SplinePoint]) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<PointId>> = HashMap::new();
        for point in points {
            cells
                .entry(Self::key_for(&point.position))
                .or_default()
                .push(point.id);
        }
        Self { cells }
    }

    /// Finds the spline point closest to `pos` within the 3x3 cell
    /// neighborhood around it.
    ///
    /// # Returns
    /// `(point_id, distance)` of the closest point, or `None` when the
    /// neighborhood holds no points.
    pub fn nearest_point(&self, points: &[SplinePoint], pos: Vec3) -> Option<(PointId, f32)> {
        let (cx, cz) = Self::key_for(&pos);
        let mut best: Option<(PointId, f32)> = None;
        for dx in -1..=1 {
            for dz in -1..=1 {
                let Some(ids) = self.cells.get(&(cx + dx, cz + dz)) else {
                    continue;
                };
                for &id in ids {
                    let dist = points[id as usize].position.distance_to_xz(&pos);
                    if best.is_none_or(|(_, d)| dist < d) {
                        best = Some((id, dist));
                    }
                }
            }
        }
        best
    }

    /// Collects all point ids within `radius` meters (ground plane) of `pos`.
    pub fn points_in_radius(
        &self,
        points: &[SplinePoint],
        pos: Vec3,
        radius: f32,
    ) -> Vec<PointId> {
        let span = (radius / CELL_SIZE).ceil() as i32;
        let (cx, cz) = Self::key_for(&pos);
        let mut result = Vec::new();
        for dx in -span..=span {
            for dz in -span..=span {
                let Some(ids) = self.cells.get(&(cx + dx, cz + dz)) else {
                    continue;
                };
                for &id in ids {
                    if points[id as usize].position.distance_to_xz(&pos) <= radius {
                        result.push(id);
                    }
                }
            }
        }
        result.sort_unstable();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::point::SplinePoint;

    fn sample_points() -> Vec<SplinePoint> {
        (0..10)
            .map(|i| {
                SplinePoint::new(i)
                    .with_position(Vec3::new(0.0, 0.0, i as f32 * 10.0))
                    .build()
            })
            .collect()
    }

    #[test]
    fn test_nearest_point() {
        let points = sample_points();
        let grid = SplineGrid::build(&points);
        let (id, dist) = grid
            .nearest_point(&points, Vec3::new(1.0, 0.0, 42.0))
            .unwrap();
        assert_eq!(id, 4);
        assert!(dist < 3.0);
    }

    #[test]
    fn test_points_in_radius() {
        let points = sample_points();
        let grid = SplineGrid::build(&points);
        let found = grid.points_in_radius(&points, Vec3::new(0.0, 0.0, 50.0), 15.0);
        assert_eq!(found, vec![4, 5, 6]);
    }

    #[test]
    fn test_nearest_in_empty_area() {
        let points = sample_points();
        let grid = SplineGrid::build(&points);
        assert!(
            grid.nearest_point(&points, Vec3::new(10_000.0, 0.0, 10_000.0))
                .is_none()
        );
    }
}
