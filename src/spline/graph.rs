use crate::geom::Vec3;
use crate::spline::grid::SplineGrid;
use crate::spline::point::{DirectionTag, PointId, SplinePoint};
use std::fmt;

/// Custom error types for the spline graph.
#[derive(Debug, Clone)]
pub enum GraphError {
    /// Point ids must form a contiguous `0..n` range matching storage order.
    NonContiguousIds { expected: PointId, got: PointId },
    /// A link references a point id outside the graph.
    DanglingLink { from: PointId, to: PointId },
    /// A point with a `next` link has a non-positive arc length; distance
    /// walks over such a graph would never terminate.
    ZeroLengthSegment(PointId),
    /// Requested point id is out of range.
    PointNotFound(PointId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NonContiguousIds { expected, got } => {
                write!(
                    f,
                    "Point ids must be contiguous: expected '{}', got '{}'",
                    expected, got
                )
            }
            GraphError::DanglingLink { from, to } => {
                write!(f, "Point '{}' links to unknown point '{}'", from, to)
            }
            GraphError::ZeroLengthSegment(id) => {
                write!(f, "Point '{}' has a 'next' link but no arc length", id)
            }
            GraphError::PointNotFound(id) => {
                write!(f, "Can't find point with ID '{}'", id)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Read-only view of the road network as a directed graph of spline points.
///
/// Points live in a contiguous array indexed by [`PointId`]; all links are
/// validated at construction so lookups during simulation cannot dangle. The
/// graph also owns a [`SplineGrid`] for world-to-spline projection.
///
/// The graph is immutable after construction and is usually shared behind an
/// `Arc` between the tick loop and host callbacks.
#[derive(Debug)]
pub struct SplineGraph {
    points: Vec<SplinePoint>,
    grid: SplineGrid,
}

impl SplineGraph {
    /// Builds a graph from a contiguous point array.
    ///
    /// # Arguments
    /// * `points` - Points ordered such that `points[i].id == i`.
    ///
    /// # Returns
    /// The validated graph, or a `GraphError` when ids are out of order or a
    /// link references an unknown point.
    ///
    /// # Example
    /// ```
    /// use traffic_ai_core::spline::{SplinePoint, SplineGraph};
    /// use traffic_ai_core::geom::Vec3;
    /// let points = vec![
    ///     SplinePoint::new(0).with_position(Vec3::zero()).with_length(10.0).with_next(1).build(),
    ///     SplinePoint::new(1).with_position(Vec3::new(0.0, 0.0, 10.0)).with_prev(0).build(),
    /// ];
    /// let graph = SplineGraph::from_points(points).unwrap();
    /// assert_eq!(graph.points().len(), 2);
    /// ```
    pub fn from_points(points: Vec<SplinePoint>) -> Result<Self, GraphError> {
        for (idx, point) in points.iter().enumerate() {
            if point.id as usize != idx {
                return Err(GraphError::NonContiguousIds {
                    expected: idx as PointId,
                    got: point.id,
                });
            }
        }
        let n = points.len() as u32;
        for point in &points {
            for link in [point.next_id, point.prev_id, point.left_id, point.right_id]
                .into_iter()
                .flatten()
            {
                if link >= n {
                    return Err(GraphError::DanglingLink {
                        from: point.id,
                        to: link,
                    });
                }
            }
            if point.next_id.is_some() && point.length <= 0.0 {
                return Err(GraphError::ZeroLengthSegment(point.id));
            }
        }
        let grid = SplineGrid::build(&points);
        Ok(Self { points, grid })
    }

    /// Returns the full point array.
    pub fn points(&self) -> &[SplinePoint] {
        &self.points
    }

    /// Returns the point with the given id, if it exists.
    pub fn get_point(&self, id: PointId) -> Option<&SplinePoint> {
        self.points.get(id as usize)
    }

    /// Number of points in the graph.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the graph has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Direction-equality predicate between two points.
    ///
    /// Lane changes and lane-adjacent searches are only valid between points
    /// whose direction tags compare equal.
    pub fn is_same_direction(&self, a: PointId, b: PointId) -> bool {
        match (self.get_point(a), self.get_point(b)) {
            (Some(pa), Some(pb)) => pa.direction == pb.direction,
            _ => false,
        }
    }

    /// Projects a world position onto the spline.
    ///
    /// Finds the nearest point through the spatial grid, then projects onto
    /// the segment toward its `next` point to recover the progress offset.
    ///
    /// # Returns
    /// `(point_id, progress)` where `progress ∈ [0, length(point_id)]`, or
    /// `None` when no point lies within the grid search radius.
    pub fn world_to_spline(&self, world_pos: Vec3) -> Option<(PointId, f32)> {
        let (id, _) = self.grid.nearest_point(&self.points, world_pos)?;
        let point = self.get_point(id)?;
        let Some(next_id) = point.next_id else {
            return Some((id, 0.0));
        };
        let next = self.get_point(next_id)?;
        let seg = next.position - point.position;
        let seg_len = seg.length_xz();
        if seg_len <= f32::EPSILON {
            return Some((id, 0.0));
        }
        let rel = world_pos - point.position;
        let t = ((rel.x * seg.x + rel.z * seg.z) / (seg_len * seg_len)).clamp(0.0, 1.0);
        Some((id, t * point.length))
    }

    /// Walks `next` links from `start`, accumulating arc length, and returns
    /// the point at (or just past) `distance` meters ahead. Returns `None`
    /// when a dead end is hit first.
    pub fn point_ahead(&self, start: PointId, distance: f32) -> Option<PointId> {
        let mut current = start;
        let mut travelled = 0.0f32;
        while travelled < distance {
            let point = self.get_point(current)?;
            travelled += point.length;
            current = point.next_id?;
        }
        Some(current)
    }

    /// Walks `prev` links from `start` and returns the point at (or just
    /// past) `distance` meters behind. Returns `None` when the lane start is
    /// hit first.
    pub fn point_behind(&self, start: PointId, distance: f32) -> Option<PointId> {
        let mut current = start;
        let mut travelled = 0.0f32;
        while travelled < distance {
            let point = self.get_point(current)?;
            let prev_id = point.prev_id?;
            let prev = self.get_point(prev_id)?;
            travelled += prev.length;
            current = prev_id;
        }
        Some(current)
    }

    /// Access to the underlying spatial grid for range queries.
    pub fn grid(&self) -> &SplineGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_graphs::straight_road;

    #[test]
    fn test_rejects_non_contiguous_ids() {
        let points = vec![SplinePoint::new(1).build()];
        assert!(matches!(
            SplineGraph::from_points(points),
            Err(GraphError::NonContiguousIds { .. })
        ));
    }

    #[test]
    fn test_rejects_dangling_link() {
        let points = vec![SplinePoint::new(0).with_next(5).build()];
        assert!(matches!(
            SplineGraph::from_points(points),
            Err(GraphError::DanglingLink { from: 0, to: 5 })
        ));
    }

    #[test]
    fn test_rejects_zero_length_segment() {
        let points = vec![
            SplinePoint::new(0).with_next(1).build(),
            SplinePoint::new(1).with_prev(0).build(),
        ];
        assert!(matches!(
            SplineGraph::from_points(points),
            Err(GraphError::ZeroLengthSegment(0))
        ));
    }

    #[test]
    fn test_point_ahead_and_behind() {
        // 20 points spaced 10 m apart.
        let graph = straight_road(20, 10.0);
        let ahead = graph.point_ahead(0, 35.0).unwrap();
        assert_eq!(ahead, 4);
        let behind = graph.point_behind(ahead, 35.0).unwrap();
        assert_eq!(behind, 0);
        assert!(graph.point_ahead(0, 1000.0).is_none(), "Dead end must stop the walk");
    }

    #[test]
    fn test_world_to_spline_projection() {
        let graph = straight_road(20, 10.0);
        // 3.5 m past point 2 along +Z.
        let (id, progress) = graph
            .world_to_spline(Vec3::new(0.2, 0.0, 23.5))
            .expect("position is on the road");
        assert_eq!(id, 2);
        assert!((progress - 3.5).abs() < 0.5, "progress={}", progress);
    }

    #[test]
    fn test_same_direction() {
        let graph = straight_road(4, 10.0);
        assert!(graph.is_same_direction(0, 3));
        assert!(!graph.is_same_direction(0, 99));
    }
}
