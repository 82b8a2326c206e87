use crate::geom::Vec3;
use crate::spline::graph::SplineGraph;
use crate::spline::point::SplinePoint;

/// Creates a single-lane straight road along +Z for testing purposes.
///
/// Points are spaced `spacing` meters apart; the last point has no `next`
/// link and zero arc length.
///
/// # Example
/// ```
/// // . (0) --> (1) --> (2) --> ... --> (n-1)
/// ```
pub fn straight_road(n: u32, spacing: f32) -> SplineGraph {
    let mut points = Vec::with_capacity(n as usize);
    for i in 0..n {
        let mut builder = SplinePoint::new(i)
            .with_position(Vec3::new(0.0, 0.0, i as f32 * spacing))
            .with_direction(0);
        if i + 1 < n {
            builder = builder.with_next(i + 1).with_length(spacing);
        }
        if i > 0 {
            builder = builder.with_prev(i - 1);
        }
        points.push(builder.build());
    }
    SplineGraph::from_points(points).expect("test road must be valid")
}

/// Creates two parallel lanes along +Z with lateral links for testing
/// purposes. The right (slow) lane holds ids `0..n`, the left (fast) lane
/// `n..2n`, offset 3 m toward -X.
///
/// # Example
/// ```
/// // . (n) --> (n+1) --> ... --> (2n-1)     left lane
/// // .  ^|      ^|                           left/right links
/// // . (0) --> (1)   --> ... --> (n-1)      right lane
/// ```
pub fn two_lane_road(n: u32, spacing: f32) -> SplineGraph {
    let mut points = Vec::with_capacity(2 * n as usize);
    for i in 0..n {
        let mut builder = SplinePoint::new(i)
            .with_position(Vec3::new(0.0, 0.0, i as f32 * spacing))
            .with_direction(0)
            .with_left(n + i);
        if i + 1 < n {
            builder = builder.with_next(i + 1).with_length(spacing);
        }
        if i > 0 {
            builder = builder.with_prev(i - 1);
        }
        points.push(builder.build());
    }
    for i in 0..n {
        let mut builder = SplinePoint::new(n + i)
            .with_position(Vec3::new(-3.0, 0.0, i as f32 * spacing))
            .with_direction(0)
            .with_right(i);
        if i + 1 < n {
            builder = builder.with_next(n + i + 1).with_length(spacing);
        }
        if i > 0 {
            builder = builder.with_prev(n + i - 1);
        }
        points.push(builder.build());
    }
    SplineGraph::from_points(points).expect("test road must be valid")
}

/// Creates a closed single-lane loop for testing purposes; useful for runs
/// that must never hit a dead end.
pub fn ring_road(n: u32, spacing: f32) -> SplineGraph {
    assert!(n >= 3, "a ring needs at least 3 points");
    let radius = (n as f32 * spacing) / (2.0 * std::f32::consts::PI);
    let mut points = Vec::with_capacity(n as usize);
    for i in 0..n {
        let angle = 2.0 * std::f32::consts::PI * i as f32 / n as f32;
        points.push(
            SplinePoint::new(i)
                .with_position(Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()))
                .with_length(spacing)
                .with_next((i + 1) % n)
                .with_prev((i + n - 1) % n)
                .with_direction(0)
                .build(),
        );
    }
    SplineGraph::from_points(points).expect("test ring must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_road_links() {
        let graph = straight_road(5, 10.0);
        assert_eq!(graph.len(), 5);
        assert_eq!(graph.get_point(0).unwrap().next_id, Some(1));
        assert_eq!(graph.get_point(4).unwrap().next_id, None);
        assert_eq!(graph.get_point(4).unwrap().length, 0.0);
        assert_eq!(graph.get_point(3).unwrap().prev_id, Some(2));
    }

    #[test]
    fn test_two_lane_road_lateral_links() {
        let graph = two_lane_road(10, 10.0);
        assert_eq!(graph.len(), 20);
        assert_eq!(graph.get_point(4).unwrap().left_id, Some(14));
        assert_eq!(graph.get_point(14).unwrap().right_id, Some(4));
        assert!(graph.is_same_direction(4, 14));
    }

    #[test]
    fn test_ring_road_closes() {
        let graph = ring_road(12, 10.0);
        assert_eq!(graph.get_point(11).unwrap().next_id, Some(0));
        assert_eq!(graph.get_point(0).unwrap().prev_id, Some(11));
        // A long walk never dead-ends on a ring.
        assert!(graph.point_ahead(0, 500.0).is_some());
    }
}
