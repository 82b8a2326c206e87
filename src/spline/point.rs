use crate::geom::Vec3;

pub type PointId = u32; // Alias for PointId

/// Tag identifying the travel direction of a lane group.
///
/// Adjacent lanes are only valid lane-change targets when their tags compare
/// equal through [`SplineGraph::is_same_direction`](crate::spline::SplineGraph::is_same_direction);
/// opposing carriageways carry different tags.
pub type DirectionTag = i32;

/// A single node of the road graph.
///
/// A `SplinePoint` carries its world position, the arc length to its `next`
/// point, and the four optional links that encode lane topology: `next`/`prev`
/// along the driving direction and `left`/`right` across lanes. The graph is
/// static after load; points are read-only during simulation.
#[derive(Debug, Clone)]
pub struct SplinePoint {
    /// Unique identifier; equals the point's index in the graph storage.
    pub id: PointId,
    /// World position of the point (meters).
    pub position: Vec3,
    /// Arc length to the `next` point (meters). Zero when `next` is absent.
    pub length: f32,
    /// Following point along the driving direction.
    pub next_id: Option<PointId>,
    /// Preceding point along the driving direction.
    pub prev_id: Option<PointId>,
    /// Laterally adjacent point in the left lane.
    pub left_id: Option<PointId>,
    /// Laterally adjacent point in the right lane.
    pub right_id: Option<PointId>,
    /// Travel-direction tag of the lane this point belongs to.
    pub direction: DirectionTag,
}

impl SplinePoint {
    /// Constructs a new `SplinePointBuilder` for building a `SplinePoint`.
    ///
    /// # Arguments
    /// * `id` - A unique identifier for the point; must equal its index in
    ///   the final graph storage.
    ///
    /// # Returns
    /// A `SplinePointBuilder` used to configure and build the point.
    ///
    /// # Example
    /// ```
    /// use traffic_ai_core::spline::SplinePoint;
    /// use traffic_ai_core::geom::Vec3;
    /// let point = SplinePoint::new(3)
    ///     .with_position(Vec3::new(10.0, 0.0, 40.0))
    ///     .with_length(10.0)
    ///     .with_next(4)
    ///     .with_prev(2)
    ///     .build();
    /// println!("Point: {:?}", point);
    /// ```
    pub fn new(id: PointId) -> SplinePointBuilder {
        SplinePointBuilder {
            point: SplinePoint {
                id,
                position: Vec3::zero(),
                length: 0.0,
                next_id: None,
                prev_id: None,
                left_id: None,
                right_id: None,
                direction: 0,
            },
        }
    }

    /// Euclidean distance to another point's position.
    pub fn distance_to(&self, other: &SplinePoint) -> f32 {
        self.position.distance_to(&other.position)
    }
}

/// A builder pattern implementation for constructing `SplinePoint` objects.
pub struct SplinePointBuilder {
    point: SplinePoint,
}

impl SplinePointBuilder {
    /// Sets the world position of the point.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.point.position = position;
        self
    }

    /// Sets the arc length (meters) from this point to its `next` point.
    pub fn with_length(mut self, length: f32) -> Self {
        self.point.length = length;
        self
    }

    /// Sets the following point along the driving direction.
    pub fn with_next(mut self, id: PointId) -> Self {
        self.point.next_id = Some(id);
        self
    }

    /// Sets the preceding point along the driving direction.
    pub fn with_prev(mut self, id: PointId) -> Self {
        self.point.prev_id = Some(id);
        self
    }

    /// Sets the laterally adjacent point in the left lane.
    pub fn with_left(mut self, id: PointId) -> Self {
        self.point.left_id = Some(id);
        self
    }

    /// Sets the laterally adjacent point in the right lane.
    pub fn with_right(mut self, id: PointId) -> Self {
        self.point.right_id = Some(id);
        self
    }

    /// Sets the travel-direction tag of the lane this point belongs to.
    pub fn with_direction(mut self, direction: DirectionTag) -> Self {
        self.point.direction = direction;
        self
    }

    /// Builds the final `SplinePoint` object with the configured properties.
    pub fn build(self) -> SplinePoint {
        self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_builder_defaults() {
        let p = SplinePoint::new(7).build();
        assert_eq!(p.id, 7);
        assert!(p.next_id.is_none());
        assert!(p.prev_id.is_none());
        assert!(p.left_id.is_none());
        assert!(p.right_id.is_none());
        assert_eq!(p.length, 0.0);
    }
    #[test]
    fn test_distance_between_points() {
        let a = SplinePoint::new(0)
            .with_position(Vec3::new(0.0, 0.0, 0.0))
            .build();
        let b = SplinePoint::new(1)
            .with_position(Vec3::new(3.0, 0.0, 4.0))
            .build();
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
    }
}
