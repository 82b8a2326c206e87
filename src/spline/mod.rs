//! # Spline Module
//!
//! This module provides the read-only road-network view the traffic core
//! drives on: a directed graph of spline points with next/prev/left/right
//! links, plus a ground-plane spatial grid for world-to-spline projection.
//!
//! ## Key Components
//!
//! - [`point::SplinePoint`] - Road-graph node with world position, arc length and lane links
//! - [`point::SplinePointBuilder`] - Fluent builder for constructing points
//! - [`graph::SplineGraph`] - Contiguous, immutable point storage with link validation
//! - [`grid::SplineGrid`] - Cell-keyed XZ index for nearest-point and range queries
//!
//! ## Graph conventions
//!
//! - Points are stored in a contiguous array indexed by [`point::PointId`];
//!   the graph is static after load and shared by reference.
//! - `next`/`prev` encode the driving direction of a lane; `left`/`right`
//!   encode lane adjacency. There is no global lane id.
//! - Links may form cycles (ring roads, merges). Transitions are explicit
//!   moves; walks are always capped by an arc-length budget.
//!
//! ## Usage Examples
//!
//! ```rust
//! use traffic_ai_core::spline::{SplinePoint, SplineGraph};
//! use traffic_ai_core::geom::Vec3;
//!
//! let points = vec![
//!     SplinePoint::new(0)
//!         .with_position(Vec3::new(0.0, 0.0, 0.0))
//!         .with_length(10.0)
//!         .with_next(1)
//!         .build(),
//!     SplinePoint::new(1)
//!         .with_position(Vec3::new(0.0, 0.0, 10.0))
//!         .with_length(10.0)
//!         .with_prev(0)
//!         .build(),
//! ];
//! let graph = SplineGraph::from_points(points).unwrap();
//! assert!(graph.get_point(1).is_some());
//! ```

pub mod point;
pub mod graph;
pub mod grid;

pub use self::{graph::*, grid::*, point::*};
