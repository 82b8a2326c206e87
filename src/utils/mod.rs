//! # Utils Module
//!
//! Utility functions and test data generators for traffic core development
//! and testing.
//!
//! ## Key Components
//!
//! ### Test Graphs
//! - [`test_graphs::straight_road`] - Single-lane straight road
//! - [`test_graphs::two_lane_road`] - Two parallel lanes with left/right links
//! - [`test_graphs::ring_road`] - Closed single-lane loop
//!
//! ### Testing Support
//! - [`rand::rng`] - Deterministic RNG for reproducible tests
//!
//! ## Example
//!
//! ```rust
//! use traffic_ai_core::utils::test_graphs::two_lane_road;
//!
//! // Two lanes of 100 points spaced 10 m apart
//! let graph = two_lane_road(100, 10.0);
//! assert_eq!(graph.points().len(), 200);
//! ```
pub mod rand;
pub mod test_graphs;
