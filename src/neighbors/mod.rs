//! # Neighbors Module
//!
//! The per-point occupancy index and the graph walks built on top of it.
//!
//! ## Key Components
//!
//! - [`NeighborIndex`] - For each spline point, the slowest AI currently
//!   occupying it; updated on every graph transition
//! - [`find_leader_from`] / [`find_follower_from`] - Capped arc-length walks
//!   locating the nearest occupant ahead or behind a point
//!
//! ## Invariants
//!
//! - An agent appears in the index under at most one point at a time, its
//!   `current_point`.
//! - When several agents share a point, the index keeps the slowest one;
//!   a faster agent leaving the point never evicts a slower occupant.
mod neighbor_index;

pub use self::neighbor_index::*;
