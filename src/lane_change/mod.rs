//! # Lane Change Module
//!
//! The animator that carries an accepted MOBIL decision out over multiple
//! ticks as a smooth lateral trajectory, and finalizes the graph transition
//! when the trajectory completes.
//!
//! ## Key Components
//!
//! - [`ActiveLaneChange`] - One in-flight maneuver; at most one per agent
//! - [`LaneChangeAnimator`] - The table of in-flight maneuvers and their
//!   per-tick update
//! - [`quintic_offset`] - The S-curve lateral offset profile
//!
//! ## Finalization
//!
//! At the end of the trajectory the agent atomically leaves the source point,
//! enters the target point, and resets its segment progress. A target point
//! without a `next` link aborts the finalization without partial index
//! updates; the attempt is retried on the following tick.
mod animator;

pub use self::animator::*;
