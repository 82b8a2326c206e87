//! # Population Module
//!
//! The spawn/despawn controller keeping the AI population near each player
//! bounded.
//!
//! ## Key Components
//!
//! - [`spawn_sweep`] - Per-player density targeting and rate-limited spawning
//! - [`despawn_sweep`] - Removal of agents out of range of every player
//! - [`region_occupancy`] - Occupancy count over the population region
//!
//! Spawning needs a governing zone: positions without one never spawn.
//! Placement avoids the player's immediate view (behind, or far ahead) and
//! rejects candidates within the minimum spawn gap of existing vehicles.
mod spawner;

pub use self::spawner::*;
