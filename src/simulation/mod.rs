//! # Simulation module
//!
//! **Top-level orchestration module** – Coordinates all major components of
//! the AI traffic core.
//!
//! This module owns the agent registry, the neighbor index, the lane-change
//! animator and the zone storage, and executes the per-tick pipeline against
//! the shared road graph. It is the main entry point for embedding the
//! traffic core into a host server.
//!
//! ## Tick pipeline
//!
//! The pipeline executed in [`Simulation::tick()`](crate::simulation::simulation::Simulation::tick):
//! ```text
//! 1. Snapshot player positions
//! 2. Animator update            ← lane_change module
//! 3. Default drive acceleration
//! 4. IDM lowering pass          ← idm module (optionally parallel)
//! 5. MOBIL trials               ← mobil module
//! 6. Longitudinal integration   ← movement module
//! 7. Spawn/despawn sweep        ← population module
//! ```
//!
//! No phase observes its own mutations: the IDM pass works on a read-only
//! snapshot of the neighbor index, and the animator/MOBIL phases run
//! serially. Given identical inputs (graph, players, seed, config, clock)
//! two runs produce identical agent states at every tick boundary.
//!
//! ## Components
//!
//! - [`simulation::Simulation`] – Main controller; owns all mutable state
//! - [`states::TrafficState`] – Snapshot of vehicle states for transport
//! - [`states::VehicleState`] – One vehicle's state at a timestamp
//! - [`simulation::SimulationError`] – Host-contract violations
//!
//! ## Usage
//!
//! Create a simulation from a graph, zones and a configuration, feed player
//! positions, then tick it (directly or through the scheduler):
//! ```rust
//! use traffic_ai_core::config::TrafficConfig;
//! use traffic_ai_core::players::PlayerPos;
//! use traffic_ai_core::simulation::Simulation;
//! use traffic_ai_core::utils::test_graphs::two_lane_road;
//! use traffic_ai_core::zones::ZonesStorage;
//! use traffic_ai_core::geom::Vec3;
//! use std::sync::Arc;
//!
//! let graph = Arc::new(two_lane_road(100, 10.0));
//! let config = TrafficConfig::default();
//! let mut sim = Simulation::with_seed(graph, ZonesStorage::new(), config, 42);
//! sim.players().update_player(PlayerPos {
//!     session_id: 1,
//!     current_point: Some(50),
//!     world_pos: Vec3::new(0.0, 0.0, 500.0),
//! });
//! for step in 0..10 {
//!     sim.tick(step * 20).unwrap();
//! }
//! let state = sim.extract_states(200);
//! println!("Vehicles: {}", state.vehicles.len());
//! ```
pub mod simulation;
pub mod states;

pub use self::{simulation::*, states::*};
