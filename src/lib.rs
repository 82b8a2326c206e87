//! # traffic_ai_core
//!
//! Core library for server-side realistic AI traffic in multiplayer driving
//! servers.
//!
//! The crate is a tick-driven, multi-agent driving controller: per tick it
//! decides what longitudinal acceleration each AI vehicle should apply given
//! its neighbors on a shared road graph (IDM), whether a vehicle should
//! change lanes under a politeness-weighted incentive model (MOBIL), and it
//! animates accepted lane changes as smooth lateral trajectories while
//! keeping the graph-adjacency bookkeeping consistent. Around this sit a
//! spatial index over spline points, a zone-based density and personality
//! model, and a spawn/despawn controller that keeps the population near each
//! player bounded.
//!
//! ## Modules
//!
//! - [`spline`] - Read-only road graph with next/prev/left/right links
//! - [`agents`] - AI vehicle state and registry
//! - [`neighbors`] - Slowest-occupant index per point; leader/follower walks
//! - [`idm`] - Longitudinal controller (Intelligent Driver Model)
//! - [`mobil`] - Lane-change decider (politeness-weighted incentive + safety)
//! - [`lane_change`] - Multi-tick quintic lane-change animator
//! - [`zones`] - Density, speed and personality regions; time-of-day
//! - [`personality`] - Driver temperament and parameter scaling
//! - [`players`] - Concurrent player-position and cooldown maps
//! - [`population`] - Spawn/despawn controller
//! - [`movement`] - Longitudinal integration and graph transitions
//! - [`simulation`] - Per-tick orchestration and state snapshots
//! - [`scheduler`] - Fixed-rate background loop with cooperative shutdown
//! - [`config`] - YAML configuration surface
//! - [`verbose`] - Structured JSON logging
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use traffic_ai_core::config::TrafficConfig;
//! use traffic_ai_core::scheduler::Scheduler;
//! use traffic_ai_core::simulation::Simulation;
//! use traffic_ai_core::utils::test_graphs::two_lane_road;
//! use traffic_ai_core::zones::{Zone, ZonePredicate, ZonesStorage};
//!
//! let graph = Arc::new(two_lane_road(200, 10.0));
//! let mut zones = ZonesStorage::new();
//! zones.add_zone(Zone::new("highway")
//!     .with_predicate(ZonePredicate::WorldRect {
//!         min_x: -1e5, min_z: -1e5, max_x: 1e5, max_z: 1e5,
//!     })
//!     .with_speed_limit(33.0)
//!     .with_lane_count(2)
//!     .build());
//! let config = TrafficConfig::default();
//!
//! let simulation = Simulation::new(graph, zones, config.clone());
//! let players = simulation.players(); // hand to host position callbacks
//! let handle = Scheduler::new(config.tick_rate_hz).start(simulation);
//! // ... server runs ...
//! let simulation = handle.stop();
//! # let _ = (players, simulation);
//! ```

pub mod agents;
pub mod config;
pub mod geom;
pub mod idm;
pub mod lane_change;
pub mod mobil;
pub mod movement;
pub mod neighbors;
pub mod personality;
pub mod players;
pub mod population;
pub mod scheduler;
pub mod simulation;
pub mod spline;
pub mod utils;
pub mod verbose;
pub mod zones;
