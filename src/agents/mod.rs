// src/agents/mod.rs
//! # Agents Module
//!
//! This module provides the AI vehicle state and its storage, the set of
//! entities the tick loop drives every simulation step.
//!
//! ## Key Components
//!
//! - [`AiAgent`] - One non-player vehicle under the core's control
//! - [`AgentsRegistry`] - Exclusive owner of all active agents
//!
//! ## Usage
//!
//! ```rust
//! use traffic_ai_core::agents::{AiAgent, AgentKind};
//! use traffic_ai_core::personality::Personality;
//!
//! // Create a basic agent
//! let agent = AiAgent::new(1)
//!     .with_point(10)
//!     .with_speed(22.0)
//!     .with_target_speed(27.8)
//!     .with_kind(AgentKind::Car)
//!     .with_personality(Personality::Normal)
//!     .build();
//! ```
//!
//! ## Features
//!
//! - **Stable identity**: an agent keeps its id across lane changes; only
//!   `current_point` moves at finalization
//! - **Published movement contract**: point, progress and segment length are
//!   ordinary fields, so graph transitions are plain method calls
//! - **Builder pattern**: API for agent construction
mod agent;
mod registry;

pub use self::{agent::*, registry::*};
