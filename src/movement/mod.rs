//! # Movement Module
//!
//! Longitudinal integration and graph transitions for all agents, executed
//! once per tick after the controllers ran.
//!
//! The integration is deliberately simple kinematics: speed follows the
//! controller acceleration, progress follows speed, and a saturated segment
//! moves the agent to its `next` point while keeping the neighbor index
//! consistent. Agents that run off a dead end are reported for despawn.
mod movement;

pub use self::movement::*;
