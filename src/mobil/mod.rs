//! # MOBIL Module
//!
//! The lane-change decider: a politeness-weighted incentive model with a
//! safety test on the would-be follower in the target lane.
//!
//! ## Key Components
//!
//! - [`MobilParameters`] - Politeness, acceptance threshold, keep-slow-lane
//!   bias and cooldown
//! - [`evaluate_lane_change`] - Evaluates both sides for a blocked agent and
//!   returns the accepted maneuver, if any
//! - [`LaneSide`] / [`LaneChangeDecision`] - The outcome handed to the animator
//!
//! A decision never mutates state; accepted maneuvers are carried out by the
//! lane-change animator over the following ticks.
mod mobil;

pub use self::mobil::*;
