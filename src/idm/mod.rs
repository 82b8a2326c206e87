//! # IDM Module
//!
//! The longitudinal controller: an Intelligent Driver Model acceleration law
//! computed per tick for every agent.
//!
//! ## Key Components
//!
//! - [`IdmParameters`] - Model constants (max acceleration, comfortable
//!   deceleration, minimum gap, time headway)
//! - [`idm_acceleration`] - The acceleration law itself
//! - [`apply_idm`] - The min-override policy: the controller only ever
//!   lowers an agent's acceleration, never raises it
//!
//! The host's default driving logic accelerates freely; the core's
//! responsibility is to enforce safer braking on top of it.
mod idm;

pub use self::idm::*;
