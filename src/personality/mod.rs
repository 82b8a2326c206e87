//! # Personality Module
//!
//! Driver personalities and the parameter bundles derived from them.
//!
//! ## Key Components
//!
//! - [`Personality`] - Driver temperament drawn at spawn time
//! - [`DriverParameters`] - Scaling factors applied to the IDM/MOBIL base
//!   parameters for a given personality
//!
//! A personality never changes after spawn; it shifts how close the driver
//! follows, how fast it wants to cruise relative to the zone limit, and how
//! much it cares about the vehicles it cuts in front of.
mod personality;

pub use self::personality::*;
