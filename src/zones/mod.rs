//! # Zones Module
//!
//! Named regions of the road with their own density, speed and personality
//! distribution, plus the time-of-day density modulation.
//!
//! ## Key Components
//!
//! - [`Zone`] - One region: spatial predicate, lane count, density
//!   multiplier, speed limit, truck ratio, driver profile
//! - [`ZonePredicate`] - Point-set membership (preferred) or an axis-aligned
//!   XZ rectangle (fallback)
//! - [`ZonesStorage`] - First-match lookup over all registered zones
//! - [`DriverProfile`] - Personality ratios sampled at spawn time
//! - [`time_of_day_multiplier`] - Per-hour density factor
//!
//! Zones partition the road: at any position at most one zone applies, and
//! an unknown position yields no zone, which disables spawning there. Zone
//! definitions are data registered by the host, not code.
mod zone;
mod time_of_day;

pub use self::{time_of_day::*, zone::*};
