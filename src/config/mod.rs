//! # Config Module
//!
//! The YAML configuration surface of the traffic core.
//!
//! ## Key Components
//!
//! - [`TrafficConfig`] - All tunables, deserialized from a YAML document
//!   with per-field defaults
//! - [`ZoneOverride`] - Per-zone overrides keyed by zone id
//! - [`ConfigError`] - Validation failures; misconfiguration fails startup
//!
//! ## Usage
//!
//! ```rust
//! use traffic_ai_core::config::TrafficConfig;
//!
//! let config = TrafficConfig::from_yaml_str("tick_rate_hz: 25\npoliteness: 0.4\n").unwrap();
//! assert_eq!(config.tick_rate_hz, 25.0);
//! ```
mod config;

pub use self::config::*;
