//! # Verbose Module
//!
//! Structured logging for the traffic core,
//! using the `tracing` crate with JSON output format.
//!
//! The verbosity ladder maps onto `tracing` levels; the configuration keys
//! `debug_logging` and `log_lane_changes` select how chatty the core is.
//! Event names are stable constants so downstream log pipelines can filter
//! on them.
mod verbose;

pub use self::verbose::*;
