//! # Scheduler Module
//!
//! The background service driving the simulation at a fixed rate.
//!
//! ## Key Components
//!
//! - [`Scheduler`] - Fixed-rate tick loop on a dedicated worker thread
//! - [`SchedulerHandle`] - Join handle participating in the host's
//!   graceful-shutdown protocol
//! - [`ShutdownToken`] - Cooperative cancellation signal
//! - [`Clock`] / [`MonotonicClock`] / [`ManualClock`] - Server-time source;
//!   the manual clock drives deterministic tests
//!
//! ## Loop behavior
//!
//! On each wake the loop computes `dt = now − last_update`; when `dt` has
//! reached the tick interval it executes one tick and records the time,
//! otherwise it sleeps the remainder. Tick errors are logged and followed by
//! a one-second back-off sleep; the loop never terminates on transient
//! failure. The cancellation token is checked before sleeping and between
//! tick phases.
mod clock;
mod scheduler;

pub use self::{clock::*, scheduler::*};
