//! # Players Module
//!
//! Concurrent state written by host callbacks and read by the tick loop.
//!
//! ## Key Components
//!
//! - [`PlayerPos`] - One connected player's position on the graph
//! - [`PlayersStorage`] - Concurrent session map; the spawn controller works
//!   from a per-tick snapshot of it
//! - [`CooldownsStorage`] - Per-agent lane-change cooldown stamps
//!
//! Both maps use concurrent containers because the host updates them from
//! its own threads while the tick loop reads them. After shutdown the
//! players storage stops accepting updates.
mod players;

pub use self::players::*;
