// src/verbose/verbose.rs
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, info, trace, Level};
use tracing_subscriber::{
    fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Hierarchical logging levels for simulation debugging.
///
/// Each level includes all lower levels, providing increasingly detailed
/// output. Uses JSON structured logging via the `tracing` crate.
///
/// # Examples
///
/// ```rust
/// use traffic_ai_core::verbose::{VerboseLevel, set_verbose_level};
///
/// // Set logging level
/// set_verbose_level(VerboseLevel::Main);
///
/// // Check current level
/// if VerboseLevel::Main.is_at_least(VerboseLevel::Additional) {
///     println!("Will log additional details");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VerboseLevel {
    /// No debug at all
    None = 0,
    /// Major lifecycle events - `info` level
    Main = 1,
    /// Spawns, lane changes, per-agent decisions - `debug` level
    Additional = 2,
    /// Per-tick details - `debug` level
    Detailed = 3,
    /// Everything including traces - `trace` level
    All = 4,
}

impl fmt::Display for VerboseLevel {
    /// Formats the verbosity level for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use traffic_ai_core::verbose::VerboseLevel;
    ///
    /// assert_eq!(format!("{}", VerboseLevel::None), "none");
    /// assert_eq!(format!("{}", VerboseLevel::Main), "main");
    /// assert_eq!(format!("{}", VerboseLevel::Additional), "additional");
    /// assert_eq!(format!("{}", VerboseLevel::Detailed), "detailed");
    /// assert_eq!(format!("{}", VerboseLevel::All), "all");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerboseLevel::None => "none",
            VerboseLevel::Main => "main",
            VerboseLevel::Additional => "additional",
            VerboseLevel::Detailed => "detailed",
            VerboseLevel::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl From<VerboseLevel> for Level {
    fn from(level: VerboseLevel) -> Self {
        match level {
            VerboseLevel::None => Level::ERROR,
            VerboseLevel::Main => Level::INFO,
            VerboseLevel::Additional => Level::DEBUG,
            VerboseLevel::Detailed => Level::DEBUG,
            VerboseLevel::All => Level::TRACE,
        }
    }
}

// Event type constants
pub const EVENT_SIMULATION_CREATE: &str = "simulation_create";
pub const EVENT_TICK: &str = "tick";
pub const EVENT_SCHEDULER_START: &str = "scheduler_start";
pub const EVENT_SCHEDULER_STOP: &str = "scheduler_stop";
pub const EVENT_SCHEDULER_BACKOFF: &str = "scheduler_backoff";
pub const EVENT_SPAWN_VEHICLE: &str = "spawn_vehicle";
pub const EVENT_DESPAWN_VEHICLE: &str = "despawn_vehicle";
pub const EVENT_LANE_CHANGE_START: &str = "lane_change_start";
pub const EVENT_LANE_CHANGE_FINALIZE: &str = "lane_change_finalize";
pub const EVENT_LANE_CHANGE_ABORT: &str = "lane_change_abort";
pub const EVENT_MOVEMENT_DEAD_END: &str = "movement_dead_end";
pub const EVENT_CONFIG_LOADED: &str = "config_loaded";
pub const EVENT_SHUTDOWN: &str = "shutdown";

// Global verbose level storage
static VERBOSE_LEVEL: OnceLock<VerboseLevel> = OnceLock::new();
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Initialize the tracing logger once
pub fn init_logger() {
    if LOGGER_INITIALIZED.set(true).is_ok() {
        tracing_subscriber::registry()
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Sets the global verbose level and initializes the tracing logger
pub fn set_verbose_level(level: VerboseLevel) {
    let _ = VERBOSE_LEVEL.set(level);
    init_logger();
}

/// Derives the verbose level from the diagnostics configuration keys.
pub fn set_verbose_level_from_config(debug_logging: bool) {
    set_verbose_level(if debug_logging {
        VerboseLevel::Detailed
    } else {
        VerboseLevel::Main
    });
}

/// Gets the current global verbose level
pub fn get_verbose_level() -> VerboseLevel {
    *VERBOSE_LEVEL.get().unwrap_or(&VerboseLevel::None)
}

/// Checks if current global verbose level is at least the specified level
pub fn is_verbose_level(level: VerboseLevel) -> bool {
    get_verbose_level() >= level
}

/// Logs a message if the global verbose level allows it
pub fn verbose_log(level: VerboseLevel, event: &str, message: &str) {
    if !is_verbose_level(level) {
        return;
    }

    match level {
        VerboseLevel::None => {}
        VerboseLevel::Main => {
            info!(event = event, message);
        }
        VerboseLevel::Additional | VerboseLevel::Detailed => {
            debug!(event = event, message);
        }
        VerboseLevel::All => {
            trace!(event = event, message);
        }
    }
}

/// Session-specific logging helpers
impl VerboseLevel {
    /// Checks if this level is at least the minimum level
    pub fn is_at_least(self, min_level: VerboseLevel) -> bool {
        self >= min_level
    }
}

// ===== CONVENIENCE MACROS =====

/// Logs an info-level message if the global verbose level is
/// [`VerboseLevel::Main`] or higher.
#[macro_export]
macro_rules! log_main {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Main) {
            tracing::info!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($key:ident = $value:expr),+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Main) {
            tracing::info!(
                event = $event,
                $($key = $value,)+
                $msg
            );
        }
    };
}

/// Logs a debug-level message if the global verbose level is [`VerboseLevel::Additional`] or higher.
///
/// Use for per-agent events: spawns, despawns, lane-change decisions.
#[macro_export]
macro_rules! log_additional {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Additional) {
            tracing::debug!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($key:ident = $value:expr),+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Additional) {
            tracing::debug!(
                event = $event,
                $($key = $value,)+
                $msg
            );
        }
    };
}

/// Logs a debug-level message if the global verbose level is [`VerboseLevel::Detailed`] or higher.
///
/// Use for fine-grained details such as per-tick summaries.
#[macro_export]
macro_rules! log_detailed {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Detailed) {
            tracing::debug!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($key:ident = $value:expr),+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Detailed) {
            tracing::debug!(
                event = $event,
                $($key = $value,)+
                $msg
            );
        }
    };
}

/// Logs a trace-level message if the global verbose level is [`VerboseLevel::All`].
///
/// Use for the most verbose output, including every internal state change.
#[macro_export]
macro_rules! log_all {
    ($event:expr, $msg:literal) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::All) {
            tracing::trace!(event = $event, $msg);
        }
    };
    ($event:expr, $msg:literal, $($key:ident = $value:expr),+) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::All) {
            tracing::trace!(
                event = $event,
                $($key = $value,)+
                $msg
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(VerboseLevel::All.is_at_least(VerboseLevel::Main));
        assert!(!VerboseLevel::Main.is_at_least(VerboseLevel::Detailed));
        assert!(VerboseLevel::Detailed.is_at_least(VerboseLevel::Detailed));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(format!("{}", VerboseLevel::Additional), "additional");
        assert_eq!(format!("{}", VerboseLevel::All), "all");
    }

    #[test]
    fn test_level_into_tracing() {
        assert_eq!(Level::from(VerboseLevel::Main), Level::INFO);
        assert_eq!(Level::from(VerboseLevel::All), Level::TRACE);
    }
}
