use crate::idm::IdmParameters;
use crate::lane_change::AnimatorParameters;
use crate::mobil::MobilParameters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Custom error types for configuration loading and validation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The YAML document does not match the schema.
    Parse(String),
    /// Personality ratios sum to more than 1.
    RatioSumExceeded { sum: f64 },
    /// A value is outside its valid range.
    InvalidValue { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(value) => {
                write!(f, "Can't read configuration file: {}", value)
            }
            ConfigError::Parse(value) => {
                write!(f, "Can't parse configuration: {}", value)
            }
            ConfigError::RatioSumExceeded { sum } => {
                write!(f, "Personality ratios must sum to at most 1, got '{}'", sum)
            }
            ConfigError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for '{}': {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-zone overrides keyed by zone id in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneOverride {
    /// Replacement density multiplier.
    pub density_mult: Option<f64>,
    /// Replacement speed limit (m/s).
    pub speed_limit: Option<f32>,
    /// Replacement lane count.
    pub lane_count: Option<u8>,
    /// Set to `false` to disable spawning in the zone entirely.
    pub enabled: bool,
}

impl Default for ZoneOverride {
    fn default() -> Self {
        Self {
            density_mult: None,
            speed_limit: None,
            lane_count: None,
            enabled: true,
        }
    }
}

/// All tunables of the traffic core, loaded from a YAML document.
///
/// Every field has a default, so an empty document yields a working
/// configuration; [`TrafficConfig::validate`] is called by the loaders and
/// fails startup on out-of-range values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Scheduler frequency (ticks per second).
    pub tick_rate_hz: f64,

    /// Population region ahead of each player (meters along the graph).
    pub spawn_ahead_m: f32,
    /// Population region behind each player (meters along the graph).
    pub spawn_behind_m: f32,
    /// Despawn distance from the nearest player (meters).
    pub despawn_m: f32,
    /// Minimum arc-length gap to existing vehicles at spawn (meters).
    pub min_spawn_gap_m: f32,
    /// Spawn rate limiter per tick and player.
    pub max_spawns_per_tick: usize,

    /// Density target per kilometer before zone and time-of-day factors.
    pub base_density_per_km: f64,
    /// Hard ceiling on the total AI population.
    pub max_total: usize,
    /// Ceiling on AI vehicles attributed to one player's region.
    pub per_player: usize,

    /// Personality-neutral cruise speed for cars (km/h).
    pub desired_speed_kph: f32,
    /// Personality-neutral cruise speed for trucks (km/h).
    pub truck_desired_speed_kph: f32,

    /// IDM standstill minimum gap `s0` (meters).
    pub minimum_gap_m: f32,
    /// IDM desired time headway `T` (seconds).
    pub time_headway_s: f32,
    /// IDM comfortable deceleration `b` (m/s²).
    pub safe_decel_mps2: f32,

    /// MOBIL politeness weight; 0 is selfish, 0.5 highly cooperative.
    pub politeness: f32,
    /// MOBIL acceptance threshold (m/s²).
    pub lane_change_threshold: f32,
    /// Additive keep-slow-lane penalty (m/s²).
    pub keep_slow_lane_bias: f32,
    /// Seconds between two lane changes of the same agent.
    pub lane_change_cooldown_s: f32,

    /// Lane-change duration at 100 km/h (seconds).
    pub base_duration_s: f32,
    /// Lane-change duration floor (seconds).
    pub min_duration_s: f32,
    /// Lane-change duration cap (seconds).
    pub max_duration_s: f32,
    /// Lateral distance between adjacent lanes (meters).
    pub lane_width_m: f32,

    /// Default personality draw: probability of a timid driver.
    pub timid_ratio: f64,
    /// Default personality draw: probability of a normal driver.
    pub normal_ratio: f64,
    /// Default personality draw: probability of an aggressive driver.
    pub aggressive_ratio: f64,
    /// Probability of spawning a truck rather than a car.
    pub truck_ratio: f64,

    /// Floor of the time-of-day density multiplier.
    pub min_time_of_day_density: f64,

    /// Compute the IDM phase in parallel over a read-only snapshot.
    pub parallel_idm: bool,

    /// Per-zone overrides keyed by zone id.
    pub zone_overrides: HashMap<String, ZoneOverride>,

    /// Raise the log verbosity to detailed diagnostics.
    pub debug_logging: bool,
    /// Emit lane-change events at the main log level.
    pub log_lane_changes: bool,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 50.0,
            spawn_ahead_m: 600.0,
            spawn_behind_m: 200.0,
            despawn_m: 2000.0,
            min_spawn_gap_m: 40.0,
            max_spawns_per_tick: 3,
            base_density_per_km: 10.0,
            max_total: 120,
            per_player: 30,
            desired_speed_kph: 100.0,
            truck_desired_speed_kph: 80.0,
            minimum_gap_m: 2.0,
            time_headway_s: 1.2,
            safe_decel_mps2: 4.0,
            politeness: 0.3,
            lane_change_threshold: 0.15,
            keep_slow_lane_bias: 0.2,
            lane_change_cooldown_s: 8.0,
            base_duration_s: 3.5,
            min_duration_s: 2.5,
            max_duration_s: 7.0,
            lane_width_m: 3.0,
            timid_ratio: 0.2,
            normal_ratio: 0.55,
            aggressive_ratio: 0.2,
            truck_ratio: 0.12,
            min_time_of_day_density: 0.3,
            parallel_idm: false,
            zone_overrides: HashMap::new(),
            debug_logging: false,
            log_lane_changes: false,
        }
    }
}

impl TrafficConfig {
    /// Parses and validates a configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use traffic_ai_core::config::TrafficConfig;
    /// let config = TrafficConfig::from_yaml_str("politeness: 0.5").unwrap();
    /// assert_eq!(config.politeness, 0.5);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: TrafficConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        crate::log_main!(
            crate::verbose::EVENT_CONFIG_LOADED,
            "Traffic configuration loaded",
            tick_rate_hz = config.tick_rate_hz,
            max_total = config.max_total
        );
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml_str(&raw)
    }

    /// Validates value ranges and ratio sums. Called by the loaders;
    /// misconfiguration surfaces at startup, never mid-simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_rate_hz",
                reason: format!("must be positive, got {}", self.tick_rate_hz),
            });
        }
        let ratio_sum = self.timid_ratio + self.normal_ratio + self.aggressive_ratio;
        if ratio_sum > 1.0 {
            return Err(ConfigError::RatioSumExceeded { sum: ratio_sum });
        }
        for (key, value) in [
            ("timid_ratio", self.timid_ratio),
            ("normal_ratio", self.normal_ratio),
            ("aggressive_ratio", self.aggressive_ratio),
            ("truck_ratio", self.truck_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("must be within [0, 1], got {}", value),
                });
            }
        }
        if self.safe_decel_mps2 <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "safe_decel_mps2",
                reason: format!("must be positive, got {}", self.safe_decel_mps2),
            });
        }
        if self.min_duration_s > self.max_duration_s {
            return Err(ConfigError::InvalidValue {
                key: "min_duration_s",
                reason: format!(
                    "must not exceed max_duration_s, got {} > {}",
                    self.min_duration_s, self.max_duration_s
                ),
            });
        }
        if self.spawn_ahead_m < 0.0 || self.spawn_behind_m < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "spawn_ahead_m",
                reason: "spawn region bounds must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// IDM parameters derived from this configuration.
    pub fn idm_parameters(&self) -> IdmParameters {
        IdmParameters::new(self.safe_decel_mps2, self.minimum_gap_m, self.time_headway_s)
    }

    /// MOBIL parameters derived from this configuration.
    pub fn mobil_parameters(&self) -> MobilParameters {
        MobilParameters::new(
            self.politeness,
            self.lane_change_threshold,
            self.keep_slow_lane_bias,
        )
    }

    /// Animator parameters derived from this configuration.
    pub fn animator_parameters(&self) -> AnimatorParameters {
        AnimatorParameters {
            base_duration_s: self.base_duration_s,
            min_duration_s: self.min_duration_s,
            max_duration_s: self.max_duration_s,
            lane_width_m: self.lane_width_m,
            log_lane_changes: self.log_lane_changes,
        }
    }

    /// Scheduler tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> i64 {
        (1000.0 / self.tick_rate_hz).round() as i64
    }

    /// Car cruise speed in m/s.
    pub fn desired_speed_mps(&self) -> f32 {
        self.desired_speed_kph / 3.6
    }

    /// Truck cruise speed in m/s.
    pub fn truck_desired_speed_mps(&self) -> f32 {
        self.truck_desired_speed_kph / 3.6
    }
}
