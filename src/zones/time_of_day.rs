//! Per-hour traffic density modulation.
//!
//! Real traffic is not flat over the day: a deep overnight trough, a morning
//! ramp into the commute peak, a midday plateau and an evening peak. The
//! table below scales the zone density target accordingly; the host feeds
//! the current in-game hour.

/// Relative density per hour of day, index 0 = midnight.
const HOURLY_DENSITY: [f64; 24] = [
    0.18, 0.12, 0.08, 0.08, 0.10, 0.20, // 00-05: overnight trough
    0.45, 0.80, 1.00, 0.90, 0.75, 0.70, // 06-11: morning ramp and peak
    0.72, 0.70, 0.68, 0.75, 0.90, 1.00, // 12-17: midday plateau into evening
    0.95, 0.80, 0.60, 0.45, 0.35, 0.25, // 18-23: wind-down
];

/// Returns the density multiplier for the given hour, clamped to
/// `[floor, 1.0]`.
///
/// # Arguments
/// * `hour` - Hour of day, `0..=23`. Out-of-range values wrap.
/// * `floor` - Lower bound (`min_time_of_day_density` from the config).
///
/// # Example
/// ```
/// use traffic_ai_core::zones::time_of_day_multiplier;
/// // Rush hour runs at full density.
/// assert_eq!(time_of_day_multiplier(8, 0.3), 1.0);
/// // The overnight trough is clamped up to the configured floor.
/// assert_eq!(time_of_day_multiplier(3, 0.3), 0.3);
/// ```
pub fn time_of_day_multiplier(hour: u8, floor: f64) -> f64 {
    let raw = HOURLY_DENSITY[(hour % 24) as usize];
    raw.clamp(floor.min(1.0), 1.0)
}
