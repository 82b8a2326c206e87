use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Represents the driver personality of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Long headways, cruises below the limit, very cooperative.
    Timid,
    /// Baseline driver; uses the configured parameters unscaled.
    Normal,
    /// Short headways, cruises above the limit.
    Aggressive,
    /// Tailgates and changes lanes with little regard for followers.
    VeryAggressive,
}

impl Personality {
    /// Draws a random personality based on provided ratios.
    ///
    /// The three ratios must sum to at most 1; the remainder is the
    /// probability of `VeryAggressive`.
    ///
    /// # Arguments
    ///
    /// - `timid_ratio`: Probability of `Timid`.
    /// - `normal_ratio`: Probability of `Normal`.
    /// - `aggressive_ratio`: Probability of `Aggressive`.
    ///
    /// # Returns
    ///
    /// A `Personality` randomly chosen based on the given ratios.
    ///
    /// # Examples
    ///
    /// ```
    /// use traffic_ai_core::personality::Personality;
    ///
    /// let personality = Personality::random_personality(0.2, 0.55, 0.2);
    /// ```
    pub fn random_personality(timid_ratio: f64, normal_ratio: f64, aggressive_ratio: f64) -> Self {
        let mut rng = crate::utils::rand::rng();
        Self::random_personality_with(&mut rng, timid_ratio, normal_ratio, aggressive_ratio)
    }

    /// Draws a random personality from an explicit RNG.
    ///
    /// Used by the spawn controller so that population draws stay
    /// reproducible under a fixed simulation seed.
    pub fn random_personality_with(
        rng: &mut impl Rng,
        timid_ratio: f64,
        normal_ratio: f64,
        aggressive_ratio: f64,
    ) -> Self {
        let roll: f64 = rng.random();
        if roll < timid_ratio {
            Personality::Timid
        } else if roll < timid_ratio + normal_ratio {
            Personality::Normal
        } else if roll < timid_ratio + normal_ratio + aggressive_ratio {
            Personality::Aggressive
        } else {
            Personality::VeryAggressive
        }
    }
}

impl fmt::Display for Personality {
    /// Formats the personality for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use traffic_ai_core::personality::Personality;
    ///
    /// assert_eq!(format!("{}", Personality::Timid), "timid");
    /// assert_eq!(format!("{}", Personality::Normal), "normal");
    /// assert_eq!(format!("{}", Personality::Aggressive), "aggressive");
    /// assert_eq!(format!("{}", Personality::VeryAggressive), "very_aggressive");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            Personality::Timid => "timid",
            Personality::Normal => "normal",
            Personality::Aggressive => "aggressive",
            Personality::VeryAggressive => "very_aggressive",
        };
        write!(f, "{}", as_str)
    }
}

/// Represents parameter scaling for a driver personality.
///
/// The factors multiply the configured base values: desired speed against the
/// zone speed limit, time headway and minimum gap against the IDM config, and
/// politeness against the MOBIL config.
#[derive(Debug, Clone, Copy)]
pub struct DriverParameters {
    /// Factor on the zone speed limit when picking the cruise speed.
    desired_speed_factor: f32,
    /// Factor on the configured IDM time headway.
    time_headway_factor: f32,
    /// Factor on the configured IDM minimum gap.
    min_gap_factor: f32,
    /// Factor on the configured MOBIL politeness.
    politeness_factor: f32,
}

impl DriverParameters {
    /// Constructs parameters for the given personality.
    ///
    /// # Examples
    ///
    /// ```
    /// use traffic_ai_core::personality::{DriverParameters, Personality};
    ///
    /// let params = DriverParameters::from_personality(Personality::Aggressive);
    /// assert!(params.time_headway_factor() < 1.0);
    /// ```
    pub fn from_personality(personality: Personality) -> Self {
        match personality {
            Personality::Timid => Self::new(0.85, 1.4, 1.5, 1.6),
            Personality::Normal => Self::new(1.0, 1.0, 1.0, 1.0),
            Personality::Aggressive => Self::new(1.1, 0.75, 0.8, 0.5),
            Personality::VeryAggressive => Self::new(1.2, 0.55, 0.6, 0.2),
        }
    }

    /// Constructs a new instance of `DriverParameters`.
    pub fn new(
        desired_speed_factor: f32,
        time_headway_factor: f32,
        min_gap_factor: f32,
        politeness_factor: f32,
    ) -> Self {
        Self {
            desired_speed_factor,
            time_headway_factor,
            min_gap_factor,
            politeness_factor,
        }
    }

    /// Returns the desired-speed factor.
    pub fn desired_speed_factor(&self) -> f32 {
        self.desired_speed_factor
    }

    /// Returns the time-headway factor.
    pub fn time_headway_factor(&self) -> f32 {
        self.time_headway_factor
    }

    /// Returns the minimum-gap factor.
    pub fn min_gap_factor(&self) -> f32 {
        self.min_gap_factor
    }

    /// Returns the politeness factor.
    pub fn politeness_factor(&self) -> f32 {
        self.politeness_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_personality_display() {
        assert_eq!(format!("{}", Personality::Normal), "normal");
        assert_eq!(format!("{}", Personality::VeryAggressive), "very_aggressive");
    }
    #[test]
    fn test_parameters_ordering() {
        let timid = DriverParameters::from_personality(Personality::Timid);
        let normal = DriverParameters::from_personality(Personality::Normal);
        let aggressive = DriverParameters::from_personality(Personality::Aggressive);
        assert!(timid.time_headway_factor() > normal.time_headway_factor());
        assert!(normal.time_headway_factor() > aggressive.time_headway_factor());
        assert!(timid.politeness_factor() > aggressive.politeness_factor());
        assert!(timid.desired_speed_factor() < aggressive.desired_speed_factor());
    }
    #[test]
    fn test_random_personality_respects_ratios() {
        // Timid ratio of 1.0 leaves no probability mass for anything else.
        for _ in 0..50 {
            let p = Personality::random_personality(1.0, 0.0, 0.0);
            assert_eq!(p, Personality::Timid);
        }
    }
}
