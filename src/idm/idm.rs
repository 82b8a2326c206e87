use crate::agents::AiAgent;
use crate::personality::DriverParameters;

/// Maximum acceleration `a` of the IDM law (m/s²).
pub const MAX_ACCELERATION: f32 = 2.5;
/// Free-road acceleration exponent `δ`.
pub const ACCELERATION_EXPONENT: i32 = 4;
/// Hard floor applied to the result, as a multiple of the comfortable
/// deceleration `b`.
pub const DECELERATION_CLAMP_FACTOR: f32 = 1.5;

/// A leader observed ahead of an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leader {
    /// Arc-length gap to the leader (meters).
    pub gap: f32,
    /// The leader's current speed (m/s).
    pub speed: f32,
}

/// Parameters of the IDM acceleration law.
///
/// Base values come from the configuration; [`IdmParameters::for_personality`]
/// scales headway and minimum gap by the driver's temperament.
#[derive(Debug, Clone, Copy)]
pub struct IdmParameters {
    /// Comfortable (safe) deceleration `b` (m/s²).
    pub safe_decel: f32,
    /// Standstill minimum gap `s0` (meters).
    pub minimum_gap: f32,
    /// Desired time headway `T` (seconds).
    pub time_headway: f32,
}

impl IdmParameters {
    /// Constructs parameters from raw values.
    pub fn new(safe_decel: f32, minimum_gap: f32, time_headway: f32) -> Self {
        Self {
            safe_decel,
            minimum_gap,
            time_headway,
        }
    }

    /// Returns a copy scaled by the given driver parameters.
    pub fn for_personality(&self, driver: &DriverParameters) -> Self {
        Self {
            safe_decel: self.safe_decel,
            minimum_gap: self.minimum_gap * driver.min_gap_factor(),
            time_headway: self.time_headway * driver.time_headway_factor(),
        }
    }
}

/// Computes the IDM acceleration for an agent.
///
/// With a leader at gap `s` and speed difference `Δv = v − v_lead`:
///
/// ```text
/// s*    = max(s0, s0 + v·T + v·Δv / (2·√(a·b)))
/// a_idm = a · (1 − (v/v0)^δ − (s*/s)²)
/// ```
///
/// Without a leader the interaction term vanishes and the law reduces to the
/// free-road form. The result is clamped to `[−1.5·b, a]`.
///
/// # Arguments
/// * `params` - Model parameters (possibly personality-scaled).
/// * `v` - Current speed (m/s).
/// * `v0` - Desired speed (m/s).
/// * `leader` - The observed leader, if any.
///
/// # Example
/// ```
/// use traffic_ai_core::idm::{idm_acceleration, IdmParameters, Leader, MAX_ACCELERATION};
///
/// let params = IdmParameters::new(4.0, 2.0, 1.2);
/// // Standing start on a free road accelerates at the maximum rate.
/// let a = idm_acceleration(&params, 0.0, 27.8, None);
/// assert!((a - MAX_ACCELERATION).abs() < 1e-6);
/// ```
pub fn idm_acceleration(params: &IdmParameters, v: f32, v0: f32, leader: Option<Leader>) -> f32 {
    let a = MAX_ACCELERATION;
    let b = params.safe_decel;
    let s0 = params.minimum_gap;

    // Degenerate desired speed: treat as full braking demand.
    if v0 <= f32::EPSILON {
        return -DECELERATION_CLAMP_FACTOR * b;
    }

    let free_term = (v / v0).powi(ACCELERATION_EXPONENT);
    let raw = match leader {
        Some(Leader { gap, speed }) => {
            // Guard the division; a vanishing gap means maximum braking anyway.
            let s = gap.max(0.1);
            let dv = v - speed;
            let desired_gap =
                (s0 + v * params.time_headway + v * dv / (2.0 * (a * b).sqrt())).max(s0);
            a * (1.0 - free_term - (desired_gap / s).powi(2))
        }
        None => a * (1.0 - free_term),
    };

    raw.clamp(-DECELERATION_CLAMP_FACTOR * b, a)
}

/// Applies an IDM result to an agent under the override policy.
///
/// The controller never overwrites the host-driven acceleration upward; it
/// only lowers it: `acceleration = min(acceleration, a_idm)`.
pub fn apply_idm(agent: &mut AiAgent, a_idm: f32) {
    agent.acceleration = agent.acceleration.min(a_idm);
}
