use crate::geom::Vec3;
use crate::personality::Personality;
use crate::spline::point::PointId;
use serde::Serialize;
use std::fmt;

pub type AgentId = u64; // Alias for AgentId

/// Vehicle body class of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Regular passenger car.
    Car,
    /// Heavy truck; slower cruise speed, drawn by the zone truck ratio.
    Truck,
}

impl fmt::Display for AgentKind {
    /// Formats the agent kind for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use traffic_ai_core::agents::AgentKind;
    ///
    /// assert_eq!(format!("{}", AgentKind::Car), "car");
    /// assert_eq!(format!("{}", AgentKind::Truck), "truck");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            AgentKind::Car => "car",
            AgentKind::Truck => "truck",
        };
        write!(f, "{}", as_str)
    }
}

/// Represents one AI vehicle in the simulation.
///
/// Identity is stable for the whole lifetime of the agent; `current_point`
/// changes only through forward movement and lane-change finalization. The
/// acceleration field is the controller output consumed by the movement
/// integration step; the longitudinal controller only ever lowers it.
#[derive(Debug, Clone)]
pub struct AiAgent {
    /// Unique identifier.
    pub id: AgentId,
    /// Spline point the agent currently occupies.
    pub current_point: PointId,
    /// Progress along the current segment, in `[0, vec_length]` meters.
    pub vec_progress: f32,
    /// Arc length of the current segment (current point to its `next`).
    pub vec_length: f32,
    /// Current longitudinal speed (m/s).
    pub current_speed: f32,
    /// Speed the agent is trying to cruise at (m/s).
    pub target_speed: f32,
    /// Hard speed ceiling for this agent (m/s).
    pub max_speed: f32,
    /// Longitudinal acceleration output (m/s²), consumed by the movement step.
    pub acceleration: f32,
    /// Driver personality; scales IDM and MOBIL parameters.
    pub personality: Personality,
    /// Vehicle body class.
    pub kind: AgentKind,
    /// Whether the agent has been placed on the graph and entered the
    /// neighbor index. Uninitialized agents are skipped by every controller.
    pub initialized: bool,
    /// World position snapshot (base position plus any lateral overlay).
    pub position: Vec3,
    /// World velocity snapshot.
    pub velocity: Vec3,
    /// Heading yaw in radians; fallback for lateral-offset direction when
    /// the velocity is too small.
    pub heading_yaw: f32,
}

impl AiAgent {
    /// Constructs a new `AiAgentBuilder` for building an `AiAgent` object.
    ///
    /// # Arguments
    /// * `id` - A unique identifier for the agent.
    ///
    /// # Returns
    /// An `AiAgentBuilder` struct which is used to configure and build the
    /// `AiAgent` object.
    ///
    /// # Example
    /// ```
    /// use traffic_ai_core::agents::{AgentKind, AiAgent};
    /// let agent = AiAgent::new(1)
    ///     .with_point(5)
    ///     .with_speed(20.0)
    ///     .with_target_speed(27.8)
    ///     .with_kind(AgentKind::Car)
    ///     .build();
    /// println!("Agent: {:?}", agent);
    /// ```
    pub fn new(id: AgentId) -> AiAgentBuilder {
        AiAgentBuilder {
            agent: AiAgent {
                id,
                current_point: 0,
                vec_progress: 0.0,
                vec_length: 0.0,
                current_speed: 0.0,
                target_speed: 0.0,
                max_speed: 55.0,
                acceleration: 0.0,
                personality: Personality::Normal,
                kind: AgentKind::Car,
                initialized: false,
                position: Vec3::zero(),
                velocity: Vec3::zero(),
                heading_yaw: 0.0,
            },
        }
    }
}

/// A builder pattern implementation for constructing `AiAgent` objects.
///
/// `AiAgentBuilder` allows for optional configuration of `AiAgent` fields
/// before building the final object.
pub struct AiAgentBuilder {
    agent: AiAgent,
}

impl AiAgentBuilder {
    /// Sets the spline point the agent starts on.
    ///
    /// # Arguments
    /// * `point_id` - The point's identifier.
    ///
    /// # Returns
    /// An `AiAgentBuilder` instance for further method chaining.
    ///
    /// # Example
    /// ```rust
    /// use traffic_ai_core::agents::AiAgent;
    /// let agent = AiAgent::new(1)
    ///     .with_point(10)
    ///     .build();
    /// println!("Agent: {:?}", agent);
    /// ```
    pub fn with_point(mut self, point_id: PointId) -> Self {
        self.agent.current_point = point_id;
        self
    }

    /// Sets the current longitudinal speed (m/s).
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.agent.current_speed = speed;
        self
    }

    /// Sets the cruise speed the agent aims for (m/s).
    pub fn with_target_speed(mut self, speed: f32) -> Self {
        self.agent.target_speed = speed;
        self
    }

    /// Sets the hard speed ceiling (m/s).
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.agent.max_speed = speed;
        self
    }

    /// Sets the driver personality.
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.agent.personality = personality;
        self
    }

    /// Sets the vehicle body class.
    pub fn with_kind(mut self, kind: AgentKind) -> Self {
        self.agent.kind = kind;
        self
    }

    /// Sets the segment progress and arc length.
    ///
    /// # Arguments
    /// * `progress` - Progress along the current segment, meters.
    /// * `length` - Arc length of the current segment, meters.
    pub fn with_progress(mut self, progress: f32, length: f32) -> Self {
        self.agent.vec_progress = progress;
        self.agent.vec_length = length;
        self
    }

    /// Sets the world position snapshot.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.agent.position = position;
        self
    }

    /// Marks the agent as placed on the graph.
    pub fn initialized(mut self) -> Self {
        self.agent.initialized = true;
        self
    }

    /// Builds the final `AiAgent` object with the configured properties.
    ///
    /// # Returns
    /// The fully constructed `AiAgent` object.
    pub fn build(self) -> AiAgent {
        self.agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_builder_defaults() {
        let agent = AiAgent::new(9).build();
        assert_eq!(agent.id, 9);
        assert!(!agent.initialized);
        assert_eq!(agent.kind, AgentKind::Car);
        assert_eq!(agent.acceleration, 0.0);
    }
    #[test]
    fn test_builder_chaining() {
        let agent = AiAgent::new(1)
            .with_point(4)
            .with_speed(18.0)
            .with_target_speed(25.0)
            .with_kind(AgentKind::Truck)
            .with_progress(2.5, 10.0)
            .initialized()
            .build();
        assert_eq!(agent.current_point, 4);
        assert_eq!(agent.current_speed, 18.0);
        assert_eq!(agent.target_speed, 25.0);
        assert_eq!(agent.kind, AgentKind::Truck);
        assert_eq!(agent.vec_progress, 2.5);
        assert_eq!(agent.vec_length, 10.0);
        assert!(agent.initialized);
    }
    #[test]
    fn test_kind_display() {
        assert_eq!(format!("{}", AgentKind::Car), "car");
        assert_eq!(format!("{}", AgentKind::Truck), "truck");
    }
}
