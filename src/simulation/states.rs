use crate::agents::{AgentId, AgentKind};
use crate::spline::point::PointId;
use serde::Serialize;

/// Snapshot of all vehicle states at a specific timestamp.
///
/// Shaped for network transport: the host serializes it (e.g. with
/// `serde_json`) and fans it out to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficState {
    /// Server time of the snapshot (milliseconds).
    pub timestamp_ms: i64,
    /// Tick counter at the snapshot.
    pub tick: u64,
    /// One entry per initialized agent, in registry order.
    pub vehicles: Vec<VehicleState>,
}

/// State of a single vehicle at a specific timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleState {
    pub id: AgentId,
    pub point_id: PointId,
    /// Lateral offset of an in-flight lane change, zero otherwise (meters).
    pub lateral_offset: f32,
    /// Longitudinal speed (m/s).
    pub speed: f32,
    pub kind: AgentKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_to_json() {
        let state = TrafficState {
            timestamp_ms: 1000,
            tick: 50,
            vehicles: vec![VehicleState {
                id: 7,
                point_id: 12,
                lateral_offset: 1.5,
                speed: 27.8,
                kind: AgentKind::Truck,
            }],
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"kind\":\"truck\""));
        assert!(json.contains("\"point_id\":12"));
    }
}
