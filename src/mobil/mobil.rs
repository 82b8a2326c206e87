use crate::agents::{AgentsRegistry, AiAgent};
use crate::idm::{idm_acceleration, IdmParameters, Leader};
use crate::neighbors::{
    find_follower_from, find_leader_from, NeighborIndex, FOLLOWER_SEARCH_DISTANCE,
    LEADER_SEARCH_DISTANCE,
};
use crate::personality::DriverParameters;
use crate::spline::graph::SplineGraph;
use crate::spline::point::PointId;
use std::fmt;

/// Speed fraction of the target speed below which an agent counts as blocked.
pub const BLOCKED_SPEED_FRACTION: f32 = 0.85;
/// Minimum speed (m/s) for lane-change consideration.
pub const BLOCKED_MIN_SPEED: f32 = 5.0;
/// A blocking leader must be within this distance (meters).
pub const BLOCKED_LEADER_DISTANCE: f32 = 100.0;

/// Side of a lane change relative to the driving direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneSide {
    Left,
    Right,
}

impl fmt::Display for LaneSide {
    /// Formats the lane side for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use traffic_ai_core::mobil::LaneSide;
    ///
    /// assert_eq!(format!("{}", LaneSide::Left), "left");
    /// assert_eq!(format!("{}", LaneSide::Right), "right");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            LaneSide::Left => "left",
            LaneSide::Right => "right",
        };
        write!(f, "{}", as_str)
    }
}

/// An accepted lane-change maneuver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneChangeDecision {
    /// Which side the agent moves to.
    pub side: LaneSide,
    /// The adjacent point the agent will occupy after finalization.
    pub target_point: PointId,
    /// The incentive value that cleared the threshold; useful for logging.
    pub incentive: f32,
}

/// Parameters of the MOBIL lane-change model.
#[derive(Debug, Clone, Copy)]
pub struct MobilParameters {
    /// Weight of the disadvantage inflicted on the new follower.
    /// 0 is selfish, 0.5 is highly cooperative.
    pub politeness: f32,
    /// Minimum net advantage (m/s²) required to accept a change.
    pub threshold: f32,
    /// Additive penalty favoring the slow side after passing. The sign flips
    /// per side: changing left subtracts it, changing right adds it, which
    /// encodes a left-hand-traffic keep-slow-lane preference.
    pub keep_slow_lane_bias: f32,
}

impl MobilParameters {
    /// Constructs parameters from raw values.
    pub fn new(politeness: f32, threshold: f32, keep_slow_lane_bias: f32) -> Self {
        Self {
            politeness,
            threshold,
            keep_slow_lane_bias,
        }
    }

    fn bias(&self, side: LaneSide) -> f32 {
        match side {
            LaneSide::Left => -self.keep_slow_lane_bias,
            LaneSide::Right => self.keep_slow_lane_bias,
        }
    }
}

/// Checks whether an agent is blocked enough to consider a lane change:
/// noticeably below its target speed, actually moving, and held up by a
/// leader within [`BLOCKED_LEADER_DISTANCE`].
pub fn is_blocked(agent: &AiAgent, current_leader: Option<&Leader>) -> bool {
    if agent.current_speed > BLOCKED_SPEED_FRACTION * agent.target_speed {
        return false;
    }
    if agent.current_speed <= BLOCKED_MIN_SPEED {
        return false;
    }
    matches!(current_leader, Some(leader) if leader.gap <= BLOCKED_LEADER_DISTANCE)
}

/// Evaluates a lane change for a blocked agent.
///
/// For each present side link the candidate leader (ahead along the adjacent
/// lane, capped at [`LEADER_SEARCH_DISTANCE`]) and candidate follower (behind,
/// capped at [`FOLLOWER_SEARCH_DISTANCE`]) are located. A side is rejected
/// when its direction tag differs from the current lane, when the follower
/// would have to brake beyond the safe deceleration, or when the
/// politeness-weighted incentive does not clear the threshold:
///
/// ```text
/// incentive = (a_new − a_cur) − politeness · Δfollower − bias(side)
/// ```
///
/// When both sides qualify, left wins; the tie-break is consistent with the
/// keep-left convention encoded in the bias sign.
///
/// # Arguments
/// * `current_leader` - The agent's leader in its own lane, if any.
///
/// # Returns
/// The accepted maneuver, or `None` when the agent stays in its lane.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_lane_change(
    graph: &SplineGraph,
    index: &NeighborIndex,
    agents: &AgentsRegistry,
    agent: &AiAgent,
    idm: &IdmParameters,
    mobil: &MobilParameters,
    current_leader: Option<Leader>,
) -> Option<LaneChangeDecision> {
    let point = graph.get_point(agent.current_point)?;
    let driver = DriverParameters::from_personality(agent.personality);
    let own_idm = idm.for_personality(&driver);
    let politeness = mobil.politeness * driver.politeness_factor();

    let a_cur = idm_acceleration(&own_idm, agent.current_speed, agent.target_speed, current_leader);

    for (side, link) in [(LaneSide::Left, point.left_id), (LaneSide::Right, point.right_id)] {
        let Some(target_point) = link else { continue };
        if !graph.is_same_direction(agent.current_point, target_point) {
            continue;
        }

        let new_leader = find_leader_from(
            graph,
            index,
            agents,
            target_point,
            agent.id,
            LEADER_SEARCH_DISTANCE,
        );
        let new_follower = find_follower_from(
            graph,
            index,
            agents,
            target_point,
            agent.id,
            FOLLOWER_SEARCH_DISTANCE,
        );

        // Disadvantage inflicted on the new follower, and the safety veto.
        let mut follower_disadvantage = 0.0f32;
        if let Some(follower) = new_follower {
            let Some(follower_agent) = agents.get(&follower.agent_id) else {
                continue;
            };
            let follower_idm = idm.for_personality(&DriverParameters::from_personality(
                follower_agent.personality,
            ));
            let before = idm_acceleration(
                &follower_idm,
                follower.speed,
                follower_agent.target_speed,
                new_leader.map(|leader| Leader {
                    gap: follower.distance + leader.distance,
                    speed: leader.speed,
                }),
            );
            let after = idm_acceleration(
                &follower_idm,
                follower.speed,
                follower_agent.target_speed,
                Some(Leader {
                    gap: follower.distance,
                    speed: agent.current_speed,
                }),
            );
            if after < -idm.safe_decel {
                continue;
            }
            follower_disadvantage = before - after;
        }

        let a_new = idm_acceleration(
            &own_idm,
            agent.current_speed,
            agent.target_speed,
            new_leader.map(|leader| Leader {
                gap: leader.distance,
                speed: leader.speed,
            }),
        );

        let incentive = (a_new - a_cur) - politeness * follower_disadvantage - mobil.bias(side);
        if incentive > mobil.threshold {
            return Some(LaneChangeDecision {
                side,
                target_point,
                incentive,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AiAgent;
    use crate::utils::test_graphs::two_lane_road;

    fn idm_params() -> IdmParameters {
        IdmParameters::new(4.0, 2.0, 1.2)
    }

    fn mobil_params() -> MobilParameters {
        MobilParameters::new(0.3, 0.15, 0.2)
    }

    /// Blocked agent on the slow lane with a crawling leader 30 m ahead and
    /// an empty fast lane on the left.
    fn blocked_setup() -> (SplineGraph, AgentsRegistry, NeighborIndex, AiAgent) {
        let graph = two_lane_road(60, 10.0);
        let mut agents = AgentsRegistry::new();
        let agent = AiAgent::new(1)
            .with_point(5)
            .with_speed(12.0)
            .with_target_speed(25.0)
            .initialized()
            .build();
        let leader = AiAgent::new(2)
            .with_point(8)
            .with_speed(10.0)
            .with_target_speed(10.0)
            .initialized()
            .build();
        let mut index = NeighborIndex::new();
        index.enter(5, 1, 12.0);
        index.enter(8, 2, 10.0);
        agents.insert_agent(agent.clone());
        agents.insert_agent(leader);
        (graph, agents, index, agent)
    }

    #[test]
    fn test_blocked_gating() {
        let fast = AiAgent::new(1)
            .with_speed(24.0)
            .with_target_speed(25.0)
            .build();
        let near_leader = Leader {
            gap: 30.0,
            speed: 10.0,
        };
        assert!(!is_blocked(&fast, Some(&near_leader)), "Near target speed is not blocked");

        let crawling = AiAgent::new(2)
            .with_speed(4.0)
            .with_target_speed(25.0)
            .build();
        assert!(!is_blocked(&crawling, Some(&near_leader)), "Too slow to bother");

        let blocked = AiAgent::new(3)
            .with_speed(12.0)
            .with_target_speed(25.0)
            .build();
        assert!(is_blocked(&blocked, Some(&near_leader)));
        assert!(!is_blocked(&blocked, None), "No leader, not blocked");
        let far_leader = Leader {
            gap: 150.0,
            speed: 10.0,
        };
        assert!(!is_blocked(&blocked, Some(&far_leader)));
    }

    #[test]
    fn test_accepts_empty_left_lane() {
        let (graph, agents, index, agent) = blocked_setup();
        let current_leader = Some(Leader {
            gap: 30.0,
            speed: 10.0,
        });
        let decision = evaluate_lane_change(
            &graph,
            &index,
            &agents,
            &agent,
            &idm_params(),
            &mobil_params(),
            current_leader,
        )
        .expect("Empty fast lane must be accepted");
        assert_eq!(decision.side, LaneSide::Left);
        assert_eq!(
            decision.target_point,
            graph.get_point(5).unwrap().left_id.unwrap()
        );
    }

    #[test]
    fn test_safety_rejects_close_follower() {
        let (graph, mut agents, mut index, agent) = blocked_setup();
        // Fast follower 10 m behind the adjacent point.
        let left = graph.get_point(5).unwrap().left_id.unwrap();
        let follower_point = graph.point_behind(left, 10.0).unwrap();
        agents.insert_agent(
            AiAgent::new(3)
                .with_point(follower_point)
                .with_speed(25.0)
                .with_target_speed(25.0)
                .initialized()
                .build(),
        );
        index.enter(follower_point, 3, 25.0);

        let decision = evaluate_lane_change(
            &graph,
            &index,
            &agents,
            &agent,
            &idm_params(),
            &mobil_params(),
            Some(Leader {
                gap: 30.0,
                speed: 10.0,
            }),
        );
        assert!(decision.is_none(), "Follower would brake beyond safe decel");
    }

    #[test]
    fn test_direction_mismatch_rejected() {
        let (mut graph_points, agents, index, agent) = {
            let (graph, agents, index, agent) = blocked_setup();
            (graph.points().to_vec(), agents, index, agent)
        };
        // Flip the direction tag of the whole left lane.
        for point in graph_points.iter_mut() {
            if point.id >= 60 {
                point.direction = 1;
            }
        }
        let graph = SplineGraph::from_points(graph_points).unwrap();
        let decision = evaluate_lane_change(
            &graph,
            &index,
            &agents,
            &agent,
            &idm_params(),
            &mobil_params(),
            Some(Leader {
                gap: 30.0,
                speed: 10.0,
            }),
        );
        assert!(decision.is_none(), "Opposing lane must be rejected unconditionally");
    }

    #[test]
    fn test_no_advantage_stays_in_lane() {
        // Same crawling leader in the target lane: no incentive to move.
        let (graph, mut agents, mut index, agent) = blocked_setup();
        let left = graph.get_point(5).unwrap().left_id.unwrap();
        let left_leader_point = graph.point_ahead(left, 30.0).unwrap();
        agents.insert_agent(
            AiAgent::new(4)
                .with_point(left_leader_point)
                .with_speed(10.0)
                .with_target_speed(10.0)
                .initialized()
                .build(),
        );
        index.enter(left_leader_point, 4, 10.0);

        let decision = evaluate_lane_change(
            &graph,
            &index,
            &agents,
            &agent,
            &idm_params(),
            &mobil_params(),
            Some(Leader {
                gap: 30.0,
                speed: 10.0,
            }),
        );
        assert!(decision.is_none());
    }
}
