use crate::agents::{AgentId, AgentsRegistry};
use crate::geom::Vec3;
use crate::log_detailed;
use crate::neighbors::NeighborIndex;
use crate::spline::graph::SplineGraph;
use crate::spline::point::PointId;
use crate::verbose::EVENT_MOVEMENT_DEAD_END;
use std::fmt;

#[derive(Debug, Clone)]
pub enum MovementError {
    PointNotFound { point_id: PointId, agent_id: AgentId },
}

impl fmt::Display for MovementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementError::PointNotFound { point_id, agent_id } => {
                write!(
                    f,
                    "movement(): Can't find point {} in the graph for agent with ID {}",
                    point_id, agent_id
                )
            }
        }
    }
}

impl std::error::Error for MovementError {}

/// Integrates all agents forward by `dt` seconds.
///
/// For each initialized agent: speed follows the controller acceleration
/// (clamped to `[0, max_speed]`), segment progress follows speed, and every
/// saturated segment moves the agent to its `next` point with matching
/// neighbor-index updates. The base world position, velocity and heading are
/// recomputed from the graph; the lane-change animator overlays its lateral
/// offset on top of this base.
///
/// # Returns
/// The ids of agents that ran off a dead end and must be despawned, or a
/// `MovementError` when an agent references a point outside the graph.
pub fn movement(
    graph: &SplineGraph,
    agents: &mut AgentsRegistry,
    index: &mut NeighborIndex,
    dt: f32,
) -> Result<Vec<AgentId>, MovementError> {
    let mut dead_ends = Vec::new();

    for (agent_id, agent) in agents.iter_mut() {
        if !agent.initialized {
            continue;
        }

        agent.current_speed =
            (agent.current_speed + agent.acceleration * dt).clamp(0.0, agent.max_speed);
        agent.vec_progress += agent.current_speed * dt;

        // Saturated segments advance the agent point by point.
        let mut reached_dead_end = false;
        while agent.vec_progress >= agent.vec_length && agent.vec_length > 0.0 {
            let point = graph
                .get_point(agent.current_point)
                .ok_or(MovementError::PointNotFound {
                    point_id: agent.current_point,
                    agent_id: *agent_id,
                })?;
            let Some(next_id) = point.next_id else {
                reached_dead_end = true;
                break;
            };
            let next = graph.get_point(next_id).ok_or(MovementError::PointNotFound {
                point_id: next_id,
                agent_id: *agent_id,
            })?;
            agent.vec_progress -= agent.vec_length;
            index.leave(agent.current_point, *agent_id);
            agent.current_point = next_id;
            agent.vec_length = next.length;
            index.enter(next_id, *agent_id, agent.current_speed);
            if next.length <= 0.0 {
                // Terminal point of a lane; no segment left to travel.
                if next.next_id.is_none() {
                    reached_dead_end = true;
                }
                break;
            }
        }
        if reached_dead_end {
            log_detailed!(
                EVENT_MOVEMENT_DEAD_END,
                "Agent ran off a dead end",
                agent_id = *agent_id,
                point = agent.current_point
            );
            dead_ends.push(*agent_id);
            continue;
        }

        // Recompute the base pose from the graph.
        let point = graph
            .get_point(agent.current_point)
            .ok_or(MovementError::PointNotFound {
                point_id: agent.current_point,
                agent_id: *agent_id,
            })?;
        match point.next_id.and_then(|next_id| graph.get_point(next_id)) {
            Some(next) => {
                let segment = next.position - point.position;
                let fraction = if agent.vec_length > 0.0 {
                    (agent.vec_progress / agent.vec_length).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                agent.position = point.position + segment * fraction;
                if let Some(direction) = segment.normalized_xz() {
                    agent.velocity = direction * agent.current_speed;
                    agent.heading_yaw = direction.x.atan2(direction.z);
                } else {
                    agent.velocity = Vec3::zero();
                }
            }
            None => {
                agent.position = point.position;
                agent.velocity = Vec3::zero();
            }
        }
    }

    Ok(dead_ends)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AiAgent;
    use crate::utils::test_graphs::straight_road;

    fn spawn(agents: &mut AgentsRegistry, index: &mut NeighborIndex, id: AgentId, speed: f32) {
        let agent = AiAgent::new(id)
            .with_point(0)
            .with_speed(speed)
            .with_target_speed(30.0)
            .with_progress(0.0, 10.0)
            .initialized()
            .build();
        index.enter(0, id, speed);
        agents.insert_agent(agent);
    }

    #[test]
    fn test_integration_advances_speed_and_progress() {
        let graph = straight_road(10, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        spawn(&mut agents, &mut index, 1, 10.0);
        agents.get_mut(&1).unwrap().acceleration = 2.0;

        movement(&graph, &mut agents, &mut index, 0.5).unwrap();
        let agent = agents.get(&1).unwrap();
        assert!((agent.current_speed - 11.0).abs() < 1e-5);
        assert!((agent.vec_progress - 5.5).abs() < 1e-5);
        assert_eq!(agent.current_point, 0);
    }

    #[test]
    fn test_point_transition_updates_index() {
        let graph = straight_road(10, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        spawn(&mut agents, &mut index, 1, 20.0);

        // 20 m in one second crosses two 10 m segments.
        movement(&graph, &mut agents, &mut index, 1.0).unwrap();
        let agent = agents.get(&1).unwrap();
        assert_eq!(agent.current_point, 2);
        assert_eq!(index.point_of(1), Some(2));
        assert!(agent.vec_progress < 10.0);
    }

    #[test]
    fn test_speed_never_negative() {
        let graph = straight_road(10, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        spawn(&mut agents, &mut index, 1, 1.0);
        agents.get_mut(&1).unwrap().acceleration = -6.0;

        movement(&graph, &mut agents, &mut index, 1.0).unwrap();
        assert_eq!(agents.get(&1).unwrap().current_speed, 0.0);
    }

    #[test]
    fn test_dead_end_reported() {
        let graph = straight_road(3, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        spawn(&mut agents, &mut index, 1, 25.0);

        // 50 m of travel on a 20 m road.
        let removed = movement(&graph, &mut agents, &mut index, 2.0).unwrap();
        assert_eq!(removed, vec![1]);
    }

    #[test]
    fn test_base_pose_follows_segment() {
        let graph = straight_road(10, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        spawn(&mut agents, &mut index, 1, 10.0);

        movement(&graph, &mut agents, &mut index, 0.5).unwrap();
        let agent = agents.get(&1).unwrap();
        // Road runs along +Z; 5 m progress puts the agent at z = 5.
        assert!((agent.position.z - 5.0).abs() < 1e-4);
        assert!((agent.velocity.z - agent.current_speed).abs() < 1e-4);
        assert!(agent.heading_yaw.abs() < 1e-4);
    }

    #[test]
    fn test_uninitialized_agents_are_skipped() {
        let graph = straight_road(10, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        agents.insert_agent(AiAgent::new(1).with_point(0).with_speed(10.0).build());

        movement(&graph, &mut agents, &mut index, 1.0).unwrap();
        assert_eq!(agents.get(&1).unwrap().vec_progress, 0.0);
    }
}
