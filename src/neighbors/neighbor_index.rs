use crate::agents::{AgentId, AgentsRegistry};
use crate::spline::graph::SplineGraph;
use crate::spline::point::PointId;
use std::collections::HashMap;

/// Arc-length cap (meters) for leader searches along `next` links.
pub const LEADER_SEARCH_DISTANCE: f32 = 200.0;
/// Arc-length cap (meters) for follower searches along `prev` links.
pub const FOLLOWER_SEARCH_DISTANCE: f32 = 50.0;

/// Occupancy record for one spline point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowestEntry {
    /// The occupying agent.
    pub agent_id: AgentId,
    /// The occupant's speed at the time it entered or last re-entered.
    pub speed: f32,
}

/// Mapping from spline point to the slowest AI currently located there.
///
/// The index is the lookup structure behind leader and follower searches:
/// instead of scanning all agents, a walk along `next`/`prev` links only has
/// to probe one map entry per point. It is updated as a side effect of every
/// graph transition: spawn, forward movement, lane-change finalization and
/// despawn.
#[derive(Debug, Default)]
pub struct NeighborIndex {
    occupants: HashMap<PointId, SlowestEntry>,
}

impl NeighborIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            occupants: HashMap::new(),
        }
    }

    /// Returns the slowest occupant of the given point, if any.
    pub fn slowest_at(&self, point_id: PointId) -> Option<&SlowestEntry> {
        self.occupants.get(&point_id)
    }

    /// Records an agent entering a point.
    ///
    /// The entry is replaced when the point is empty, when the same agent
    /// re-enters (speed refresh), or when the entering agent is slower than
    /// the current occupant. A faster agent entering an occupied point is
    /// not recorded; the slower occupant stays authoritative for braking.
    pub fn enter(&mut self, point_id: PointId, agent_id: AgentId, speed: f32) {
        match self.occupants.get(&point_id) {
            Some(entry) if entry.agent_id != agent_id && entry.speed <= speed => {}
            _ => {
                self.occupants.insert(point_id, SlowestEntry { agent_id, speed });
            }
        }
    }

    /// Records an agent leaving a point.
    ///
    /// Only removes the entry when it belongs to the leaving agent; a faster
    /// agent that was never recorded leaves silently.
    ///
    /// # Returns
    /// `true` when an entry was removed.
    pub fn leave(&mut self, point_id: PointId, agent_id: AgentId) -> bool {
        match self.occupants.get(&point_id) {
            Some(entry) if entry.agent_id == agent_id => {
                self.occupants.remove(&point_id);
                true
            }
            _ => false,
        }
    }

    /// Removes every entry belonging to the given agent.
    ///
    /// Used at despawn, where the agent must vanish from the index no matter
    /// which point it was recorded under.
    pub fn purge_agent(&mut self, agent_id: AgentId) {
        self.occupants.retain(|_, entry| entry.agent_id != agent_id);
    }

    /// Number of occupied points.
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// Whether no point is occupied.
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Iterates over `(point_id, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&PointId, &SlowestEntry)> {
        self.occupants.iter()
    }

    /// The point an agent is recorded under, if any.
    pub fn point_of(&self, agent_id: AgentId) -> Option<PointId> {
        self.occupants
            .iter()
            .find(|(_, entry)| entry.agent_id == agent_id)
            .map(|(point_id, _)| *point_id)
    }
}

/// An occupant found by a leader or follower walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborHit {
    /// The occupying agent.
    pub agent_id: AgentId,
    /// Accumulated arc length from the walk start to the occupant's point.
    pub distance: f32,
    /// The occupant's current speed from the registry.
    pub speed: f32,
}

/// Walks `next` links from `start` accumulating arc length until a point
/// holds an initialized agent other than `exclude`, the accumulated distance
/// exceeds `max_distance`, or the lane dead-ends.
///
/// The start point itself is probed at distance zero, so an occupant sitting
/// exactly on `start` (e.g. in the adjacent lane during a MOBIL trial) is
/// found immediately.
pub fn find_leader_from(
    graph: &SplineGraph,
    index: &NeighborIndex,
    agents: &AgentsRegistry,
    start: PointId,
    exclude: AgentId,
    max_distance: f32,
) -> Option<NeighborHit> {
    let mut current = start;
    let mut distance = 0.0f32;
    loop {
        if let Some(hit) = probe(index, agents, current, exclude, distance) {
            return Some(hit);
        }
        let point = graph.get_point(current)?;
        distance += point.length;
        if distance > max_distance {
            return None;
        }
        current = point.next_id?;
    }
}

/// Walks `prev` links from `start` accumulating arc length until a point
/// holds an initialized agent other than `exclude`, the accumulated distance
/// exceeds `max_distance`, or the lane start is reached.
pub fn find_follower_from(
    graph: &SplineGraph,
    index: &NeighborIndex,
    agents: &AgentsRegistry,
    start: PointId,
    exclude: AgentId,
    max_distance: f32,
) -> Option<NeighborHit> {
    let mut current = start;
    let mut distance = 0.0f32;
    loop {
        if let Some(hit) = probe(index, agents, current, exclude, distance) {
            return Some(hit);
        }
        let point = graph.get_point(current)?;
        let prev_id = point.prev_id?;
        let prev = graph.get_point(prev_id)?;
        distance += prev.length;
        if distance > max_distance {
            return None;
        }
        current = prev_id;
    }
}

fn probe(
    index: &NeighborIndex,
    agents: &AgentsRegistry,
    point_id: PointId,
    exclude: AgentId,
    distance: f32,
) -> Option<NeighborHit> {
    let entry = index.slowest_at(point_id)?;
    if entry.agent_id == exclude {
        return None;
    }
    let agent = agents.get(&entry.agent_id)?;
    if !agent.initialized {
        return None;
    }
    Some(NeighborHit {
        agent_id: entry.agent_id,
        distance,
        speed: agent.current_speed,
    })
}
