use crate::agents::{AgentId, AgentsRegistry};
use crate::geom::{right_vector_from_velocity, right_vector_from_yaw};
use crate::log_additional;
use crate::mobil::LaneSide;
use crate::neighbors::NeighborIndex;
use crate::spline::graph::SplineGraph;
use crate::spline::point::PointId;
use crate::verbose::{EVENT_LANE_CHANGE_ABORT, EVENT_LANE_CHANGE_FINALIZE, EVENT_LANE_CHANGE_START};
use std::collections::HashMap;

/// Reference speed (m/s) at which the base duration applies: 100 km/h.
pub const DURATION_REFERENCE_SPEED: f32 = 27.78;

/// One in-flight lane-change maneuver.
#[derive(Debug, Clone)]
pub struct ActiveLaneChange {
    /// The animating agent.
    pub agent_id: AgentId,
    /// Point the agent occupied when the maneuver started.
    pub source_point: PointId,
    /// Adjacent point the agent will occupy after finalization.
    pub target_point: PointId,
    /// Server time (ms) the maneuver started at.
    pub start_time_ms: i64,
    /// Total trajectory duration (seconds).
    pub duration_s: f32,
    /// Lateral distance between the two lanes (meters).
    pub lane_width: f32,
    /// Whether the maneuver moves toward the left lane.
    pub is_left: bool,
    /// Lateral offset applied in the most recent tick (meters).
    pub lateral_offset: f32,
}

/// Animator parameters derived from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct AnimatorParameters {
    /// Trajectory duration at the reference speed (seconds).
    pub base_duration_s: f32,
    /// Duration floor (seconds).
    pub min_duration_s: f32,
    /// Duration cap (seconds).
    pub max_duration_s: f32,
    /// Lateral lane distance (meters).
    pub lane_width_m: f32,
    /// Emit lane-change events at the main log level.
    pub log_lane_changes: bool,
}

/// Quintic S-curve lateral offset.
///
/// `y(τ) = w · (10τ³ − 15τ⁴ + 6τ⁵)` has zero position, velocity and
/// acceleration at both endpoints, so the overlay blends in and out without
/// a visible jerk.
pub fn quintic_offset(lane_width: f32, tau: f32) -> f32 {
    let t = tau.clamp(0.0, 1.0);
    lane_width * (10.0 * t.powi(3) - 15.0 * t.powi(4) + 6.0 * t.powi(5))
}

/// Scales the base duration by speed: faster vehicles take longer to settle
/// into the adjacent lane. Clamped to `[min, max]`.
pub fn duration_for_speed(params: &AnimatorParameters, speed: f32) -> f32 {
    (params.base_duration_s * speed / DURATION_REFERENCE_SPEED)
        .clamp(params.min_duration_s, params.max_duration_s)
}

/// The table of in-flight lane changes and their per-tick update.
///
/// Uniqueness invariant: at most one `ActiveLaneChange` per agent; `begin`
/// on an already-animating agent is a no-op.
#[derive(Debug)]
pub struct LaneChangeAnimator {
    active: HashMap<AgentId, ActiveLaneChange>,
    params: AnimatorParameters,
}

impl LaneChangeAnimator {
    /// Creates an empty animator with the given parameters.
    pub fn new(params: AnimatorParameters) -> Self {
        Self {
            active: HashMap::new(),
            params,
        }
    }

    /// Whether the agent currently animates a lane change.
    pub fn is_animating(&self, agent_id: AgentId) -> bool {
        self.active.contains_key(&agent_id)
    }

    /// Returns the in-flight maneuver of an agent, if any.
    pub fn get(&self, agent_id: AgentId) -> Option<&ActiveLaneChange> {
        self.active.get(&agent_id)
    }

    /// Number of in-flight maneuvers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no maneuver is in flight.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Starts animating a lane change for an agent.
    ///
    /// # Arguments
    /// * `source_point` - The agent's current point.
    /// * `target_point` - The accepted adjacent point.
    /// * `side` - Which side the maneuver moves toward.
    /// * `speed` - The agent's current speed, used to scale the duration.
    /// * `now_ms` - Current server time.
    ///
    /// # Returns
    /// The chosen duration in seconds, or `None` when the agent is already
    /// animating.
    pub fn begin(
        &mut self,
        agent_id: AgentId,
        source_point: PointId,
        target_point: PointId,
        side: LaneSide,
        speed: f32,
        now_ms: i64,
    ) -> Option<f32> {
        if self.active.contains_key(&agent_id) {
            return None;
        }
        let duration_s = duration_for_speed(&self.params, speed);
        self.active.insert(
            agent_id,
            ActiveLaneChange {
                agent_id,
                source_point,
                target_point,
                start_time_ms: now_ms,
                duration_s,
                lane_width: self.params.lane_width_m,
                is_left: side == LaneSide::Left,
                lateral_offset: 0.0,
            },
        );
        if self.params.log_lane_changes {
            crate::log_main!(
                EVENT_LANE_CHANGE_START,
                "Lane change started",
                agent_id = agent_id,
                source = source_point,
                target = target_point,
                duration_s = duration_s as f64
            );
        } else {
            log_additional!(
                EVENT_LANE_CHANGE_START,
                "Lane change started",
                agent_id = agent_id,
                source = source_point,
                target = target_point
            );
        }
        Some(duration_s)
    }

    /// Cancels an in-flight maneuver, if any. Used at despawn and shutdown.
    pub fn cancel(&mut self, agent_id: AgentId) -> Option<ActiveLaneChange> {
        self.active.remove(&agent_id)
    }

    /// Drops every in-flight maneuver. The neighbor index is untouched, so
    /// agents simply remain indexed under their source points.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Advances all in-flight maneuvers to `now_ms`.
    ///
    /// Applies the lateral overlay to each agent's position and finalizes
    /// maneuvers whose trajectory completed: atomically leave the source
    /// point, enter the target point, move `current_point`, and reset the
    /// segment progress to the target's arc length. A target point without a
    /// `next` link aborts the finalization (warning logged, entry kept) so
    /// the next tick can retry.
    ///
    /// Entries whose agent is gone or no longer initialized are dropped.
    ///
    /// # Returns
    /// The ids of agents whose maneuver finalized this tick.
    pub fn update(
        &mut self,
        graph: &SplineGraph,
        agents: &mut AgentsRegistry,
        index: &mut NeighborIndex,
        now_ms: i64,
    ) -> Vec<AgentId> {
        // Cleanup before animating: despawned or reset agents lose their entry.
        self.active.retain(|agent_id, _| {
            agents
                .get(agent_id)
                .map(|agent| agent.initialized)
                .unwrap_or(false)
        });

        // Deterministic processing order regardless of map internals.
        let mut ids: Vec<AgentId> = self.active.keys().copied().collect();
        ids.sort_unstable();

        let mut finalized = Vec::new();
        for agent_id in ids {
            let Some(change) = self.active.get_mut(&agent_id) else {
                continue;
            };
            let Some(agent) = agents.get_mut(&agent_id) else {
                continue;
            };
            let elapsed_s = (now_ms - change.start_time_ms) as f32 / 1000.0;
            let tau = (elapsed_s / change.duration_s).clamp(0.0, 1.0);
            let offset = quintic_offset(change.lane_width, tau);

            let right = right_vector_from_velocity(agent.velocity)
                .unwrap_or_else(|| right_vector_from_yaw(agent.heading_yaw));
            let direction = if change.is_left { -1.0 } else { 1.0 };
            // Overlay on top of the host's longitudinal integration: apply
            // only the delta since the previous tick.
            agent.position += right * (direction * (offset - change.lateral_offset));
            change.lateral_offset = offset;

            if tau >= 1.0 {
                let Some(target) = graph
                    .get_point(change.target_point)
                    .filter(|point| point.next_id.is_some())
                else {
                    // Entry stays for a retry next tick.
                    tracing::warn!(
                        event = EVENT_LANE_CHANGE_ABORT,
                        agent_id = agent_id,
                        target = change.target_point,
                        "Lane change finalization aborted: target point unusable"
                    );
                    continue;
                };
                // The agent kept moving forward in its source lane during the
                // animation, so its index entry may sit ahead of the stored
                // source point; purge covers both.
                index.purge_agent(agent_id);
                index.enter(change.target_point, agent_id, agent.current_speed);
                agent.current_point = change.target_point;
                agent.vec_progress = 0.0;
                agent.vec_length = target.length;
                finalized.push(agent_id);
                log_additional!(
                    EVENT_LANE_CHANGE_FINALIZE,
                    "Lane change finalized",
                    agent_id = agent_id,
                    target = change.target_point
                );
            }
        }
        for agent_id in &finalized {
            self.active.remove(agent_id);
        }
        finalized
    }
}
