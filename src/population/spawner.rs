use crate::agents::{AgentId, AgentKind, AgentsRegistry, AiAgent};
use crate::config::TrafficConfig;
use crate::lane_change::LaneChangeAnimator;
use crate::neighbors::{find_follower_from, find_leader_from, NeighborIndex};
use crate::personality::DriverParameters;
use crate::players::{CooldownsStorage, PlayerPos};
use crate::spline::graph::SplineGraph;
use crate::spline::point::PointId;
use crate::zones::{time_of_day_multiplier, ZonesStorage};
use crate::{log_additional, log_detailed};
use crate::verbose::{EVENT_DESPAWN_VEHICLE, EVENT_SPAWN_VEHICLE};
use rand::Rng;
use rand::rngs::StdRng;

/// Sentinel agent id that never matches a real occupant; used to run
/// leader/follower probes without excluding anyone.
const NO_EXCLUDE: AgentId = AgentId::MAX;

/// Fraction of the spawn-ahead range that counts as "too visible"; spawn
/// candidates ahead of the player must lie beyond it.
const VISIBILITY_FRACTION: f32 = 0.6;

/// Placement attempts per requested spawn slot.
const PLACEMENT_ATTEMPTS: usize = 4;

/// Counts occupied points in the population region around a player point:
/// `spawn_behind` meters along `prev` plus `spawn_ahead` meters along `next`.
pub fn region_occupancy(
    graph: &SplineGraph,
    index: &NeighborIndex,
    player_point: PointId,
    behind_m: f32,
    ahead_m: f32,
) -> usize {
    let mut count = 0usize;
    if index.slowest_at(player_point).is_some() {
        count += 1;
    }
    // Forward walk.
    let mut current = player_point;
    let mut travelled = 0.0f32;
    while let Some(point) = graph.get_point(current) {
        travelled += point.length;
        let Some(next_id) = point.next_id else { break };
        if travelled > ahead_m {
            break;
        }
        if index.slowest_at(next_id).is_some() {
            count += 1;
        }
        current = next_id;
    }
    // Backward walk.
    let mut current = player_point;
    let mut travelled = 0.0f32;
    while let Some(point) = graph.get_point(current) {
        let Some(prev_id) = point.prev_id else { break };
        let Some(prev) = graph.get_point(prev_id) else { break };
        travelled += prev.length;
        if travelled > behind_m {
            break;
        }
        if index.slowest_at(prev_id).is_some() {
            count += 1;
        }
        current = prev_id;
    }
    count
}

/// Attempts up to `max_spawns_per_tick` spawns around every connected player.
///
/// Per player: resolve the governing zone (skip when absent or disabled),
/// compute the density target
/// `D = base_density_per_km · zone.density_multiplier · tod_multiplier`,
/// and spawn while the region occupancy is below `D · range_km`, bounded by
/// the per-player and total population ceilings.
///
/// Placement picks a candidate point outside the visibility proxy (behind
/// the player, or beyond [`VISIBILITY_FRACTION`] of the ahead range) and
/// rejects candidates with an existing vehicle within the minimum spawn gap.
///
/// # Returns
/// The ids of agents created this sweep.
#[allow(clippy::too_many_arguments)]
pub fn spawn_sweep(
    graph: &SplineGraph,
    zones: &ZonesStorage,
    config: &TrafficConfig,
    players: &[PlayerPos],
    agents: &mut AgentsRegistry,
    index: &mut NeighborIndex,
    rng: &mut StdRng,
    hour: u8,
    next_agent_id: &mut AgentId,
) -> Vec<AgentId> {
    let mut spawned = Vec::new();
    let range_km = ((config.spawn_ahead_m + config.spawn_behind_m) / 1000.0) as f64;

    for player in players {
        let Some(player_point) = player
            .current_point
            .or_else(|| graph.world_to_spline(player.world_pos).map(|(id, _)| id))
        else {
            continue;
        };
        let Some(zone) = zones.zone_at(player_point, &player.world_pos) else {
            continue;
        };
        if !zone.enabled {
            continue;
        }

        let tod = time_of_day_multiplier(hour, config.min_time_of_day_density);
        let density = config.base_density_per_km * zone.density_multiplier * tod;
        let target = (density * range_km).floor() as usize;
        let ceiling = target.min(config.per_player);

        let mut occupancy = region_occupancy(
            graph,
            index,
            player_point,
            config.spawn_behind_m,
            config.spawn_ahead_m,
        );

        for _ in 0..config.max_spawns_per_tick {
            if occupancy >= ceiling || agents.len() >= config.max_total {
                break;
            }
            let Some(candidate) =
                place_candidate(graph, index, agents, config, player_point, rng)
            else {
                continue;
            };
            let Some(point) = graph.get_point(candidate) else {
                continue;
            };

            let agent_id = *next_agent_id;
            *next_agent_id += 1;

            let personality = zone.profile.draw(rng);
            let kind = zone.draw_kind(rng);
            let driver = DriverParameters::from_personality(personality);
            let kind_speed = match kind {
                AgentKind::Car => config.desired_speed_mps(),
                AgentKind::Truck => config.truck_desired_speed_mps(),
            };
            let cruise_base = zone.speed_limit.min(kind_speed);
            let target_speed = cruise_base * driver.desired_speed_factor();
            let initial_speed = target_speed * rng.random_range(0.8..1.0);

            let agent = AiAgent::new(agent_id)
                .with_point(candidate)
                .with_speed(initial_speed)
                .with_target_speed(target_speed)
                .with_max_speed(target_speed * 1.3)
                .with_personality(personality)
                .with_kind(kind)
                .with_progress(0.0, point.length)
                .with_position(point.position)
                .initialized()
                .build();
            index.enter(candidate, agent_id, initial_speed);
            agents.insert_agent(agent);
            occupancy += 1;
            spawned.push(agent_id);

            log_additional!(
                EVENT_SPAWN_VEHICLE,
                "Spawned AI vehicle",
                agent_id = agent_id,
                point = candidate,
                zone = zone.id.as_str(),
                kind = kind.to_string().as_str()
            );
        }
    }
    spawned
}

/// Picks a spawn point outside the player's view with a clear minimum gap.
fn place_candidate(
    graph: &SplineGraph,
    index: &NeighborIndex,
    agents: &AgentsRegistry,
    config: &TrafficConfig,
    player_point: PointId,
    rng: &mut StdRng,
) -> Option<PointId> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let behind = rng.random::<f64>() < 0.25 && config.spawn_behind_m > config.min_spawn_gap_m;
        let candidate = if behind {
            let distance = rng.random_range(config.min_spawn_gap_m..config.spawn_behind_m);
            graph.point_behind(player_point, distance)
        } else if config.spawn_ahead_m > 0.0 {
            let lo = config.spawn_ahead_m * VISIBILITY_FRACTION;
            let distance = rng.random_range(lo..config.spawn_ahead_m);
            graph.point_ahead(player_point, distance)
        } else {
            None
        };
        let Some(candidate) = candidate else { continue };
        if index.slowest_at(candidate).is_some() {
            continue;
        }
        let leader_near = find_leader_from(
            graph,
            index,
            agents,
            candidate,
            NO_EXCLUDE,
            config.min_spawn_gap_m,
        )
        .is_some();
        let follower_near = find_follower_from(
            graph,
            index,
            agents,
            candidate,
            NO_EXCLUDE,
            config.min_spawn_gap_m,
        )
        .is_some();
        if leader_near || follower_near {
            continue;
        }
        return Some(candidate);
    }
    None
}

/// Removes every agent that is further than `despawn_m` from all players.
///
/// Removal is complete: the registry entry, any neighbor-index entries, the
/// in-flight lane change and the cooldown stamp all go together.
pub fn despawn_sweep(
    agents: &mut AgentsRegistry,
    index: &mut NeighborIndex,
    animator: &mut LaneChangeAnimator,
    cooldowns: &CooldownsStorage,
    players: &[PlayerPos],
    despawn_m: f32,
) -> Vec<AgentId> {
    let mut to_remove = Vec::new();
    for (agent_id, agent) in agents.iter() {
        let in_range = players
            .iter()
            .any(|player| agent.position.distance_to(&player.world_pos) <= despawn_m);
        if !in_range {
            to_remove.push(*agent_id);
        }
    }
    for agent_id in &to_remove {
        agents.remove_agent(*agent_id);
        index.purge_agent(*agent_id);
        animator.cancel(*agent_id);
        cooldowns.remove(*agent_id);
        log_detailed!(
            EVENT_DESPAWN_VEHICLE,
            "Despawned AI vehicle",
            agent_id = *agent_id
        );
    }
    to_remove
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec3;
    use crate::lane_change::AnimatorParameters;
    use crate::utils::test_graphs::straight_road;
    use crate::zones::Zone;
    use rand::SeedableRng;

    fn player_at(point: PointId, z: f32) -> PlayerPos {
        PlayerPos {
            session_id: 1,
            current_point: Some(point),
            world_pos: Vec3::new(0.0, 0.0, z),
        }
    }

    fn covered_zones() -> ZonesStorage {
        let mut zones = ZonesStorage::new();
        zones.add_zone(
            Zone::new("test")
                .with_predicate(crate::zones::ZonePredicate::WorldRect {
                    min_x: -1e6,
                    min_z: -1e6,
                    max_x: 1e6,
                    max_z: 1e6,
                })
                .with_speed_limit(27.8)
                .build(),
        );
        zones
    }

    #[test]
    fn test_spawn_without_zone_does_nothing() {
        let graph = straight_road(200, 10.0);
        let zones = ZonesStorage::new();
        let config = TrafficConfig::default();
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut next_id = 1;

        let spawned = spawn_sweep(
            &graph,
            &zones,
            &config,
            &[player_at(50, 500.0)],
            &mut agents,
            &mut index,
            &mut rng,
            12,
            &mut next_id,
        );
        assert!(spawned.is_empty());
        assert!(agents.is_empty());
    }

    #[test]
    fn test_spawn_respects_rate_and_bounds() {
        let graph = straight_road(300, 10.0);
        let zones = covered_zones();
        let config = TrafficConfig::default();
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut next_id = 1;

        let players = [player_at(40, 400.0)];
        let spawned = spawn_sweep(
            &graph, &zones, &config, &players, &mut agents, &mut index, &mut rng, 12, &mut next_id,
        );
        assert!(spawned.len() <= config.max_spawns_per_tick);
        assert!(!spawned.is_empty(), "Open road at midday must spawn");

        // Every spawned agent is initialized, indexed, and out of view.
        for agent_id in &spawned {
            let agent = agents.get(agent_id).unwrap();
            assert!(agent.initialized);
            assert_eq!(index.point_of(*agent_id), Some(agent.current_point));
            assert!(agent.target_speed > 0.0);
        }

        // Sweeping repeatedly never exceeds the density ceiling.
        for _ in 0..100 {
            spawn_sweep(
                &graph, &zones, &config, &players, &mut agents, &mut index, &mut rng, 12,
                &mut next_id,
            );
        }
        let range_km = ((config.spawn_ahead_m + config.spawn_behind_m) / 1000.0) as f64;
        let ceiling = (config.base_density_per_km * range_km).floor() as usize
            + config.max_spawns_per_tick;
        let occupancy =
            region_occupancy(&graph, &index, 40, config.spawn_behind_m, config.spawn_ahead_m);
        assert!(
            occupancy <= ceiling,
            "Occupancy {} exceeded ceiling {}",
            occupancy,
            ceiling
        );
        assert!(agents.len() <= config.max_total);
    }

    #[test]
    fn test_spawn_keeps_minimum_gap() {
        let graph = straight_road(300, 10.0);
        let zones = covered_zones();
        let config = TrafficConfig::default();
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut next_id = 1;

        let players = [player_at(40, 400.0)];
        for _ in 0..50 {
            spawn_sweep(
                &graph, &zones, &config, &players, &mut agents, &mut index, &mut rng, 12,
                &mut next_id,
            );
        }
        // No two agents closer than the configured gap along the graph.
        for (agent_id, agent) in agents.iter() {
            let leader = find_leader_from(
                &graph,
                &index,
                &agents,
                agent.current_point,
                *agent_id,
                config.min_spawn_gap_m - 10.0,
            );
            assert!(
                leader.is_none(),
                "Agent {} spawned within the minimum gap",
                agent_id
            );
        }
    }

    #[test]
    fn test_despawn_out_of_range() {
        let graph = straight_road(300, 10.0);
        let mut agents = AgentsRegistry::new();
        let mut index = NeighborIndex::new();
        let mut animator = LaneChangeAnimator::new(AnimatorParameters {
            base_duration_s: 3.5,
            min_duration_s: 2.5,
            max_duration_s: 7.0,
            lane_width_m: 3.0,
            log_lane_changes: false,
        });
        let cooldowns = CooldownsStorage::new();

        let mut far_agent = AiAgent::new(1)
            .with_point(0)
            .with_speed(20.0)
            .initialized()
            .build();
        far_agent.position = Vec3::new(0.0, 0.0, 0.0);
        agents.insert_agent(far_agent);
        index.enter(0, 1, 20.0);
        cooldowns.stamp(1, 500);

        let mut near_agent = AiAgent::new(2)
            .with_point(100)
            .with_speed(20.0)
            .initialized()
            .build();
        near_agent.position = Vec3::new(0.0, 0.0, 1000.0);
        agents.insert_agent(near_agent);
        index.enter(100, 2, 20.0);

        // Player 2,500 m away from agent 1, 1,500 m from agent 2.
        let players = [player_at(250, 2500.0)];
        let removed = despawn_sweep(&mut agents, &mut index, &mut animator, &cooldowns, &players, 2000.0);
        assert_eq!(removed, vec![1]);
        assert!(agents.get(&1).is_none());
        assert!(index.point_of(1).is_none());
        assert!(agents.get(&2).is_some());
    }
}
