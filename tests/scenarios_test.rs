//! End-to-end scenarios over the full tick pipeline: free-road cruising,
//! hard braking on approach, MOBIL accepts and safety rejects, lane-change
//! finalization, cooldown gating and despawning.

use std::sync::Arc;

use traffic_ai_core::agents::AiAgent;
use traffic_ai_core::config::TrafficConfig;
use traffic_ai_core::geom::Vec3;
use traffic_ai_core::idm::MAX_ACCELERATION;
use traffic_ai_core::players::PlayerPos;
use traffic_ai_core::simulation::Simulation;
use traffic_ai_core::utils::test_graphs::{straight_road, two_lane_road};
use traffic_ai_core::zones::ZonesStorage;

const TICK_MS: i64 = 20;

/// Simulation over a single-lane road with a player parked at `player_z`
/// so nothing despawns and nothing new spawns (no zones registered).
fn single_lane_sim(points: u32, player_point: u32, player_z: f32) -> Simulation {
    let graph = Arc::new(straight_road(points, 10.0));
    let sim = Simulation::with_seed(graph, ZonesStorage::new(), TrafficConfig::default(), 1);
    sim.players().update_player(PlayerPos {
        session_id: 1,
        current_point: Some(player_point),
        world_pos: Vec3::new(0.0, 0.0, player_z),
    });
    sim
}

fn two_lane_sim(points: u32, config: TrafficConfig) -> Simulation {
    let graph = Arc::new(two_lane_road(points, 10.0));
    let sim = Simulation::with_seed(graph, ZonesStorage::new(), config, 1);
    sim.players().update_player(PlayerPos {
        session_id: 1,
        current_point: Some(0),
        world_pos: Vec3::new(0.0, 0.0, 0.0),
    });
    sim
}

#[test]
fn free_road_acceleration_follows_idm() {
    let mut sim = single_lane_sim(300, 0, 0.0);
    sim.add_agent(
        AiAgent::new(1)
            .with_point(0)
            .with_speed(20.0)
            .with_target_speed(27.8)
            .initialized()
            .build(),
    )
    .unwrap();

    let mut last_speed = 20.0f32;
    let mut last_accel = f32::INFINITY;
    for step in 1..=10 {
        let speed_before = sim.agents().get(&1).unwrap().current_speed;
        sim.tick(step * TICK_MS).unwrap();
        let agent = sim.agents().get(&1).unwrap();

        let expected = MAX_ACCELERATION * (1.0 - (speed_before / 27.8).powi(4));
        assert!(
            (agent.acceleration - expected).abs() < 1e-3,
            "Tick {}: acceleration {} should match free-road IDM {}",
            step,
            agent.acceleration,
            expected
        );
        assert!(
            agent.current_speed > last_speed,
            "Speed must increase toward the target"
        );
        assert!(agent.current_speed < 27.8);
        assert!(
            agent.acceleration < last_accel,
            "Acceleration must decrease monotonically"
        );
        last_speed = agent.current_speed;
        last_accel = agent.acceleration;
    }
}

#[test]
fn approach_on_slower_leader_brakes_hard() {
    let mut sim = single_lane_sim(300, 0, 0.0);
    sim.add_agent(
        AiAgent::new(1)
            .with_point(0)
            .with_speed(30.0)
            .with_target_speed(30.0)
            .initialized()
            .build(),
    )
    .unwrap();
    // Leader 40 m ahead doing a steady 20 m/s.
    sim.add_agent(
        AiAgent::new(2)
            .with_point(4)
            .with_speed(20.0)
            .with_target_speed(20.0)
            .initialized()
            .build(),
    )
    .unwrap();

    sim.tick(TICK_MS).unwrap();
    let agent = sim.agents().get(&1).unwrap();
    assert!(
        agent.acceleration < -4.0,
        "Expected hard braking below -b, got {}",
        agent.acceleration
    );
}

/// Blocked agent on the slow lane: speed 12 of target 25, crawling leader
/// 30 m ahead, left lane empty, no right link.
fn blocked_two_lane_sim(config: TrafficConfig) -> Simulation {
    let mut sim = two_lane_sim(120, config);
    sim.add_agent(
        AiAgent::new(1)
            .with_point(5)
            .with_speed(12.0)
            .with_target_speed(25.0)
            .initialized()
            .build(),
    )
    .unwrap();
    sim.add_agent(
        AiAgent::new(2)
            .with_point(8)
            .with_speed(10.0)
            .with_target_speed(10.0)
            .initialized()
            .build(),
    )
    .unwrap();
    sim
}

#[test]
fn mobil_accepts_left_change_when_blocked() {
    let mut sim = blocked_two_lane_sim(TrafficConfig::default());
    let report = sim.tick(TICK_MS).unwrap();
    assert_eq!(report.lane_changes_started, 1);

    let change = sim.animator().get(1).expect("agent 1 must be animating");
    assert!(change.is_left);
    assert_eq!(change.start_time_ms, TICK_MS, "Cooldown stamp at start time");
    assert!(
        (2.5..=7.0).contains(&change.duration_s),
        "Duration {} outside [2.5, 7.0]",
        change.duration_s
    );
    // Blocked at 12 m/s the speed scaling bottoms out at the floor.
    assert!((change.duration_s - 2.5).abs() < 1e-3);
}

#[test]
fn mobil_rejects_unsafe_follower() {
    let mut sim = blocked_two_lane_sim(TrafficConfig::default());
    // Fast follower right behind the adjacent left-lane point.
    let left = 120 + 5;
    sim.add_agent(
        AiAgent::new(3)
            .with_point(left - 1)
            .with_speed(25.0)
            .with_target_speed(25.0)
            .initialized()
            .build(),
    )
    .unwrap();

    let report = sim.tick(TICK_MS).unwrap();
    assert_eq!(report.lane_changes_started, 0, "Safety test must reject the change");
    assert!(sim.animator().is_empty());
    assert_eq!(sim.agents().get(&1).unwrap().current_point, 5, "Agent stays in lane");
}

#[test]
fn lane_change_finalizes_consistently() {
    let mut sim = blocked_two_lane_sim(TrafficConfig::default());
    sim.tick(TICK_MS).unwrap();
    let change = sim.animator().get(1).expect("change must have started");
    let target = change.target_point;
    let end_ms = change.start_time_ms + (change.duration_s * 1000.0) as i64;

    // Drive the animation tick by tick up to the exact end time.
    let mut now = TICK_MS;
    while now < end_ms {
        now = (now + TICK_MS).min(end_ms);
        sim.tick(now).unwrap();
    }

    let agent = sim.agents().get(&1).unwrap();
    assert_eq!(agent.current_point, target);
    assert_eq!(
        sim.neighbors().point_of(1),
        Some(target),
        "Index must show the agent only under the target point"
    );
    assert!(
        !sim.animator().is_animating(1),
        "Active table must no longer contain the agent"
    );
}

#[test]
fn cooldown_blocks_further_changes() {
    // Practically infinite cooldown: one change per run.
    let config = TrafficConfig {
        lane_change_cooldown_s: 1000.0,
        ..TrafficConfig::default()
    };
    let mut sim = blocked_two_lane_sim(config);
    sim.tick(TICK_MS).unwrap();
    assert!(sim.animator().is_animating(1), "First change starts unhindered");

    // Keep the agent under pressure with a crawler dropped into the fast
    // lane ahead of it, then run for twenty simulated seconds.
    sim.add_agent(
        AiAgent::new(4)
            .with_point(120 + 12)
            .with_speed(8.0)
            .with_target_speed(8.0)
            .initialized()
            .build(),
    )
    .unwrap();
    let mut started_total = 0;
    for step in 2..=1000 {
        let report = sim.tick(step * TICK_MS).unwrap();
        started_total += report.lane_changes_started;
    }
    assert_eq!(
        started_total, 0,
        "No further change may start within the cooldown"
    );
}

#[test]
fn right_change_returns_to_slow_lane() {
    // Agent cruising in the fast lane, blocked by a crawler, slow lane empty:
    // the incentive must overcome the keep-slow-lane bias and move it right.
    let mut sim = two_lane_sim(120, TrafficConfig::default());
    sim.add_agent(
        AiAgent::new(1)
            .with_point(120 + 5)
            .with_speed(12.0)
            .with_target_speed(25.0)
            .initialized()
            .build(),
    )
    .unwrap();
    sim.add_agent(
        AiAgent::new(2)
            .with_point(120 + 8)
            .with_speed(10.0)
            .with_target_speed(10.0)
            .initialized()
            .build(),
    )
    .unwrap();

    sim.tick(TICK_MS).unwrap();
    let change = sim.animator().get(1).expect("right-side change must start");
    assert!(!change.is_left);
    assert_eq!(change.target_point, 5);
}

#[test]
fn despawn_removes_agent_out_of_range() {
    // Player 2,500 m away from the agent; despawn distance is 2,000 m.
    let mut sim = single_lane_sim(300, 250, 2500.0);
    sim.add_agent(
        AiAgent::new(1)
            .with_point(0)
            .with_speed(20.0)
            .with_target_speed(25.0)
            .initialized()
            .build(),
    )
    .unwrap();
    assert_eq!(sim.neighbors().point_of(1), Some(0));

    let report = sim.tick(TICK_MS).unwrap();
    assert_eq!(report.despawned, 1);
    assert!(sim.agents().get(&1).is_none(), "Agent must leave the registry");
    assert_eq!(sim.neighbors().point_of(1), None, "Agent must leave the index");
}

#[test]
fn acceleration_is_never_raised_above_free_drive() {
    // Invariant: the IDM pass only lowers the host-style drive acceleration.
    let mut sim = blocked_two_lane_sim(TrafficConfig::default());
    for step in 1..=100 {
        sim.tick(step * TICK_MS).unwrap();
        for (_, agent) in sim.agents().iter() {
            assert!(
                agent.acceleration <= MAX_ACCELERATION + 1e-6,
                "Acceleration above the drive ceiling"
            );
        }
    }
}

#[test]
fn states_snapshot_reflects_lane_change() {
    let mut sim = blocked_two_lane_sim(TrafficConfig::default());
    sim.tick(TICK_MS).unwrap();
    // Advance partway into the animation.
    for step in 2..=40 {
        sim.tick(step * TICK_MS).unwrap();
    }
    let state = sim.extract_states(40 * TICK_MS);
    let vehicle = state.vehicles.iter().find(|v| v.id == 1).unwrap();
    assert!(
        vehicle.lateral_offset > 0.0,
        "Mid-animation snapshot must carry a lateral offset"
    );
    let parked = state.vehicles.iter().find(|v| v.id == 2).unwrap();
    assert_eq!(parked.lateral_offset, 0.0);
}
