use crate::agents::AgentId;
use crate::geom::Vec3;
use crate::spline::point::PointId;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

pub type SessionId = u32; // Alias for SessionId

/// Position of one connected player, updated by the host each tick.
#[derive(Debug, Clone, Copy)]
pub struct PlayerPos {
    /// The player's session identifier.
    pub session_id: SessionId,
    /// Spline point the player is projected onto, when known.
    pub current_point: Option<PointId>,
    /// World position of the player's car.
    pub world_pos: Vec3,
}

/// Concurrent map of connected players.
///
/// Host callbacks write from the server's threads; the tick loop takes a
/// snapshot once per tick. During shutdown the storage stops accepting new
/// updates so the final sweep works on a stable view.
#[derive(Debug, Default)]
pub struct PlayersStorage {
    players: DashMap<SessionId, PlayerPos>,
    accepting: AtomicBool,
}

impl PlayersStorage {
    /// Creates an empty storage that accepts updates.
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
            accepting: AtomicBool::new(true),
        }
    }

    /// Records a player position update from the host.
    ///
    /// Ignored after [`PlayersStorage::stop_accepting`] was called.
    pub fn update_player(&self, pos: PlayerPos) {
        if !self.accepting.load(Ordering::Acquire) {
            return;
        }
        self.players.insert(pos.session_id, pos);
    }

    /// Removes a disconnected player.
    pub fn remove_player(&self, session_id: SessionId) {
        self.players.remove(&session_id);
    }

    /// Number of connected players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player is connected.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Takes a snapshot of all player positions, ordered by session id so
    /// downstream iteration is deterministic.
    pub fn snapshot(&self) -> Vec<PlayerPos> {
        let mut snapshot: Vec<PlayerPos> = self.players.iter().map(|entry| *entry.value()).collect();
        snapshot.sort_unstable_by_key(|pos| pos.session_id);
        snapshot
    }

    /// Stops accepting updates; part of the graceful-shutdown protocol.
    pub fn stop_accepting(&self) {
        self.accepting.store(false, Ordering::Release);
    }
}

/// Per-agent lane-change cooldown stamps (server milliseconds).
#[derive(Debug, Default)]
pub struct CooldownsStorage {
    stamps: DashMap<AgentId, i64>,
}

impl CooldownsStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            stamps: DashMap::new(),
        }
    }

    /// Stamps the agent's last lane-change start time.
    pub fn stamp(&self, agent_id: AgentId, now_ms: i64) {
        self.stamps.insert(agent_id, now_ms);
    }

    /// Whether the agent's cooldown has elapsed. Agents without a stamp are
    /// always ready.
    pub fn is_ready(&self, agent_id: AgentId, now_ms: i64, cooldown_ms: i64) -> bool {
        match self.stamps.get(&agent_id) {
            Some(stamp) => now_ms - *stamp >= cooldown_ms,
            None => true,
        }
    }

    /// Drops the stamp of a despawned agent.
    pub fn remove(&self, agent_id: AgentId) {
        self.stamps.remove(&agent_id);
    }
}
