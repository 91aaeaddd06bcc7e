use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hopper_core::{Scheduler, TimerHandle, Vec2};

/// Identifier of a world object (enemy or pickup).
pub type ObjectId = u32;

/// Default delay before a defeated or collected object returns (seconds).
pub const OBJECT_RESPAWN_SECS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Enemy,
    PowerUp,
    Collectible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    pub enemy_secs: f32,
    pub powerup_secs: f32,
    pub collectible_secs: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            enemy_secs: OBJECT_RESPAWN_SECS,
            powerup_secs: OBJECT_RESPAWN_SECS,
            collectible_secs: OBJECT_RESPAWN_SECS,
        }
    }
}

impl RespawnConfig {
    pub fn delay_for(&self, kind: ObjectKind) -> f32 {
        match kind {
            ObjectKind::Enemy => self.enemy_secs,
            ObjectKind::PowerUp => self.powerup_secs,
            ObjectKind::Collectible => self.collectible_secs,
        }
    }
}

/// Origin positions of every tracked object plus their pending respawn timers.
#[derive(Debug, Clone, Default)]
pub struct RespawnRegistry {
    config: RespawnConfig,
    origins: BTreeMap<ObjectId, Vec2>,
    pending: BTreeMap<ObjectId, TimerHandle>,
    timers: Scheduler<ObjectId>,
}

impl RespawnRegistry {
    pub fn new(config: RespawnConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Start tracking `id`. The first position seen is kept forever; later
    /// calls for the same id change nothing. Returns true on first capture.
    pub fn track(&mut self, id: ObjectId, position: Vec2) -> bool {
        if self.origins.contains_key(&id) {
            return false;
        }
        self.origins.insert(id, position);
        true
    }

    pub fn origin(&self, id: ObjectId) -> Option<Vec2> {
        self.origins.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn is_pending(&self, id: ObjectId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Bring `id` back after its kind's delay. Scheduling an object that is
    /// already waiting restarts its timer.
    pub fn schedule_respawn(&mut self, id: ObjectId, kind: ObjectKind, position: Vec2) {
        self.track(id, position);
        let previous = self.pending.get(&id).copied();
        let handle = self.timers.rearm(previous, self.config.delay_for(kind), id);
        self.pending.insert(id, handle);
        tracing::debug!(id, ?kind, "Object scheduled for respawn");
    }

    /// Advance object timers; returns `(id, origin)` for each object due back.
    pub fn tick(&mut self, dt: f32) -> Vec<(ObjectId, Vec2)> {
        let mut due = Vec::new();
        for id in self.timers.tick(dt) {
            self.pending.remove(&id);
            if let Some(origin) = self.origins.get(&id) {
                due.push((id, *origin));
            }
        }
        due
    }

    /// Drop every pending timer and return every tracked object with its
    /// origin, ordered by id.
    pub fn reset_all(&mut self) -> Vec<(ObjectId, Vec2)> {
        self.timers.clear();
        self.pending.clear();
        self.origins.iter().map(|(id, pos)| (*id, *pos)).collect()
    }
}
