use serde::{Deserialize, Serialize};

use hopper_core::{Scheduler, TimerHandle, Vec2};

/// Delay between death and respawn (seconds).
pub const RESPAWN_DELAY_SECS: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub respawn_delay_secs: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            respawn_delay_secs: RESPAWN_DELAY_SECS,
        }
    }
}

/// What killed the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    Enemy,
    Trap,
    TimeUp,
}

/// `Alive → Dying → Dead → Alive`.
///
/// `Dying` lasts for the respawn delay and owns the pending respawn timer.
/// `Dead` only exists while the respawn sequence resets the player and world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifePhase {
    Alive,
    Dying { respawn: TimerHandle },
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    phase: LifePhase,
    spawn: Option<Vec2>,
    deaths: u32,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: LifePhase::Alive,
            spawn: None,
            deaths: 0,
        }
    }

    pub fn phase(&self) -> LifePhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase == LifePhase::Alive
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Remember where the entity starts. Only the first capture sticks.
    pub fn capture_spawn(&mut self, position: Vec2) -> bool {
        if self.spawn.is_some() {
            return false;
        }
        self.spawn = Some(position);
        true
    }

    pub fn spawn_position(&self) -> Option<Vec2> {
        self.spawn
    }

    /// `Alive → Dying`: arm the respawn timer. Returns false (and schedules
    /// nothing) if a death is already in flight.
    pub fn kill<A>(&mut self, scheduler: &mut Scheduler<A>, delay: f32, respawn: A) -> bool {
        if !self.is_alive() {
            return false;
        }
        let handle = scheduler.schedule(delay, respawn);
        self.phase = LifePhase::Dying { respawn: handle };
        self.deaths += 1;
        true
    }

    /// `Dying → Dead` when the respawn timer fires. Yields the position to
    /// reset to.
    pub fn begin_respawn(&mut self) -> Option<Vec2> {
        match self.phase {
            LifePhase::Dying { .. } => {
                self.phase = LifePhase::Dead;
                Some(self.spawn.unwrap_or_default())
            },
            _ => None,
        }
    }

    /// `Dead → Alive` once the reset is complete.
    pub fn finish_respawn(&mut self) -> bool {
        if self.phase != LifePhase::Dead {
            return false;
        }
        self.phase = LifePhase::Alive;
        true
    }
}
