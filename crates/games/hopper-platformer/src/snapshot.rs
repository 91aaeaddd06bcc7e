use serde::{Deserialize, Serialize};

use hopper_core::Vec2;

use crate::enemies::Facing;
use crate::lifecycle::LifePhase;
use crate::motion::MotionState;
use crate::respawn::ObjectId;
use crate::world::PickupKind;

#[derive(Debug)]
pub enum SnapshotError {
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "snapshot encode error: {e}"),
            Self::Decode(e) => write!(f, "snapshot decode error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: ObjectId,
    pub position: Vec2,
    pub facing: Facing,
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupSnapshot {
    pub id: ObjectId,
    pub kind: PickupKind,
    pub position: Vec2,
    pub active: bool,
}

/// Read-only view of a level, for HUDs, replays and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub phase: LifePhase,
    pub position: Vec2,
    pub motion: MotionState,
    pub stars: u32,
    pub deaths: u32,
    pub time_remaining: f32,
    pub time_scale: f32,
    /// Seconds left on the speed boost, if one is running.
    pub powerup_remaining: Option<f32>,
    pub completed: bool,
    pub world_resets: u32,
    pub enemies: Vec<EnemySnapshot>,
    pub pickups: Vec<PickupSnapshot>,
}

impl LevelSnapshot {
    /// Compact MessagePack encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        rmp_serde::to_vec(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        rmp_serde::from_slice(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}
