use serde::{Deserialize, Serialize};

use hopper_core::Vec2;

use crate::combat::CombatConfig;
use crate::enemies::{ChaserConfig, ChaserEnemy, Enemy, PatrolConfig, PatrolEnemy};
use crate::lifecycle::LifecycleConfig;
use crate::motion::MotionConfig;
use crate::powerups::PowerUpConfig;
use crate::respawn::RespawnConfig;
use crate::round_clock::RoundClockConfig;
use crate::world::{Pickup, PickupKind};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "HOPPER_LEVEL_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/level.toml";

/// Everything tunable about a level, loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub motion: MotionConfig,
    pub lifecycle: LifecycleConfig,
    pub powerup: PowerUpConfig,
    pub combat: CombatConfig,
    pub clock: RoundClockConfig,
    pub respawn: RespawnConfig,
    pub layout: LevelLayout,
}

/// Objects placed in the world when the level starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub enemies: Vec<EnemySpawn>,
    pub pickups: Vec<PickupSpawn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnemySpawn {
    Patrol {
        at: Vec2,
        #[serde(default)]
        patrol: PatrolConfig,
    },
    Chaser {
        at: Vec2,
        #[serde(default)]
        chaser: ChaserConfig,
    },
}

impl EnemySpawn {
    pub fn build(&self) -> Enemy {
        match self {
            EnemySpawn::Patrol { at, patrol } => PatrolEnemy::new(*at, patrol.clone()).into(),
            EnemySpawn::Chaser { at, chaser } => ChaserEnemy::new(*at, chaser.clone()).into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub at: Vec2,
}

impl PickupSpawn {
    pub fn build(&self) -> Pickup {
        Pickup::new(self.kind, self.at)
    }
}

impl LevelConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: LevelConfig = toml::from_str(content)?;
        config.validate();
        Ok(config)
    }

    /// Load from `$HOPPER_LEVEL_CONFIG` or `config/level.toml`, falling back
    /// to defaults when the file is missing or malformed.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded level configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    LevelConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                LevelConfig::default()
            },
        };

        if let Ok(val) = std::env::var("HOPPER_ROUND_SECS")
            && let Ok(secs) = val.parse::<f32>()
        {
            config.clock.duration_secs = secs;
        }
        if let Ok(val) = std::env::var("HOPPER_RESPAWN_DELAY")
            && let Ok(secs) = val.parse::<f32>()
        {
            config.lifecycle.respawn_delay_secs = secs;
        }

        config.validate();
        config
    }

    /// Replace out-of-range values with their defaults, logging each one.
    pub fn validate(&mut self) {
        let defaults = LevelConfig::default();

        fn check(name: &str, value: &mut f32, default: f32, ok: impl Fn(f32) -> bool) {
            if !value.is_finite() || !ok(*value) {
                tracing::warn!("{name} = {value} is invalid, using {default}");
                *value = default;
            }
        }

        check(
            "motion.base_speed",
            &mut self.motion.base_speed,
            defaults.motion.base_speed,
            |v| v >= 0.0,
        );
        check(
            "motion.air_control",
            &mut self.motion.air_control,
            defaults.motion.air_control,
            |v| (0.0..=1.0).contains(&v),
        );
        check(
            "motion.jump_buffer_secs",
            &mut self.motion.jump_buffer_secs,
            defaults.motion.jump_buffer_secs,
            |v| v >= 0.0,
        );
        check(
            "lifecycle.respawn_delay_secs",
            &mut self.lifecycle.respawn_delay_secs,
            defaults.lifecycle.respawn_delay_secs,
            |v| v >= 0.0,
        );
        check(
            "powerup.duration_secs",
            &mut self.powerup.duration_secs,
            defaults.powerup.duration_secs,
            |v| v > 0.0,
        );
        check(
            "powerup.speed_multiplier",
            &mut self.powerup.speed_multiplier,
            defaults.powerup.speed_multiplier,
            |v| v >= 0.0,
        );
        check(
            "clock.duration_secs",
            &mut self.clock.duration_secs,
            defaults.clock.duration_secs,
            |v| v > 0.0,
        );
        check(
            "clock.time_up_pause_secs",
            &mut self.clock.time_up_pause_secs,
            defaults.clock.time_up_pause_secs,
            |v| v >= 0.0,
        );
    }
}
