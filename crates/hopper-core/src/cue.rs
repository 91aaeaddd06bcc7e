use serde::{Deserialize, Serialize};

/// Fire-and-forget signals for the presentation layer (animation, audio,
/// camera, HUD). The core never waits on how a cue is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    Jump,
    /// Death sound, music stop, screen shake, death animation.
    Death,
    Respawned,
    EnemyDefeated,
    StarCollected,
    /// Speed boost started (or restarted). Music pitch shifts to `music_pitch`.
    PowerUpStart {
        music_pitch: f32,
    },
    PowerUpEnd,
    /// Final seconds of the round began: duck music, wobble camera.
    CountdownStarted,
    /// One beep per remaining whole second.
    CountdownTick(u8),
    TimeUp,
    LevelComplete,
}

impl Cue {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::Death => "death",
            Cue::Respawned => "respawned",
            Cue::EnemyDefeated => "enemy-defeated",
            Cue::StarCollected => "star-collected",
            Cue::PowerUpStart { .. } => "powerup-start",
            Cue::PowerUpEnd => "powerup-end",
            Cue::CountdownStarted => "countdown-started",
            Cue::CountdownTick(_) => "countdown-tick",
            Cue::TimeUp => "time-up",
            Cue::LevelComplete => "level-complete",
        }
    }
}
