//! Minimal collaborators: a point body on flat ground and a presentation
//! layer that only logs.

use hopper_core::{Cue, PhysicsPort, PresentationPort, Vec2};

const GRAVITY: f32 = -9.8;

/// Unit-mass point body over an infinite floor at `y = 0`.
#[derive(Debug, Clone, Default)]
pub struct FlatGround {
    position: Vec2,
    velocity: Vec2,
    frozen: bool,
}

impl FlatGround {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Integrate one step of sim time.
    pub fn step(&mut self, dt: f32) {
        if self.frozen || dt <= 0.0 {
            return;
        }
        self.velocity.y += GRAVITY * dt;
        self.position = self.position + self.velocity * dt;
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }
}

impl PhysicsPort for FlatGround {
    fn grounded(&self) -> bool {
        self.position.y <= 0.0 && self.velocity.y <= 0.0
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_horizontal_velocity(&mut self, vx: f32) {
        if !self.frozen {
            self.velocity.x = vx;
        }
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if !self.frozen {
            self.velocity = self.velocity + impulse;
        }
    }

    fn cancel_vertical_velocity(&mut self) {
        self.velocity.y = 0.0;
    }

    fn freeze(&mut self) {
        self.velocity = Vec2::ZERO;
        self.frozen = true;
    }

    fn release(&mut self) {
        self.frozen = false;
    }

    fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
    }
}

#[derive(Debug, Default)]
pub struct LogPresentation {
    pub cues: usize,
}

impl PresentationPort for LogPresentation {
    fn cue(&mut self, cue: Cue) {
        self.cues += 1;
        match cue {
            Cue::CountdownTick(n) => tracing::info!(cue = cue.name(), n),
            Cue::PowerUpStart { music_pitch } => tracing::info!(cue = cue.name(), music_pitch),
            _ => tracing::info!(cue = cue.name()),
        }
    }
}
