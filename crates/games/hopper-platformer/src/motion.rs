use serde::{Deserialize, Serialize};

use hopper_core::Vec2;
use hopper_core::timer::{TIME_EPSILON, sanitize_dt};

/// Horizontal speed at full stick deflection (units/s).
pub const BASE_SPEED: f32 = 1.2;
/// Upward impulse requested on jump.
pub const JUMP_IMPULSE: f32 = 3.2;
/// Fraction of the gap to the target velocity closed per tick while airborne.
pub const AIR_CONTROL: f32 = 0.2;
/// How long a jump press is remembered while waiting for ground contact (seconds).
pub const JUMP_BUFFER_SECS: f32 = 0.15;
/// Stick-down deflection beyond which a grounded player crouches.
pub const CROUCH_THRESHOLD: f32 = 0.5;

/// Tunable motion parameters, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub base_speed: f32,
    pub jump_impulse: f32,
    /// In [0, 1]. 1 behaves like ground control, 0 freezes air velocity.
    pub air_control: f32,
    pub jump_buffer_secs: f32,
    pub crouch_threshold: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            jump_impulse: JUMP_IMPULSE,
            air_control: AIR_CONTROL,
            jump_buffer_secs: JUMP_BUFFER_SECS,
            crouch_threshold: CROUCH_THRESHOLD,
        }
    }
}

/// Motion state of the controlled entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Sanitized stick input, both components in [-1, 1].
    pub axis: Vec2,
    /// Ground contact seen on the last tick.
    pub grounded: bool,
    /// Seconds left before a buffered jump press is discarded. Zero when idle.
    pub jump_buffer: f32,
    /// Last horizontal velocity handed to physics.
    pub speed: f32,
    pub multiplier: f32,
    pub crouching: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            axis: Vec2::ZERO,
            grounded: false,
            jump_buffer: 0.0,
            speed: 0.0,
            multiplier: 1.0,
            crouching: false,
        }
    }
}

/// Commands for the physics collaborator produced by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutput {
    pub vx: f32,
    /// Upward impulse to apply this tick, if a buffered jump was consumed.
    pub jump_impulse: Option<f32>,
    pub crouching: bool,
}

#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    state: MotionState,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            state: MotionState::default(),
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn is_crouching(&self) -> bool {
        self.state.crouching
    }

    /// Record raw input. A jump press (re)arms the buffer window.
    pub fn set_input(&mut self, axis: Vec2, jump_pressed: bool) {
        self.state.axis = axis.clamp_axis();
        if jump_pressed {
            self.state.jump_buffer = self.config.jump_buffer_secs.max(0.0);
        }
    }

    /// Scale horizontal speed and jump impulse. Applies from the next tick on.
    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.state.multiplier = if multiplier.is_finite() {
            multiplier.max(0.0)
        } else {
            1.0
        };
    }

    pub fn reset_multiplier(&mut self) {
        self.set_multiplier(1.0);
    }

    /// Horizontal velocity the current input asks for.
    pub fn target_speed(&self) -> f32 {
        self.state.axis.x * self.config.base_speed * self.state.multiplier
    }

    /// Advance one tick with the ground contact reported by physics.
    pub fn tick(&mut self, dt: f32, grounded: bool) -> MotionOutput {
        let dt = sanitize_dt(dt);
        self.state.grounded = grounded;

        let jump_impulse = self.advance_jump_buffer(dt, grounded);

        self.state.crouching = grounded && self.state.axis.y < -self.config.crouch_threshold;

        let target = self.target_speed();
        let vx = if self.state.crouching {
            0.0
        } else if grounded {
            target
        } else if self.state.axis.x != 0.0 {
            let blend = self.config.air_control.clamp(0.0, 1.0);
            self.state.speed + (target - self.state.speed) * blend
        } else {
            // No stick input in the air: keep momentum
            self.state.speed
        };
        self.state.speed = vx;

        MotionOutput {
            vx,
            jump_impulse,
            crouching: self.state.crouching,
        }
    }

    fn advance_jump_buffer(&mut self, dt: f32, grounded: bool) -> Option<f32> {
        if self.state.jump_buffer <= 0.0 {
            return None;
        }
        if grounded {
            self.state.jump_buffer = 0.0;
            return Some(self.config.jump_impulse * self.state.multiplier);
        }
        self.state.jump_buffer -= dt;
        if self.state.jump_buffer <= TIME_EPSILON {
            self.state.jump_buffer = 0.0;
        }
        None
    }

    /// Stop all motion (used when the entity dies).
    pub fn halt(&mut self) {
        self.state.speed = 0.0;
        self.state.jump_buffer = 0.0;
        self.state.crouching = false;
    }

    /// Clear motion after a respawn unless the player is still holding a
    /// direction, in which case movement carries on. A stale jump press never
    /// survives.
    pub fn reset_input_if_released(&mut self) {
        self.state.jump_buffer = 0.0;
        if self.state.axis == Vec2::ZERO {
            self.state.speed = 0.0;
            self.state.crouching = false;
        }
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
