use hopper_core::Vec2;
use hopper_core::test_helpers::{RecordingPhysics, RecordingPresentation};
use hopper_platformer::config::LevelConfig;
use hopper_platformer::{FrameInput, Level, LevelEvent};

pub type TestLevel = Level<RecordingPhysics, RecordingPresentation>;

pub const DT: f32 = 0.016;

/// A level whose player stands on flat ground at the origin.
pub fn level() -> TestLevel {
    level_with(LevelConfig::default())
}

pub fn level_with(config: LevelConfig) -> TestLevel {
    Level::new(
        config,
        RecordingPhysics::grounded_at(Vec2::ZERO),
        RecordingPresentation::default(),
    )
}

pub fn idle() -> FrameInput {
    FrameInput::default()
}

pub fn holding_right() -> FrameInput {
    FrameInput {
        axis: Vec2::new(1.0, 0.0),
        jump_pressed: false,
    }
}

pub fn jump() -> FrameInput {
    FrameInput {
        axis: Vec2::ZERO,
        jump_pressed: true,
    }
}

/// Tick `steps` times with the same input, collecting every event.
pub fn run(level: &mut TestLevel, steps: usize, dt: f32, input: FrameInput) -> Vec<LevelEvent> {
    (0..steps).flat_map(|_| level.tick(dt, &input)).collect()
}
