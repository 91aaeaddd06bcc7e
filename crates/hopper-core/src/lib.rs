pub mod cue;
pub mod ports;
pub mod timer;
pub mod vec2;

pub use cue::Cue;
pub use ports::{Damageable, PhysicsPort, PresentationPort, Respawnable};
pub use timer::{RealtimeTimer, Scheduler, TimerHandle};
pub use vec2::Vec2;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::cue::Cue;
    use crate::ports::{PhysicsPort, PresentationPort};
    use crate::vec2::Vec2;

    /// Physics stand-in that records every request made by the core.
    /// Tests drive `grounded` and `position` directly.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPhysics {
        pub grounded: bool,
        pub position: Vec2,
        pub vx: f32,
        pub vx_history: Vec<f32>,
        pub impulses: Vec<Vec2>,
        pub vertical_cancels: usize,
        pub frozen: bool,
        pub freezes: usize,
        pub teleports: Vec<Vec2>,
    }

    impl RecordingPhysics {
        pub fn grounded_at(position: Vec2) -> Self {
            Self {
                grounded: true,
                position,
                ..Default::default()
            }
        }
    }

    impl PhysicsPort for RecordingPhysics {
        fn grounded(&self) -> bool {
            self.grounded
        }

        fn position(&self) -> Vec2 {
            self.position
        }

        fn set_horizontal_velocity(&mut self, vx: f32) {
            self.vx = vx;
            self.vx_history.push(vx);
        }

        fn apply_impulse(&mut self, impulse: Vec2) {
            self.impulses.push(impulse);
        }

        fn cancel_vertical_velocity(&mut self) {
            self.vertical_cancels += 1;
        }

        fn freeze(&mut self) {
            self.vx = 0.0;
            self.frozen = true;
            self.freezes += 1;
        }

        fn release(&mut self) {
            self.frozen = false;
        }

        fn teleport(&mut self, position: Vec2) {
            self.position = position;
            self.teleports.push(position);
        }
    }

    /// Presentation stand-in that keeps every cue in arrival order.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPresentation {
        pub cues: Vec<Cue>,
    }

    impl RecordingPresentation {
        pub fn count(&self, cue: Cue) -> usize {
            self.cues.iter().filter(|c| **c == cue).count()
        }

        pub fn count_matching(&self, pred: impl Fn(&Cue) -> bool) -> usize {
            self.cues.iter().filter(|c| pred(c)).count()
        }

        pub fn position_of(&self, cue: Cue) -> Option<usize> {
            self.cues.iter().position(|c| *c == cue)
        }
    }

    impl PresentationPort for RecordingPresentation {
        fn cue(&mut self, cue: Cue) {
            self.cues.push(cue);
        }
    }
}
