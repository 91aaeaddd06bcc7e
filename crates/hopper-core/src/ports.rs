use crate::cue::Cue;
use crate::vec2::Vec2;

/// The host physics body of the controlled entity.
///
/// The core never integrates motion itself; it reads ground contact and
/// position, and writes velocity/impulse requests back.
pub trait PhysicsPort {
    /// Ground contact as resolved by the host this frame.
    fn grounded(&self) -> bool;

    fn position(&self) -> Vec2;

    /// Overwrite horizontal velocity, leaving vertical velocity untouched.
    fn set_horizontal_velocity(&mut self, vx: f32);

    fn apply_impulse(&mut self, impulse: Vec2);

    /// Zero vertical velocity (used before a rebound impulse).
    fn cancel_vertical_velocity(&mut self);

    /// Zero all velocity and stop simulating the body (kinematic).
    fn freeze(&mut self);

    /// Return the body to dynamic simulation.
    fn release(&mut self);

    fn teleport(&mut self, position: Vec2);
}

/// Receiver of presentation cues.
pub trait PresentationPort {
    fn cue(&mut self, cue: Cue);
}

/// Anything that can be killed by the player or the level.
pub trait Damageable {
    /// Kill the entity. Calling it on an already dead entity does nothing.
    fn die(&mut self);

    fn is_dead(&self) -> bool;
}

/// Anything the world can restore to its starting state.
pub trait Respawnable {
    /// Return to the spawn position, alive and active.
    fn respawn(&mut self);

    fn spawn_position(&self) -> Vec2;
}
