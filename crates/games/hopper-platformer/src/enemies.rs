//! The two hostile variants: a patrolling walker that may give chase, and a
//! navmesh chaser that is steered by the host's navigation system.

use serde::{Deserialize, Serialize};

use hopper_core::timer::sanitize_dt;
use hopper_core::{Damageable, Respawnable, Vec2};

/// Patrol walking speed (units/s).
pub const PATROL_SPEED: f32 = 3.0;
/// Distance at which a patrolling enemy notices the player.
pub const CHASE_RANGE: f32 = 5.0;
/// Patrol-enemy speed while chasing.
pub const CHASE_SPEED: f32 = 4.0;
/// Distance under which a patrol enemy counts as having reached its waypoint.
const WAYPOINT_TOLERANCE: f32 = 0.01;

/// Navmesh chaser speed while pursuing.
pub const NAV_CHASE_SPEED: f32 = 3.5;
/// Crouching only hides the player from a chaser this close.
pub const NAV_CROUCH_RANGE: f32 = 1.0;
/// How long a chaser stays confused before heading home (seconds).
pub const NAV_CONFUSED_SECS: f32 = 1.5;
/// Interval between facing flips while confused (seconds).
pub const NAV_LOOK_AROUND_SECS: f32 = 0.5;
/// Navmesh chaser speed while walking home.
pub const NAV_RETURN_SPEED: f32 = 0.4;
/// A returning chaser stops once this close to its spawn.
pub const NAV_HOME_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    /// Face toward `target`; unchanged if it is straight above or below.
    fn toward(self, from: Vec2, target: Vec2) -> Facing {
        if target.x > from.x {
            Facing::Right
        } else if target.x < from.x {
            Facing::Left
        } else {
            self
        }
    }

    fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// What enemies get to know about the player each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec2,
    pub crouching: bool,
    /// Whether the player's position lies on the navmesh (host query).
    pub on_navmesh: bool,
}

/// Steering request for the host navmesh agent driving a chaser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NavCommand {
    Stop,
    MoveTo { target: Vec2, speed: f32 },
}

// ---------------------------------------------------------------------------
// Patrol
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    pub range: f32,
    pub speed: f32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            range: CHASE_RANGE,
            speed: CHASE_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub speed: f32,
    /// Patrol end point relative to spawn.
    pub offset: Vec2,
    /// `None` for enemies that only patrol.
    pub chase: Option<ChaseConfig>,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: PATROL_SPEED,
            offset: Vec2::ZERO,
            chase: None,
        }
    }
}

/// Walks back and forth between its spawn and `spawn + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolEnemy {
    config: PatrolConfig,
    spawn: Vec2,
    position: Vec2,
    heading_to_end: bool,
    facing: Facing,
    chasing: bool,
    dead: bool,
}

impl PatrolEnemy {
    pub fn new(spawn: Vec2, config: PatrolConfig) -> Self {
        Self {
            config,
            spawn,
            position: spawn,
            heading_to_end: true,
            facing: Facing::default(),
            chasing: false,
            dead: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    pub fn patrol_end(&self) -> Vec2 {
        self.spawn + self.config.offset
    }

    fn should_chase(&self, player: &PlayerView) -> Option<ChaseConfig> {
        let chase = self.config.chase?;
        if player.crouching {
            return None;
        }
        (self.position.distance(player.position) <= chase.range).then_some(chase)
    }

    pub fn tick(&mut self, dt: f32, player: &PlayerView) {
        if self.dead {
            return;
        }
        let dt = sanitize_dt(dt);

        if let Some(chase) = self.should_chase(player) {
            self.chasing = true;
            self.facing = self.facing.toward(self.position, player.position);
            self.position = self.position.move_towards(player.position, chase.speed * dt);
            return;
        }

        self.chasing = false;
        let destination = if self.heading_to_end {
            self.patrol_end()
        } else {
            self.spawn
        };
        self.facing = self.facing.toward(self.position, destination);
        self.position = self.position.move_towards(destination, self.config.speed * dt);
        if self.position.distance(destination) < WAYPOINT_TOLERANCE {
            self.heading_to_end = !self.heading_to_end;
        }
    }
}

impl Damageable for PatrolEnemy {
    fn die(&mut self) {
        self.dead = true;
        self.chasing = false;
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

impl Respawnable for PatrolEnemy {
    fn respawn(&mut self) {
        self.position = self.spawn;
        self.heading_to_end = true;
        self.chasing = false;
        self.dead = false;
    }

    fn spawn_position(&self) -> Vec2 {
        self.spawn
    }
}

// ---------------------------------------------------------------------------
// Navmesh chaser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaserConfig {
    pub chase_speed: f32,
    pub crouch_range: f32,
    pub confused_secs: f32,
    pub look_around_secs: f32,
    pub return_speed: f32,
    pub home_radius: f32,
}

impl Default for ChaserConfig {
    fn default() -> Self {
        Self {
            chase_speed: NAV_CHASE_SPEED,
            crouch_range: NAV_CROUCH_RANGE,
            confused_secs: NAV_CONFUSED_SECS,
            look_around_secs: NAV_LOOK_AROUND_SECS,
            return_speed: NAV_RETURN_SPEED,
            home_radius: NAV_HOME_RADIUS,
        }
    }
}

/// Pursues the player over the navmesh. A player crouching close by
/// confuses it: it stops and looks around, then gives up and walks home.
///
/// The host agent moves the body; report the resolved position back with
/// [`ChaserEnemy::set_position`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaserEnemy {
    config: ChaserConfig,
    spawn: Vec2,
    position: Vec2,
    facing: Facing,
    crouch_timer: f32,
    look_timer: f32,
    dead: bool,
}

impl ChaserEnemy {
    pub fn new(spawn: Vec2, config: ChaserConfig) -> Self {
        Self {
            config,
            spawn,
            position: spawn,
            facing: Facing::default(),
            crouch_timer: 0.0,
            look_timer: 0.0,
            dead: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_confused(&self) -> bool {
        self.crouch_timer > 0.0 && self.crouch_timer < self.config.confused_secs
    }

    fn reset_timers(&mut self) {
        self.crouch_timer = 0.0;
        self.look_timer = 0.0;
    }

    pub fn tick(&mut self, dt: f32, player: &PlayerView) -> NavCommand {
        if self.dead {
            return NavCommand::Stop;
        }
        let dt = sanitize_dt(dt);

        if !player.on_navmesh {
            self.reset_timers();
            return NavCommand::Stop;
        }

        let distance = self.position.distance(player.position);
        if player.crouching && distance <= self.config.crouch_range {
            self.crouch_timer += dt;
            if self.crouch_timer < self.config.confused_secs {
                self.look_timer += dt;
                if self.look_timer >= self.config.look_around_secs {
                    self.facing = self.facing.flipped();
                    self.look_timer = 0.0;
                }
                return NavCommand::Stop;
            }
            if self.position.distance(self.spawn) < self.config.home_radius {
                return NavCommand::Stop;
            }
            self.facing = self.facing.toward(self.position, self.spawn);
            return NavCommand::MoveTo {
                target: self.spawn,
                speed: self.config.return_speed,
            };
        }

        self.reset_timers();
        self.facing = self.facing.toward(self.position, player.position);
        NavCommand::MoveTo {
            target: player.position,
            speed: self.config.chase_speed,
        }
    }
}

impl Damageable for ChaserEnemy {
    fn die(&mut self) {
        self.dead = true;
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

impl Respawnable for ChaserEnemy {
    fn respawn(&mut self) {
        self.position = self.spawn;
        self.reset_timers();
        self.dead = false;
    }

    fn spawn_position(&self) -> Vec2 {
        self.spawn
    }
}

// ---------------------------------------------------------------------------
// Either variant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Enemy {
    Patrol(PatrolEnemy),
    Chaser(ChaserEnemy),
}

impl Enemy {
    pub fn position(&self) -> Vec2 {
        match self {
            Enemy::Patrol(e) => e.position(),
            Enemy::Chaser(e) => e.position(),
        }
    }

    pub fn facing(&self) -> Facing {
        match self {
            Enemy::Patrol(e) => e.facing(),
            Enemy::Chaser(e) => e.facing(),
        }
    }

    /// Advance one sim step. Chasers answer with a steering command.
    pub fn tick(&mut self, dt: f32, player: &PlayerView) -> Option<NavCommand> {
        match self {
            Enemy::Patrol(e) => {
                e.tick(dt, player);
                None
            },
            Enemy::Chaser(e) => Some(e.tick(dt, player)),
        }
    }
}

impl Damageable for Enemy {
    fn die(&mut self) {
        match self {
            Enemy::Patrol(e) => e.die(),
            Enemy::Chaser(e) => e.die(),
        }
    }

    fn is_dead(&self) -> bool {
        match self {
            Enemy::Patrol(e) => e.is_dead(),
            Enemy::Chaser(e) => e.is_dead(),
        }
    }
}

impl Respawnable for Enemy {
    fn respawn(&mut self) {
        match self {
            Enemy::Patrol(e) => e.respawn(),
            Enemy::Chaser(e) => e.respawn(),
        }
    }

    fn spawn_position(&self) -> Vec2 {
        match self {
            Enemy::Patrol(e) => e.spawn_position(),
            Enemy::Chaser(e) => e.spawn_position(),
        }
    }
}

impl From<PatrolEnemy> for Enemy {
    fn from(enemy: PatrolEnemy) -> Self {
        Enemy::Patrol(enemy)
    }
}

impl From<ChaserEnemy> for Enemy {
    fn from(enemy: ChaserEnemy) -> Self {
        Enemy::Chaser(enemy)
    }
}
