pub mod combat;
pub mod config;
pub mod enemies;
pub mod lifecycle;
pub mod motion;
pub mod powerups;
pub mod respawn;
pub mod round_clock;
pub mod scoring;
pub mod snapshot;
pub mod world;

use serde::{Deserialize, Serialize};

use hopper_core::timer::sanitize_dt;
use hopper_core::{
    Cue, Damageable, PhysicsPort, PresentationPort, RealtimeTimer, Scheduler, Vec2,
};

use combat::{ContactOutcome, resolve_contact};
use config::LevelConfig;
use enemies::{NavCommand, PlayerView};
use lifecycle::{DamageCause, Lifecycle};
use motion::MotionController;
use powerups::PowerUpSlot;
use respawn::ObjectId;
use round_clock::{ClockSignal, RoundClock};
use snapshot::{EnemySnapshot, LevelSnapshot, PickupSnapshot};
use world::{PickupKind, World};

/// Sim-time events owned by the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTimer {
    Respawn,
    PowerUpExpired,
}

/// Player input sampled by the host for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub axis: Vec2,
    pub jump_pressed: bool,
}

/// Contacts reported by the host's collision system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Touched an enemy. `normal` points from the enemy toward the player.
    Hostile { enemy: ObjectId, normal: Vec2 },
    Trap,
    Pickup(ObjectId),
    Goal,
}

/// Outcomes the host may want to react to beyond presentation cues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    PlayerDied { cause: DamageCause },
    PlayerRespawned,
    EnemyDefeated { enemy: ObjectId },
    StarCollected { total: u32 },
    LevelComplete { stars: u32, time_remaining: f32, score: i64 },
    /// Steering for the navmesh agent behind a chaser enemy.
    Steer { enemy: ObjectId, command: NavCommand },
}

/// One playable level: the controlled player, its world and the round clock.
///
/// Collaborators are handed in at construction and owned for the level's
/// lifetime. The host calls [`Level::tick`] once per frame with the real
/// frame delta and reports collisions through [`Level::contact`].
pub struct Level<P: PhysicsPort, V: PresentationPort> {
    config: LevelConfig,
    physics: P,
    presentation: V,
    motion: MotionController,
    lifecycle: Lifecycle,
    powerup: PowerUpSlot,
    timers: Scheduler<LevelTimer>,
    clock: RoundClock,
    time_up: RealtimeTimer,
    time_scale: f32,
    world: World,
    stars: u32,
    completed: bool,
    player_on_navmesh: bool,
    pending_events: Vec<LevelEvent>,
}

impl<P: PhysicsPort, V: PresentationPort> Level<P, V> {
    /// Build the level. The player's spawn point is wherever the physics body
    /// starts.
    pub fn new(config: LevelConfig, physics: P, presentation: V) -> Self {
        let mut lifecycle = Lifecycle::new();
        lifecycle.capture_spawn(physics.position());

        let mut world = World::new(config.respawn.clone());
        for enemy in &config.layout.enemies {
            world.add_enemy(enemy.build());
        }
        for pickup in &config.layout.pickups {
            world.add_pickup(pickup.build());
        }

        Self {
            motion: MotionController::new(config.motion.clone()),
            clock: RoundClock::new(config.clock.clone()),
            config,
            physics,
            presentation,
            lifecycle,
            powerup: PowerUpSlot::default(),
            timers: Scheduler::new(),
            time_up: RealtimeTimer::default(),
            time_scale: 1.0,
            world,
            stars: 0,
            completed: false,
            player_on_navmesh: true,
            pending_events: Vec::new(),
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn presentation(&self) -> &V {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut V {
        &mut self.presentation
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    /// Factor applied to real frame time to get sim time.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn powerup_active(&self) -> bool {
        self.powerup.is_active()
    }

    /// Host navmesh query result for the player's current position.
    pub fn set_player_on_navmesh(&mut self, on_navmesh: bool) {
        self.player_on_navmesh = on_navmesh;
    }

    /// Events raised outside of a tick (e.g. by [`Level::contact`]) that have
    /// not been collected yet.
    pub fn take_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Advance one frame.
    ///
    /// Order: input, motion (and the physics request), world, level timers,
    /// round clock, then the real-time timer. Returns every event raised since
    /// the last call.
    pub fn tick(&mut self, real_dt: f32, input: &FrameInput) -> Vec<LevelEvent> {
        let real_dt = sanitize_dt(real_dt);
        let dt = real_dt * self.time_scale;
        let time_up_armed = self.time_up.is_armed();

        let alive = self.lifecycle.is_alive();
        self.motion
            .set_input(input.axis, input.jump_pressed && alive && !self.completed);

        if alive && !self.completed && dt > 0.0 {
            let out = self.motion.tick(dt, self.physics.grounded());
            self.physics.set_horizontal_velocity(out.vx);
            if let Some(impulse) = out.jump_impulse {
                self.physics.apply_impulse(Vec2::new(0.0, impulse));
                self.presentation.cue(Cue::Jump);
            }
        }

        let player = PlayerView {
            position: self.physics.position(),
            crouching: self.motion.is_crouching(),
            on_navmesh: self.player_on_navmesh,
        };
        for (enemy, command) in self.world.tick(dt, &player) {
            self.pending_events.push(LevelEvent::Steer { enemy, command });
        }

        for timer in self.timers.tick(dt) {
            match timer {
                LevelTimer::Respawn => self.respawn(),
                LevelTimer::PowerUpExpired => self.expire_powerup(),
            }
        }

        for signal in self.clock.tick(dt) {
            match signal {
                ClockSignal::CountdownStarted => self.presentation.cue(Cue::CountdownStarted),
                ClockSignal::CountdownTick(n) => self.presentation.cue(Cue::CountdownTick(n)),
                ClockSignal::TimeUp => self.begin_time_up(),
            }
        }

        // A timer armed this frame starts counting on the next one
        if time_up_armed && self.time_up.tick(real_dt) {
            tracing::debug!("Time-up pause over");
            self.time_scale = 1.0;
            self.damage(DamageCause::TimeUp);
        }

        self.take_events()
    }

    /// Handle a collision reported by the host. Ignored while the player is
    /// not alive or the level is already complete.
    pub fn contact(&mut self, contact: Contact) {
        if !self.lifecycle.is_alive() || self.completed {
            return;
        }
        match contact {
            Contact::Hostile { enemy, normal } => self.hostile_contact(enemy, normal),
            Contact::Trap => {
                self.damage(DamageCause::Trap);
            },
            Contact::Pickup(id) => match self.world.collect(id) {
                Some(PickupKind::Star) => {
                    self.stars += 1;
                    self.presentation.cue(Cue::StarCollected);
                    self.pending_events
                        .push(LevelEvent::StarCollected { total: self.stars });
                },
                Some(PickupKind::PowerUp) => self.activate_powerup(),
                None => {},
            },
            Contact::Goal => self.complete(),
        }
    }

    fn hostile_contact(&mut self, enemy: ObjectId, normal: Vec2) {
        if !self.world.enemy(enemy).is_some_and(|e| !e.is_dead()) {
            return;
        }
        match resolve_contact(normal, self.config.combat.stomp_threshold) {
            ContactOutcome::Stomp => {
                self.world.defeat_enemy(enemy);
                self.physics.cancel_vertical_velocity();
                self.physics
                    .apply_impulse(Vec2::new(0.0, self.config.combat.rebound_impulse));
                self.presentation.cue(Cue::EnemyDefeated);
                self.pending_events.push(LevelEvent::EnemyDefeated { enemy });
                tracing::debug!(enemy, "Enemy stomped");
            },
            ContactOutcome::SideHit => {
                self.damage(DamageCause::Enemy);
            },
        }
    }

    /// Start the death sequence. Returns false if the player was not alive or
    /// the level is already complete.
    pub fn damage(&mut self, cause: DamageCause) -> bool {
        if self.completed {
            return false;
        }
        let delay = self.config.lifecycle.respawn_delay_secs;
        if !self.lifecycle.kill(&mut self.timers, delay, LevelTimer::Respawn) {
            return false;
        }
        // Respawn runs on sim time, which must not stay frozen
        if self.time_up.cancel() {
            self.time_scale = 1.0;
        }

        self.cancel_powerup();
        self.physics.freeze();
        self.motion.halt();
        self.presentation.cue(Cue::Death);
        self.clock.pause();
        self.pending_events.push(LevelEvent::PlayerDied { cause });
        tracing::info!(?cause, deaths = self.lifecycle.deaths(), "Player died");
        true
    }

    fn respawn(&mut self) {
        let Some(spawn) = self.lifecycle.begin_respawn() else {
            return;
        };
        self.physics.teleport(spawn);
        self.physics.release();
        self.stars = 0;
        self.clock.restart();
        self.time_up.cancel();
        self.time_scale = 1.0;
        self.world.reset_all();
        self.motion.reset_input_if_released();
        self.presentation.cue(Cue::Respawned);
        self.lifecycle.finish_respawn();
        self.pending_events.push(LevelEvent::PlayerRespawned);
        tracing::info!(x = spawn.x, y = spawn.y, "Player respawned");
    }

    /// Start the speed boost, or restart its full duration if it is running.
    pub fn activate_powerup(&mut self) {
        if !self.lifecycle.is_alive() {
            return;
        }
        let cfg = &self.config.powerup;
        let restarted = self.powerup.activate(
            &mut self.timers,
            cfg.duration_secs,
            LevelTimer::PowerUpExpired,
        );
        self.motion.set_multiplier(cfg.speed_multiplier);
        self.presentation.cue(Cue::PowerUpStart {
            music_pitch: cfg.music_pitch,
        });
        tracing::debug!(restarted, "Speed boost active");
    }

    fn expire_powerup(&mut self) {
        if self.powerup.expired() {
            self.motion.reset_multiplier();
            self.presentation.cue(Cue::PowerUpEnd);
            tracing::debug!("Speed boost expired");
        }
    }

    fn cancel_powerup(&mut self) {
        if self.powerup.deactivate(&mut self.timers) {
            self.motion.reset_multiplier();
            self.presentation.cue(Cue::PowerUpEnd);
        }
    }

    fn begin_time_up(&mut self) {
        self.presentation.cue(Cue::TimeUp);
        self.time_scale = 0.0;
        self.time_up.arm(self.config.clock.time_up_pause_secs);
        tracing::info!("Time up");
    }

    fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.clock.pause();
        // Reaching the goal during the time-up pause cancels the pending kill
        if self.time_up.cancel() {
            self.time_scale = 1.0;
        }
        self.motion.halt();
        self.physics.set_horizontal_velocity(0.0);

        let time_remaining = self.clock.remaining();
        let score = scoring::level_score(self.stars, time_remaining);
        self.presentation.cue(Cue::LevelComplete);
        self.pending_events.push(LevelEvent::LevelComplete {
            stars: self.stars,
            time_remaining,
            score,
        });
        tracing::info!(stars = self.stars, time_remaining, score, "Level complete");
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            phase: self.lifecycle.phase(),
            position: self.physics.position(),
            motion: self.motion.state().clone(),
            stars: self.stars,
            deaths: self.lifecycle.deaths(),
            time_remaining: self.clock.remaining(),
            time_scale: self.time_scale,
            powerup_remaining: self.powerup.remaining(&self.timers),
            completed: self.completed,
            world_resets: self.world.reset_count(),
            enemies: self
                .world
                .enemies()
                .map(|(id, e)| EnemySnapshot {
                    id,
                    position: e.position(),
                    facing: e.facing(),
                    dead: e.is_dead(),
                })
                .collect(),
            pickups: self
                .world
                .pickups()
                .map(|(id, p)| PickupSnapshot {
                    id,
                    kind: p.kind,
                    position: p.position(),
                    active: p.is_active(),
                })
                .collect(),
        }
    }
}
