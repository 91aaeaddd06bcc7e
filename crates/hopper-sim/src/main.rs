mod stub;

use tracing_subscriber::EnvFilter;

use hopper_core::{Damageable, PhysicsPort, Vec2};
use hopper_platformer::config::{EnemySpawn, LevelConfig, PickupSpawn};
use hopper_platformer::enemies::{Enemy, NavCommand, PatrolConfig};
use hopper_platformer::world::PickupKind;
use hopper_platformer::{Contact, FrameInput, Level, LevelEvent};

use stub::{FlatGround, LogPresentation};

const FRAME_SECS: f32 = 1.0 / 60.0;
const DEFAULT_TICKS: usize = 1800;
const GOAL_X: f32 = 18.0;
const TOUCH_RADIUS: f32 = 0.5;
/// Jump when an enemy is this close ahead.
const JUMP_LOOKAHEAD: f32 = 1.2;

type SimLevel = Level<FlatGround, LogPresentation>;

fn demo_layout(config: &mut LevelConfig) {
    if !config.layout.enemies.is_empty() || !config.layout.pickups.is_empty() {
        return;
    }
    tracing::info!("Config has no layout, using the built-in demo level");
    config.layout.pickups = vec![
        PickupSpawn {
            kind: PickupKind::Star,
            at: Vec2::new(2.0, 0.0),
        },
        PickupSpawn {
            kind: PickupKind::PowerUp,
            at: Vec2::new(4.0, 0.0),
        },
    ];
    config.layout.enemies = vec![EnemySpawn::Patrol {
        at: Vec2::new(7.0, 0.0),
        patrol: PatrolConfig {
            speed: 1.0,
            offset: Vec2::new(1.5, 0.0),
            chase: None,
        },
    }];
}

/// Scripted player: run right, hop over anything hostile just ahead.
fn scripted_input(level: &SimLevel) -> FrameInput {
    let me = level.physics().position();
    let threat_ahead = level.world().enemies().any(|(_, enemy)| {
        let ahead = enemy.position().x - me.x;
        !enemy.is_dead() && (0.0..JUMP_LOOKAHEAD).contains(&ahead)
    });
    FrameInput {
        axis: Vec2::new(1.0, 0.0),
        jump_pressed: threat_ahead,
    }
}

/// Stand-in for the host's collision pass.
fn detect_contacts(level: &SimLevel) -> Vec<Contact> {
    let me = level.physics().position();
    let mut contacts = Vec::new();
    for (id, enemy) in level.world().enemies() {
        let offset = me - enemy.position();
        let distance = offset.length();
        if !enemy.is_dead() && distance < TOUCH_RADIUS {
            let normal = if distance > 0.0 {
                offset * (1.0 / distance)
            } else {
                Vec2::new(0.0, 1.0)
            };
            contacts.push(Contact::Hostile { enemy: id, normal });
        }
    }
    for (id, pickup) in level.world().pickups() {
        if pickup.is_active() && me.distance(pickup.position()) < TOUCH_RADIUS {
            contacts.push(Contact::Pickup(id));
        }
    }
    if me.x >= GOAL_X {
        contacts.push(Contact::Goal);
    }
    contacts
}

/// Stand-in for the host's navmesh agents.
fn steer(level: &mut SimLevel, enemy: u32, command: NavCommand, dt: f32) {
    let NavCommand::MoveTo { target, speed } = command else {
        return;
    };
    if let Some(Enemy::Chaser(chaser)) = level.world_mut().enemy_mut(enemy) {
        let next = chaser.position().move_towards(target, speed * dt);
        chaser.set_position(next);
    }
}

fn main() -> Result<(), serde_json::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ticks = std::env::var("HOPPER_SIM_TICKS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut config = LevelConfig::load();
    demo_layout(&mut config);

    let mut level = Level::new(
        config,
        FlatGround::new(Vec2::ZERO),
        LogPresentation::default(),
    );
    tracing::info!(ticks, "Hopper sim starting");

    for _ in 0..ticks {
        let input = scripted_input(&level);
        let events = level.tick(FRAME_SECS, &input);
        let sim_dt = FRAME_SECS * level.time_scale();
        level.physics_mut().step(sim_dt);

        for event in events {
            match event {
                LevelEvent::Steer { enemy, command } => steer(&mut level, enemy, command, sim_dt),
                other => tracing::debug!(?other, "Level event"),
            }
        }
        for contact in detect_contacts(&level) {
            level.contact(contact);
        }
        for event in level.take_events() {
            tracing::debug!(?event, "Contact event");
        }

        if level.is_completed() {
            break;
        }
    }

    let snapshot = level.snapshot();
    tracing::info!(
        cues = level.presentation().cues,
        completed = snapshot.completed,
        deaths = snapshot.deaths,
        "Hopper sim finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
