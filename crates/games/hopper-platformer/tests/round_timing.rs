//! Round clock, the time-up pause and level completion.

#[allow(dead_code)]
mod common;

use hopper_core::{Cue, Vec2};
use hopper_platformer::config::{EnemySpawn, LevelConfig};
use hopper_platformer::enemies::{ChaserConfig, NavCommand};
use hopper_platformer::lifecycle::DamageCause;
use hopper_platformer::round_clock::RoundClockConfig;
use hopper_platformer::world::{Pickup, PickupKind};
use hopper_platformer::{Contact, LevelEvent};

use common::{TestLevel, holding_right, idle, level, level_with, run};

fn short_round(secs: f32) -> TestLevel {
    level_with(LevelConfig {
        clock: RoundClockConfig {
            duration_secs: secs,
            ..Default::default()
        },
        ..Default::default()
    })
}

/// Tick until the time-up cue shows up. Returns the number of ticks taken.
fn tick_until_time_up(level: &mut TestLevel, dt: f32) -> usize {
    for n in 1..=1000 {
        level.tick(dt, &holding_right());
        if level.presentation().count(Cue::TimeUp) > 0 {
            return n;
        }
    }
    panic!("time never ran out");
}

#[test]
fn countdown_cues_each_second_once() {
    let mut level = short_round(8.0);
    tick_until_time_up(&mut level, 0.05);

    let ticks: Vec<_> = level
        .presentation()
        .cues
        .iter()
        .filter_map(|c| match c {
            Cue::CountdownTick(n) => Some(*n),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![5, 4, 3, 2, 1]);
    assert_eq!(level.presentation().count(Cue::CountdownStarted), 1);
}

#[test]
fn time_up_pauses_sim_then_kills_after_one_real_second() {
    let mut level = short_round(2.0);
    tick_until_time_up(&mut level, 0.1);

    assert_eq!(level.time_scale(), 0.0);
    let walked = level.physics().vx_history.len();
    let remaining = level.clock().remaining();

    let events = run(&mut level, 9, 0.1, holding_right());
    assert!(events.is_empty(), "Still inside the pause: {events:?}");
    assert_eq!(level.presentation().count(Cue::Death), 0);
    assert_eq!(level.physics().vx_history.len(), walked, "Sim time frozen");
    assert_eq!(level.clock().remaining(), remaining);

    let events = level.tick(0.1, &holding_right());
    assert_eq!(
        events,
        vec![LevelEvent::PlayerDied {
            cause: DamageCause::TimeUp
        }]
    );
    assert_eq!(level.time_scale(), 1.0);
    assert_eq!(level.presentation().count(Cue::TimeUp), 1);

    run(&mut level, 5, 0.1, idle());
    assert_eq!(level.presentation().count(Cue::Respawned), 1);
    assert!(!level.clock().timed_out());
    assert!(level.clock().remaining() > 1.0);
}

#[test]
fn death_during_time_up_pause_still_respawns() {
    let mut level = short_round(2.0);
    tick_until_time_up(&mut level, 0.1);

    assert!(level.damage(DamageCause::Trap));
    assert_eq!(level.time_scale(), 1.0);

    run(&mut level, 10, 0.1, idle());
    assert_eq!(level.presentation().count(Cue::Death), 1, "Time-up kill dropped");
    assert_eq!(level.presentation().count(Cue::Respawned), 1);
}

#[test]
fn clock_pauses_while_dying() {
    let mut level = level();
    level.tick(1.0, &idle());
    level.damage(DamageCause::Trap);
    level.tick(0.3, &idle());
    assert_eq!(level.clock().remaining(), 59.0);
    assert!(!level.clock().is_running());
}

#[test]
fn goal_scores_stars_and_time() {
    let mut level = level();
    let star = level
        .world_mut()
        .add_pickup(Pickup::new(PickupKind::Star, Vec2::new(1.0, 0.0)));
    level.contact(Contact::Pickup(star));
    level.tick(15.5, &idle());

    level.contact(Contact::Goal);
    assert_eq!(
        level.take_events(),
        vec![LevelEvent::LevelComplete {
            stars: 1,
            time_remaining: 44.5,
            score: 545,
        }]
    );
    assert_eq!(level.presentation().count(Cue::LevelComplete), 1);

    // Finished: walking input and hazards are ignored
    level.tick(0.1, &holding_right());
    level.contact(Contact::Trap);
    assert!(level.lifecycle().is_alive());
    assert_eq!(level.physics().vx, 0.0);
    assert_eq!(level.clock().remaining(), 44.5);
}

#[test]
fn goal_during_time_up_pause_cancels_the_kill() {
    let mut level = short_round(1.0);
    tick_until_time_up(&mut level, 0.1);
    assert_eq!(level.time_scale(), 0.0);

    level.contact(Contact::Goal);
    assert!(level.is_completed());
    assert_eq!(level.time_scale(), 1.0);

    run(&mut level, 15, 0.1, idle());
    assert!(level.lifecycle().is_alive());
    assert_eq!(level.lifecycle().deaths(), 0);
    assert_eq!(level.presentation().count(Cue::Death), 0);
    assert_eq!(level.presentation().count(Cue::Respawned), 0);
    assert_eq!(level.world().reset_count(), 0);
    assert!(!level.damage(DamageCause::TimeUp), "Finished levels can't be lost");
}

#[test]
fn chasers_steer_through_level_events() {
    let mut level = level_with(LevelConfig {
        layout: hopper_platformer::config::LevelLayout {
            enemies: vec![EnemySpawn::Chaser {
                at: Vec2::new(6.0, 0.0),
                chaser: ChaserConfig::default(),
            }],
            pickups: Vec::new(),
        },
        ..Default::default()
    });

    let events = level.tick(0.1, &idle());
    assert!(matches!(
        events.as_slice(),
        [LevelEvent::Steer {
            enemy: 0,
            command: NavCommand::MoveTo { target, .. },
        }] if *target == Vec2::ZERO
    ));

    level.set_player_on_navmesh(false);
    let events = level.tick(0.1, &idle());
    assert_eq!(
        events,
        vec![LevelEvent::Steer {
            enemy: 0,
            command: NavCommand::Stop,
        }]
    );
}

#[test]
fn snapshot_reflects_level_state() {
    let mut level = level();
    level.activate_powerup();
    level.tick(1.0, &idle());

    let snapshot = level.snapshot();
    assert_eq!(snapshot.time_remaining, 59.0);
    assert_eq!(snapshot.powerup_remaining, Some(2.0));
    assert_eq!(snapshot.deaths, 0);
    assert!(!snapshot.completed);
}
