//! Player life-cycle scenarios driven through the public `Level` API with
//! recording collaborators.

#[allow(dead_code)]
mod common;

use hopper_core::{Cue, Damageable, Vec2};
use hopper_platformer::enemies::{PatrolConfig, PatrolEnemy};
use hopper_platformer::lifecycle::{DamageCause, LifePhase};
use hopper_platformer::world::{Pickup, PickupKind};
use hopper_platformer::{Contact, LevelEvent};

use common::{DT, holding_right, idle, jump, level, run};

#[test]
fn grounded_walk_is_pinned_to_base_speed() {
    let mut level = level();
    run(&mut level, 10, DT, holding_right());

    let history = &level.physics().vx_history;
    assert_eq!(history.len(), 10);
    assert!(history.iter().all(|&vx| vx == 1.2), "No air blend: {history:?}");
}

#[test]
fn death_is_idempotent() {
    let mut level = level();
    let enemy = level
        .world_mut()
        .add_enemy(PatrolEnemy::new(Vec2::new(1.0, 0.0), PatrolConfig::default()));

    assert!(level.damage(DamageCause::Trap));
    assert!(!level.damage(DamageCause::Trap));
    level.contact(Contact::Trap);
    level.contact(Contact::Hostile {
        enemy,
        normal: Vec2::new(1.0, 0.0),
    });

    assert_eq!(level.presentation().count(Cue::Death), 1);
    assert_eq!(level.physics().freezes, 1);
    assert_eq!(level.lifecycle().deaths(), 1);

    run(&mut level, 100, 0.1, idle());
    assert_eq!(level.presentation().count(Cue::Respawned), 1, "One respawn timer");
    assert_eq!(level.world().reset_count(), 1, "One world reset");
}

#[test]
fn respawn_waits_for_delay_then_restores_player() {
    let mut level = level();
    level.physics_mut().position = Vec2::new(7.0, 3.0);
    level.damage(DamageCause::Trap);

    level.tick(0.49, &idle());
    assert!(matches!(level.lifecycle().phase(), LifePhase::Dying { .. }));
    assert!(level.physics().frozen);

    let events = level.tick(0.01, &idle());
    assert!(events.contains(&LevelEvent::PlayerRespawned));
    assert_eq!(level.lifecycle().phase(), LifePhase::Alive);
    assert_eq!(level.physics().position, Vec2::ZERO, "Back at spawn");
    assert!(!level.physics().frozen);
    assert!(level.clock().remaining() > 59.9, "Clock restarted");
}

#[test]
fn stars_reset_on_respawn() {
    let mut level = level();
    let stars: Vec<_> = (0..3)
        .map(|i| {
            level
                .world_mut()
                .add_pickup(Pickup::new(PickupKind::Star, Vec2::new(i as f32, 1.0)))
        })
        .collect();

    level.contact(Contact::Pickup(stars[0]));
    level.contact(Contact::Pickup(stars[1]));
    level.contact(Contact::Pickup(stars[1]));
    assert_eq!(level.stars(), 2);
    assert_eq!(level.presentation().count(Cue::StarCollected), 2);

    level.damage(DamageCause::Enemy);
    run(&mut level, 10, 0.1, idle());

    assert_eq!(level.stars(), 0);
    assert!(
        level
            .world()
            .pickups()
            .all(|(_, pickup)| pickup.is_active()),
        "Collected stars are back"
    );
}

#[test]
fn stomp_defeats_enemy_and_rebounds() {
    let mut level = level();
    let enemy = level
        .world_mut()
        .add_enemy(PatrolEnemy::new(Vec2::new(1.0, 0.0), PatrolConfig::default()));

    level.contact(Contact::Hostile {
        enemy,
        normal: Vec2::new(0.1, 0.9),
    });

    assert!(level.lifecycle().is_alive());
    assert!(level.world().enemy(enemy).is_some_and(|e| e.is_dead()));
    assert_eq!(level.physics().vertical_cancels, 1);
    assert_eq!(level.physics().impulses, vec![Vec2::new(0.0, 4.0)]);
    assert_eq!(level.presentation().count(Cue::EnemyDefeated), 1);
    assert_eq!(
        level.take_events(),
        vec![LevelEvent::EnemyDefeated { enemy }]
    );

    // Touching the corpse again does nothing
    level.contact(Contact::Hostile {
        enemy,
        normal: Vec2::new(1.0, 0.0),
    });
    assert!(level.lifecycle().is_alive());
}

#[test]
fn side_hit_kills_player() {
    for normal in [Vec2::new(0.95, 0.3), Vec2::new(0.0, 0.5)] {
        let mut level = level();
        let enemy = level
            .world_mut()
            .add_enemy(PatrolEnemy::new(Vec2::new(1.0, 0.0), PatrolConfig::default()));

        level.contact(Contact::Hostile { enemy, normal });

        assert!(!level.lifecycle().is_alive(), "normal {normal:?} must kill");
        assert!(level.world().enemy(enemy).is_some_and(|e| !e.is_dead()));
        assert_eq!(
            level.take_events(),
            vec![LevelEvent::PlayerDied {
                cause: DamageCause::Enemy
            }]
        );
    }
}

#[test]
fn defeated_enemy_returns_after_ten_seconds() {
    let mut level = level();
    let enemy = level
        .world_mut()
        .add_enemy(PatrolEnemy::new(Vec2::new(1.0, 0.0), PatrolConfig::default()));
    level.contact(Contact::Hostile {
        enemy,
        normal: Vec2::new(0.0, 1.0),
    });

    run(&mut level, 99, 0.1, idle());
    assert!(level.world().enemy(enemy).is_some_and(|e| e.is_dead()));
    run(&mut level, 2, 0.1, idle());
    assert!(level.world().enemy(enemy).is_some_and(|e| !e.is_dead()));
}

#[test]
fn player_death_brings_defeated_enemies_back_at_once() {
    let mut level = level();
    let enemy = level
        .world_mut()
        .add_enemy(PatrolEnemy::new(Vec2::new(1.0, 0.0), PatrolConfig::default()));
    level.contact(Contact::Hostile {
        enemy,
        normal: Vec2::new(0.0, 1.0),
    });

    level.damage(DamageCause::Trap);
    run(&mut level, 5, 0.1, idle());

    assert!(level.world().enemy(enemy).is_some_and(|e| !e.is_dead()));
    assert!(!level.world().registry().is_pending(enemy), "Pending timer dropped");
}

#[test]
fn powerup_retrigger_restarts_duration() {
    let mut level = level();
    let first = level
        .world_mut()
        .add_pickup(Pickup::new(PickupKind::PowerUp, Vec2::new(1.0, 0.0)));
    let second = level
        .world_mut()
        .add_pickup(Pickup::new(PickupKind::PowerUp, Vec2::new(2.0, 0.0)));

    level.contact(Contact::Pickup(first));
    level.tick(2.0, &idle());
    level.contact(Contact::Pickup(second));
    assert_eq!(
        level
            .presentation()
            .count_matching(|c| matches!(c, Cue::PowerUpStart { .. })),
        2
    );

    level.tick(2.5, &idle());
    assert!(level.powerup_active(), "Old deadline no longer applies");
    assert_eq!(level.motion().state().multiplier, 1.4);

    level.tick(0.5, &idle());
    assert!(!level.powerup_active());
    assert_eq!(level.motion().state().multiplier, 1.0);
    assert_eq!(level.presentation().count(Cue::PowerUpEnd), 1, "One expiry");

    run(&mut level, 10, 1.0, idle());
    assert_eq!(level.presentation().count(Cue::PowerUpEnd), 1);
}

#[test]
fn boosted_walk_is_faster() {
    let mut level = level();
    level.activate_powerup();
    level.tick(DT, &holding_right());
    assert!((level.physics().vx - 1.68).abs() < 1e-5);
}

#[test]
fn powerup_reverted_before_death_cue() {
    let mut level = level();
    level.activate_powerup();
    level.damage(DamageCause::Trap);

    let cues = level.presentation();
    let end = cues.position_of(Cue::PowerUpEnd).unwrap();
    let death = cues.position_of(Cue::Death).unwrap();
    assert!(end < death);
    assert_eq!(level.motion().state().multiplier, 1.0);
    assert!(!level.powerup_active());

    run(&mut level, 50, 0.1, idle());
    assert_eq!(level.presentation().count(Cue::PowerUpEnd), 1, "No late expiry");
}

#[test]
fn jump_presses_ignored_while_dead() {
    let mut level = level();
    level.damage(DamageCause::Trap);
    run(&mut level, 5, 0.1, jump());
    assert_eq!(level.presentation().count(Cue::Respawned), 1);

    run(&mut level, 3, DT, idle());
    assert_eq!(level.presentation().count(Cue::Jump), 0);
    assert!(level.physics().impulses.is_empty());
}

#[test]
fn buffered_jump_lands() {
    let mut level = level();
    level.physics_mut().grounded = false;
    level.tick(0.05, &jump());
    level.tick(0.05, &idle());
    assert!(level.physics().impulses.is_empty());

    level.physics_mut().grounded = true;
    level.tick(0.016, &idle());
    assert_eq!(level.presentation().count(Cue::Jump), 1);
}
