use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hopper_core::{Damageable, Respawnable, Vec2};

use crate::enemies::{Enemy, NavCommand, PlayerView};
use crate::respawn::{ObjectId, ObjectKind, RespawnConfig, RespawnRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Star,
    PowerUp,
}

impl PickupKind {
    fn object_kind(self) -> ObjectKind {
        match self {
            PickupKind::Star => ObjectKind::Collectible,
            PickupKind::PowerUp => ObjectKind::PowerUp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    spawn: Vec2,
    position: Vec2,
    active: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, position: Vec2) -> Self {
        Self {
            kind,
            spawn: position,
            position,
            active: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Take the pickup out of the world. Returns false if it was already gone.
    pub fn collect(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

impl Respawnable for Pickup {
    fn respawn(&mut self) {
        self.position = self.spawn;
        self.active = true;
    }

    fn spawn_position(&self) -> Vec2 {
        self.spawn
    }
}

/// Every respawnable object in the level.
#[derive(Debug, Clone, Default)]
pub struct World {
    enemies: BTreeMap<ObjectId, Enemy>,
    pickups: BTreeMap<ObjectId, Pickup>,
    registry: RespawnRegistry,
    next_id: ObjectId,
    resets: u32,
}

impl World {
    pub fn new(config: RespawnConfig) -> Self {
        Self {
            registry: RespawnRegistry::new(config),
            ..Default::default()
        }
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_enemy(&mut self, enemy: impl Into<Enemy>) -> ObjectId {
        let enemy = enemy.into();
        let id = self.allocate_id();
        self.registry.track(id, enemy.spawn_position());
        self.enemies.insert(id, enemy);
        id
    }

    pub fn add_pickup(&mut self, pickup: Pickup) -> ObjectId {
        let id = self.allocate_id();
        self.registry.track(id, pickup.spawn_position());
        self.pickups.insert(id, pickup);
        id
    }

    pub fn enemy(&self, id: ObjectId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Mutable access, e.g. to report navmesh-resolved chaser positions.
    pub fn enemy_mut(&mut self, id: ObjectId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    pub fn pickup(&self, id: ObjectId) -> Option<&Pickup> {
        self.pickups.get(&id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = (ObjectId, &Enemy)> {
        self.enemies.iter().map(|(id, e)| (*id, e))
    }

    pub fn pickups(&self) -> impl Iterator<Item = (ObjectId, &Pickup)> {
        self.pickups.iter().map(|(id, p)| (*id, p))
    }

    pub fn registry(&self) -> &RespawnRegistry {
        &self.registry
    }

    /// Number of `reset_all` broadcasts so far.
    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    /// Restore objects whose respawn delay ran out, then move the enemies.
    /// Returns the steering commands issued by chasers this step.
    pub fn tick(&mut self, dt: f32, player: &PlayerView) -> Vec<(ObjectId, NavCommand)> {
        for (id, origin) in self.registry.tick(dt) {
            self.restore(id);
            tracing::debug!(id, x = origin.x, y = origin.y, "Object respawned");
        }

        self.enemies
            .iter_mut()
            .filter_map(|(id, enemy)| enemy.tick(dt, player).map(|cmd| (*id, cmd)))
            .collect()
    }

    fn restore(&mut self, id: ObjectId) {
        if let Some(enemy) = self.enemies.get_mut(&id) {
            enemy.respawn();
        } else if let Some(pickup) = self.pickups.get_mut(&id) {
            pickup.respawn();
        }
    }

    /// Kill an enemy and schedule its return. Returns false if it is
    /// unknown or already dead.
    pub fn defeat_enemy(&mut self, id: ObjectId) -> bool {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return false;
        };
        if enemy.is_dead() {
            return false;
        }
        enemy.die();
        let position = enemy.position();
        self.registry.schedule_respawn(id, ObjectKind::Enemy, position);
        true
    }

    /// Take a pickup. Powerups come back after their delay; stars only
    /// return with a full reset. `None` if unknown or already taken.
    pub fn collect(&mut self, id: ObjectId) -> Option<PickupKind> {
        let pickup = self.pickups.get_mut(&id)?;
        if !pickup.collect() {
            return None;
        }
        let kind = pickup.kind;
        if kind == PickupKind::PowerUp {
            let position = pickup.position();
            self.registry.schedule_respawn(id, kind.object_kind(), position);
        }
        Some(kind)
    }

    /// Cancel all pending object timers and put every object back at its
    /// origin.
    pub fn reset_all(&mut self) {
        let restored = self.registry.reset_all();
        for (id, _) in &restored {
            self.restore(*id);
        }
        self.resets += 1;
        tracing::debug!(objects = restored.len(), resets = self.resets, "World reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::{ChaserConfig, ChaserEnemy, PatrolConfig, PatrolEnemy};

    fn idle_player() -> PlayerView {
        PlayerView {
            position: Vec2::new(100.0, 0.0),
            crouching: false,
            on_navmesh: true,
        }
    }

    fn patrol_at(x: f32) -> PatrolEnemy {
        PatrolEnemy::new(Vec2::new(x, 0.0), PatrolConfig::default())
    }

    #[test]
    fn defeated_enemy_returns_after_delay() {
        let mut world = World::default();
        let id = world.add_enemy(patrol_at(2.0));

        assert!(world.defeat_enemy(id));
        assert!(!world.defeat_enemy(id), "Already dead");
        assert!(world.registry().is_pending(id));

        world.tick(9.5, &idle_player());
        assert!(world.enemy(id).is_some_and(|e| e.is_dead()));
        world.tick(0.5, &idle_player());
        assert!(world.enemy(id).is_some_and(|e| !e.is_dead()));
    }

    #[test]
    fn powerup_respawns_but_star_waits_for_reset() {
        let mut world = World::default();
        let star = world.add_pickup(Pickup::new(PickupKind::Star, Vec2::new(1.0, 1.0)));
        let boost = world.add_pickup(Pickup::new(PickupKind::PowerUp, Vec2::new(2.0, 1.0)));

        assert_eq!(world.collect(star), Some(PickupKind::Star));
        assert_eq!(world.collect(star), None, "Cannot collect twice");
        assert_eq!(world.collect(boost), Some(PickupKind::PowerUp));

        world.tick(10.0, &idle_player());
        assert!(world.pickup(boost).is_some_and(Pickup::is_active));
        assert!(world.pickup(star).is_some_and(|p| !p.is_active()));

        world.reset_all();
        assert!(world.pickup(star).is_some_and(Pickup::is_active));
    }

    #[test]
    fn reset_restores_everything_and_cancels_timers() {
        let mut world = World::default();
        let enemy = world.add_enemy(patrol_at(0.0));
        let boost = world.add_pickup(Pickup::new(PickupKind::PowerUp, Vec2::ZERO));
        world.defeat_enemy(enemy);
        world.collect(boost);

        world.reset_all();
        assert_eq!(world.reset_count(), 1);
        assert!(world.enemy(enemy).is_some_and(|e| !e.is_dead()));
        assert!(world.pickup(boost).is_some_and(Pickup::is_active));
        assert!(!world.registry().is_pending(enemy));
        assert!(!world.registry().is_pending(boost));
    }

    #[test]
    fn enemies_return_to_origin_on_reset() {
        let mut world = World::default();
        let id = world.add_enemy(PatrolEnemy::new(
            Vec2::ZERO,
            PatrolConfig {
                offset: Vec2::new(5.0, 0.0),
                ..Default::default()
            },
        ));
        world.tick(1.0, &idle_player());
        assert!(world.enemy(id).is_some_and(|e| e.position() != Vec2::ZERO));

        world.reset_all();
        assert_eq!(world.enemy(id).map(Enemy::position), Some(Vec2::ZERO));
    }

    #[test]
    fn chasers_report_steering() {
        let mut world = World::default();
        world.add_enemy(patrol_at(0.0));
        let chaser = world.add_enemy(ChaserEnemy::new(Vec2::ZERO, ChaserConfig::default()));

        let commands = world.tick(0.1, &idle_player());
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].0, chaser);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut world = World::default();
        assert!(!world.defeat_enemy(42));
        assert_eq!(world.collect(42), None);
    }
}
