//! Enemy instances and the roster that owns them.

use std::time::Duration;

use arcane_defenders_core::{
    Cue, EnemyId, EnemyTypeId, Event, Outbox, Route, ScaledEnemyStats, StatusKind, Vec2,
};

use crate::status::StatusEffects;

/// Lifecycle of an enemy. Both terminal states are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Alive and walking the route.
    Traversing,
    /// Killed by damage.
    Dead,
    /// Leaked through the end of the route.
    ReachedEnd,
}

/// Capabilities of an attacker that decide which enemies it may target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetingProfile {
    /// Whether flying enemies may be targeted.
    pub can_target_flying: bool,
    /// Whether stealthed enemies may be targeted without being revealed.
    pub can_reveal: bool,
}

/// A live enemy walking the route.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    stats: ScaledEnemyStats,
    hp: f32,
    position: Vec2,
    waypoint: usize,
    state: EnemyState,
    status: StatusEffects,
    revealed: bool,
    since_last_heal: Duration,
}

impl Enemy {
    /// Creates an enemy at full health standing on the provided position.
    #[must_use]
    pub fn new(id: EnemyId, stats: ScaledEnemyStats, position: Vec2) -> Self {
        Self {
            id,
            hp: stats.max_hp as f32,
            stats,
            position,
            waypoint: 0,
            state: EnemyState::Traversing,
            status: StatusEffects::new(),
            revealed: false,
            since_last_heal: Duration::MAX,
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Type the enemy was spawned from.
    #[must_use]
    pub fn type_id(&self) -> &EnemyTypeId {
        &self.stats.type_id
    }

    /// Wave-scaled statistics.
    #[must_use]
    pub fn stats(&self) -> &ScaledEnemyStats {
        &self.stats
    }

    /// Current hit points. May drop below zero on the killing blow.
    #[must_use]
    pub const fn hp(&self) -> f32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub fn max_hp(&self) -> f32 {
        self.stats.max_hp as f32
    }

    /// Current pixel position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the enemy to a new pixel position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Index of the route point the enemy last passed.
    #[must_use]
    pub const fn waypoint(&self) -> usize {
        self.waypoint
    }

    /// Marks the next route point as passed and returns the new index.
    pub fn advance_waypoint(&mut self) -> usize {
        self.waypoint += 1;
        self.waypoint
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Reports whether the enemy is still walking the route.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Traversing
    }

    /// Reports whether the enemy leaked through the end of the route.
    #[must_use]
    pub fn has_reached_end(&self) -> bool {
        self.state == EnemyState::ReachedEnd
    }

    /// Active status effects.
    #[must_use]
    pub const fn status(&self) -> &StatusEffects {
        &self.status
    }

    /// Mutable access to the active status effects.
    pub fn status_mut(&mut self) -> &mut StatusEffects {
        &mut self.status
    }

    /// Installs a status effect, replacing one of the same kind.
    pub fn apply_status(&mut self, kind: StatusKind, magnitude: f32, duration: Duration) {
        if self.is_alive() {
            self.status.apply(kind, magnitude, duration);
        }
    }

    /// Reports whether a support tower revealed the enemy this tick.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Reveals a stealthed enemy until the next buff reset.
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Hides a stealthed enemy again at the start of a tick.
    pub fn conceal(&mut self) {
        if self.stats.stealth {
            self.revealed = false;
        }
    }

    /// Subtracts hit points and kills the enemy once they run out.
    ///
    /// Returns `true` when this call killed the enemy. Damage against an enemy
    /// that already left play is ignored.
    pub fn take_damage(&mut self, amount: f32, out: &mut Outbox) -> bool {
        if !self.is_alive() {
            return false;
        }

        self.hp -= amount;
        out.cue(Cue::EnemyHit {
            enemy: self.id,
            amount,
        });

        if self.hp <= 0.0 {
            self.die(out);
            return true;
        }
        false
    }

    /// Kills the enemy, emitting the kill event exactly once.
    pub fn die(&mut self, out: &mut Outbox) {
        if !self.is_alive() {
            return;
        }
        self.state = EnemyState::Dead;
        out.emit(Event::EnemyKilled {
            enemy: self.id,
            gold: self.stats.gold,
            position: self.position,
        });
        out.cue(Cue::EnemyRemoved { enemy: self.id });
    }

    /// Marks the enemy as leaked, emitting the leak event exactly once.
    pub fn reach_end(&mut self, out: &mut Outbox) {
        if !self.is_alive() {
            return;
        }
        self.state = EnemyState::ReachedEnd;
        out.emit(Event::EnemyReachedEnd {
            enemy: self.id,
            damage: self.stats.damage,
        });
        out.cue(Cue::EnemyRemoved { enemy: self.id });
    }

    /// Restores hit points up to the maximum and returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp());
        self.hp - before
    }

    /// Advances the heal cooldown and reports whether a heal pulse is due.
    pub fn heal_pulse_due(&mut self, delta: Duration, period: Duration) -> bool {
        self.since_last_heal = self.since_last_heal.saturating_add(delta);
        if self.since_last_heal >= period {
            self.since_last_heal = Duration::ZERO;
            return true;
        }
        false
    }

    /// Distance covered along the route, used to rank enemies for targeting.
    #[must_use]
    pub fn path_progress(&self, route: &Route) -> f32 {
        let covered = route.length_to(self.waypoint);
        if self.waypoint + 1 < route.len() {
            if let Some(origin) = route.point(self.waypoint) {
                return covered + origin.distance(self.position);
            }
        }
        covered
    }

    /// Reports whether an attacker with the provided profile may target the enemy.
    #[must_use]
    pub fn is_targetable(&self, profile: TargetingProfile) -> bool {
        if !self.is_alive() {
            return false;
        }
        if self.stats.flying && !profile.can_target_flying {
            return false;
        }
        if self.stats.stealth && !self.revealed && !profile.can_reveal {
            return false;
        }
        true
    }
}

/// Enemies in play, kept in spawn order.
#[derive(Clone, Debug, Default)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
}

impl EnemyRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a freshly spawned enemy and announces it.
    pub fn spawn(&mut self, stats: ScaledEnemyStats, position: Vec2, out: &mut Outbox) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);

        out.emit(Event::EnemySpawned {
            enemy: id,
            kind: stats.type_id.clone(),
            wave: stats.wave,
        });
        out.cue(Cue::EnemyAppeared {
            enemy: id,
            kind: stats.type_id.clone(),
            position,
            size: stats.size,
        });
        self.enemies.push(Enemy::new(id, stats, position));
        id
    }

    /// Enemies in spawn order.
    #[must_use]
    pub fn as_slice(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable enemies in spawn order.
    pub fn as_mut_slice(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Looks up an enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.index_of(id).map(|index| &self.enemies[index])
    }

    /// Looks up an enemy by identifier for mutation.
    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        let index = self.index_of(id)?;
        Some(&mut self.enemies[index])
    }

    /// Position of the enemy within the spawn-ordered slice.
    #[must_use]
    pub fn index_of(&self, id: EnemyId) -> Option<usize> {
        self.enemies.binary_search_by_key(&id, Enemy::id).ok()
    }

    /// Number of enemies still held, including ones awaiting reaping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Reports whether the roster holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Reports whether any held enemy is still alive.
    #[must_use]
    pub fn any_alive(&self) -> bool {
        self.enemies.iter().any(Enemy::is_alive)
    }

    /// Drops every enemy that left play and returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(Enemy::is_alive);
        before - self.enemies.len()
    }
}
