//! Projectiles in flight.

use arcane_defenders_core::{EnemyId, ProjectileId, TowerId, TowerTier, Vec2};

/// A homing projectile carrying the damage computed when it was fired.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    source: TowerId,
    target: EnemyId,
    position: Vec2,
    speed: f32,
    damage: f32,
    tier: TowerTier,
    spent: bool,
}

impl Projectile {
    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Tower that fired the projectile.
    #[must_use]
    pub const fn source(&self) -> TowerId {
        self.source
    }

    /// Enemy the projectile homes in on.
    #[must_use]
    pub const fn target(&self) -> EnemyId {
        self.target
    }

    /// Current pixel position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the projectile to a new position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Flight speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Damage dealt to the primary target, aura bonuses included.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Tier of the tower at the moment it fired.
    #[must_use]
    pub const fn tier(&self) -> &TowerTier {
        &self.tier
    }

    /// Reports whether the projectile hit or fizzled.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.spent
    }

    /// Marks the projectile for removal.
    pub fn spend(&mut self) {
        self.spent = true;
    }
}

/// Parameters describing a freshly fired projectile.
#[derive(Clone, Copy, Debug)]
pub struct Launch {
    /// Tower that fired.
    pub source: TowerId,
    /// Enemy to home in on.
    pub target: EnemyId,
    /// Spawn position.
    pub origin: Vec2,
    /// Flight speed in pixels per second.
    pub speed: f32,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Tier of the firing tower.
    pub tier: TowerTier,
}

/// Projectiles in launch order.
#[derive(Clone, Debug, Default)]
pub struct ProjectileSet {
    entries: Vec<Projectile>,
    next_projectile_id: u32,
}

impl ProjectileSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a projectile and returns its identifier.
    pub fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.entries.push(Projectile {
            id,
            source: launch.source,
            target: launch.target,
            position: launch.origin,
            speed: launch.speed,
            damage: launch.damage,
            tier: launch.tier,
            spent: false,
        });
        id
    }

    /// Projectiles in launch order.
    #[must_use]
    pub fn as_slice(&self) -> &[Projectile] {
        &self.entries
    }

    /// Mutable projectiles in launch order.
    pub fn as_mut_slice(&mut self) -> &mut [Projectile] {
        &mut self.entries
    }

    /// Number of projectiles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no projectiles are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops spent projectiles.
    pub fn sweep(&mut self) {
        self.entries.retain(|projectile| !projectile.is_spent());
    }
}
