//! Fire-and-forget presentation requests emitted by the simulation.

use glam::Vec2;

use crate::{EnemyId, EnemyTypeId, ProjectileId, StatusKind, TowerId, TowerKind};

/// Visual and audio requests that never influence simulation outcomes.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    /// An enemy entered the battlefield.
    EnemyAppeared {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Type of the enemy.
        kind: EnemyTypeId,
        /// Spawn position.
        position: Vec2,
        /// Visual scale factor.
        size: f32,
    },
    /// An enemy moved to a new position.
    EnemyMoved {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Position after the move.
        position: Vec2,
    },
    /// An enemy took damage.
    EnemyHit {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Damage dealt.
        amount: f32,
    },
    /// An enemy recovered hit points from an ally.
    EnemyHealed {
        /// Identifier of the healed enemy.
        enemy: EnemyId,
        /// Hit points restored.
        amount: f32,
    },
    /// A status effect expired and its tint should be cleared.
    TintCleared {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Effect that expired.
        status: StatusKind,
    },
    /// An enemy should no longer be drawn.
    EnemyRemoved {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// A tower fired a projectile.
    ProjectileLaunched {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Launch position.
        from: Vec2,
    },
    /// A projectile connected with its target.
    ProjectileImpact {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Impact position.
        at: Vec2,
    },
    /// A projectile should no longer be drawn.
    ProjectileRemoved {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// A splash burst went off.
    SplashBurst {
        /// Burst centre.
        at: Vec2,
        /// Burst radius.
        radius: f32,
    },
    /// A lightning bolt jumped between two points.
    LightningArc {
        /// Origin of the arc.
        from: Vec2,
        /// Destination of the arc.
        to: Vec2,
    },
    /// A barracks soldier struck an enemy.
    SoldierStrike {
        /// Tower that owns the soldiers.
        tower: TowerId,
        /// Enemy that was struck.
        enemy: EnemyId,
    },
    /// A support tower pulsed its aura.
    AuraPulse {
        /// Tower that pulsed.
        tower: TowerId,
        /// Aura radius.
        radius: f32,
    },
    /// A tower changed appearance after being built or upgraded.
    TowerAppearance {
        /// Identifier of the tower.
        tower: TowerId,
        /// Kind of the tower.
        kind: TowerKind,
        /// Zero-based tier.
        level: usize,
    },
    /// A tower was removed from the map.
    TowerRemoved {
        /// Identifier of the tower.
        tower: TowerId,
    },
    /// A meteor struck the battlefield.
    MeteorImpact {
        /// Impact point.
        at: Vec2,
        /// Blast radius.
        radius: f32,
    },
}

/// Receiver of presentation cues, implemented by renderers and audio layers.
pub trait Presentation {
    /// Handles a single cue.
    fn cue(&mut self, cue: &Cue);
}

/// Presentation layer that discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn cue(&mut self, _cue: &Cue) {}
}

impl Presentation for Vec<Cue> {
    fn cue(&mut self, cue: &Cue) {
        self.push(cue.clone());
    }
}
