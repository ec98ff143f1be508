#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battlefield state for Arcane Defenders.
//!
//! The world owns every entity in play: the map, the route, the enemy roster,
//! the towers and the projectiles in flight. Systems borrow the pieces they
//! need through [`World::parts_mut`] and report observable changes into an
//! [`Outbox`]. Removal of dead enemies and spent projectiles is always
//! deferred to explicit sweep steps.

mod enemies;
mod projectiles;
mod status;
mod towers;

use arcane_defenders_core::{
    CellCoord, CellKind, Cue, EnemyId, Event, MapGrid, Outbox, PlacementError, Route,
    ScaledEnemyStats, TowerId, TowerKind, UpgradeError, Vec2,
};

pub use enemies::{Enemy, EnemyRoster, EnemyState, TargetingProfile};
pub use projectiles::{Launch, Projectile, ProjectileSet};
pub use status::{StatusEffects, TimedEffect};
pub use towers::{Tower, TowerRegistry};

/// Represents the authoritative Arcane Defenders battlefield.
#[derive(Clone, Debug)]
pub struct World {
    grid: MapGrid,
    route: Route,
    enemies: EnemyRoster,
    towers: TowerRegistry,
    projectiles: ProjectileSet,
}

/// Disjoint mutable borrows of the world used by systems during a tick.
#[derive(Debug)]
pub struct WorldParts<'a> {
    /// Route enemies follow.
    pub route: &'a Route,
    /// Enemies in spawn order.
    pub enemies: &'a mut EnemyRoster,
    /// Towers in placement order.
    pub towers: &'a mut TowerRegistry,
    /// Projectiles in launch order.
    pub projectiles: &'a mut ProjectileSet,
}

impl World {
    /// Creates an empty battlefield over the provided map and route.
    #[must_use]
    pub fn new(grid: MapGrid, route: Route) -> Self {
        Self {
            grid,
            route,
            enemies: EnemyRoster::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectileSet::new(),
        }
    }

    /// Splits the world into independently borrowable parts.
    pub fn parts_mut(&mut self) -> WorldParts<'_> {
        WorldParts {
            route: &self.route,
            enemies: &mut self.enemies,
            towers: &mut self.towers,
            projectiles: &mut self.projectiles,
        }
    }

    /// Checks whether a tower could stand on the cell, ignoring cost and unlocks.
    ///
    /// # Errors
    ///
    /// Returns the first terrain or occupancy rule the cell violates.
    pub fn check_placement(&self, cell: CellCoord) -> Result<(), PlacementError> {
        match self.grid.get(cell) {
            None => Err(PlacementError::OutOfBounds),
            Some(CellKind::Build) if self.towers.at(cell).is_some() => {
                Err(PlacementError::Occupied)
            }
            Some(CellKind::Build) => Ok(()),
            Some(_) => Err(PlacementError::NotBuildable),
        }
    }

    /// Builds a tower on a free build spot.
    ///
    /// # Errors
    ///
    /// Returns the placement rule the cell violates.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        out: &mut Outbox,
    ) -> Result<TowerId, PlacementError> {
        self.check_placement(cell)?;
        let tower = self
            .towers
            .insert(kind, cell)
            .ok_or(PlacementError::Occupied)?;
        out.emit(Event::TowerPlaced { tower, kind, cell });
        out.cue(Cue::TowerAppearance {
            tower,
            kind,
            level: 0,
        });
        Ok(tower)
    }

    /// Advances a tower to its next tier without touching the player's purse.
    ///
    /// # Errors
    ///
    /// Returns an error when the tower is missing or already at its top tier.
    pub fn upgrade_tower(&mut self, id: TowerId, out: &mut Outbox) -> Result<usize, UpgradeError> {
        let tower = self.towers.get_mut(id).ok_or(UpgradeError::MissingTower)?;
        if !tower.upgrade() {
            return Err(UpgradeError::MaxLevel);
        }
        let level = tower.level();
        out.emit(Event::TowerUpgraded { tower: id, level });
        out.cue(Cue::TowerAppearance {
            tower: id,
            kind: tower.kind(),
            level,
        });
        Ok(level)
    }

    /// Removes a tower and returns the refund owed for it.
    pub fn sell_tower(&mut self, id: TowerId, out: &mut Outbox) -> Option<u32> {
        let tower = self.towers.remove(id)?;
        let refund = tower.sell_value();
        out.emit(Event::TowerSold {
            tower: id,
            cell: tower.cell(),
            refund,
        });
        out.cue(Cue::TowerRemoved { tower: id });
        Some(refund)
    }

    /// Spawns an enemy at the head of the route shifted by `offset`.
    ///
    /// Returns `None` when the route has no points.
    pub fn spawn_enemy(
        &mut self,
        stats: ScaledEnemyStats,
        offset: Vec2,
        out: &mut Outbox,
    ) -> Option<EnemyId> {
        let start = self.route.point(0)?;
        Some(self.enemies.spawn(stats, start + offset, out))
    }

    /// Clears per-tick aura bonuses on towers and stealth reveals on enemies.
    pub fn reset_buffs(&mut self) {
        for tower in self.towers.iter_mut() {
            tower.reset_buffs();
        }
        for enemy in self.enemies.as_mut_slice() {
            enemy.conceal();
        }
    }

    /// Drops enemies that died or leaked.
    pub fn reap_enemies(&mut self) -> usize {
        self.enemies.reap()
    }

    /// Drops projectiles that hit or fizzled.
    pub fn sweep_projectiles(&mut self) {
        self.projectiles.sweep();
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use arcane_defenders_core::{CellCoord, EnemyId, MapGrid, Route, TowerId};

    use super::{Enemy, Projectile, Tower, World};

    /// Provides read-only access to the map.
    #[must_use]
    pub fn grid(world: &World) -> &MapGrid {
        &world.grid
    }

    /// Provides read-only access to the route.
    #[must_use]
    pub fn route(world: &World) -> &Route {
        &world.route
    }

    /// Enemies in spawn order, including ones awaiting reaping.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        world.enemies.as_slice()
    }

    /// Looks up an enemy by identifier.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<&Enemy> {
        world.enemies.get(id)
    }

    /// Number of enemies still alive.
    #[must_use]
    pub fn living_enemy_count(world: &World) -> usize {
        world
            .enemies
            .as_slice()
            .iter()
            .filter(|enemy| enemy.is_alive())
            .count()
    }

    /// Towers in placement order.
    pub fn towers(world: &World) -> impl Iterator<Item = &Tower> {
        world.towers.iter()
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<&Tower> {
        world.towers.get(id)
    }

    /// Identifier of the tower standing on the cell.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.at(cell)
    }

    /// Projectiles in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        world.projectiles.as_slice()
    }
}
