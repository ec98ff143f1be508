#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arcane Defenders simulation.
//!
//! This crate defines the data that flows between the authoritative world,
//! the pure systems and the adapters. Adapters submit [`Command`] values to a
//! session, systems mutate the world during a tick and report every
//! externally observable change as an [`Event`]. Presentation requests are
//! expressed as [`Cue`] values and never feed back into the simulation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod balance;
pub mod enemies;
pub mod grid;
pub mod presentation;
pub mod towers;
pub mod waves;

pub use enemies::{
    Ability, CatalogError, CustomEnemyRecord, EnemyCatalog, EnemyDefinition, EnemyKind,
    EnemyTypeId, ScaledEnemyStats,
};
pub use glam::Vec2;
pub use grid::{CellCoord, CellKind, MapGrid, Route, TILE_SIZE};
pub use presentation::{Cue, NullPresentation, Presentation};
pub use towers::{Special, TargetMode, TierEffect, TowerDefinition, TowerKind, TowerRole, TowerTier};
pub use waves::{LevelDefinition, WaveDefinition, WaveGroup};

/// Unique identifier assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Timed status effects that can be active on an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Fractional speed reduction.
    Slow,
    /// Complete stop.
    Freeze,
    /// Damage over time.
    Burn,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests construction of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Buildable cell that will host the tower.
        cell: CellCoord,
    },
    /// Requests that a tower advance to its next upgrade tier.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that a tower be sold for its refund value.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Marks a tower as selected by the player.
    SelectTower {
        /// Identifier of the tower that was selected.
        tower: TowerId,
    },
    /// Requests that the next wave begin spawning.
    StartNextWave,
    /// Changes the multiplier applied to every tick delta.
    SetGameSpeed {
        /// Multiplier applied uniformly to wall-clock deltas.
        multiplier: f32,
    },
    /// Pauses or resumes the simulation.
    SetPaused {
        /// Whether ticks should be withheld.
        paused: bool,
    },
    /// Drops a meteor on the provided pixel position.
    CastMeteor {
        /// Impact point expressed in pixels.
        at: Vec2,
    },
}

/// Events broadcast by the simulation after processing commands and ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that an enemy entered the route.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Type the enemy was created from.
        kind: EnemyTypeId,
        /// Wave number used to scale the enemy's stats.
        wave: u32,
    },
    /// Reports that an enemy was killed by damage.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Gold bounty carried by the enemy.
        gold: u32,
        /// Position at which the enemy died.
        position: Vec2,
    },
    /// Reports that an enemy reached the end of the route.
    EnemyReachedEnd {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
        /// Lives the enemy costs the player.
        damage: u32,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
    },
    /// Announces that a wave was cleared and more waves remain.
    WaveComplete {
        /// One-based number of the wave that was cleared.
        wave: u32,
    },
    /// Announces that the final wave was cleared.
    AllWavesComplete,
    /// Reports the player's gold after a change.
    GoldChanged {
        /// Gold balance after the change.
        gold: u32,
    },
    /// Reports the player's lives after a change.
    LivesChanged {
        /// Remaining lives after the change.
        lives: u32,
    },
    /// Signals the end of the session.
    GameOver {
        /// Whether the player survived every wave.
        victory: bool,
    },
    /// Reports that the player selected a tower.
    TowerSelected {
        /// Identifier of the selected tower.
        tower: TowerId,
    },
    /// Confirms that a tower was built.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Type of tower that was built.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Confirms that a tower advanced a tier.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Zero-based tier the tower reached.
        level: usize,
    },
    /// Confirms that a tower was sold and its cell freed.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Cell released by the sale.
        cell: CellCoord,
        /// Gold refunded to the player.
        refund: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Reports that a sale targeted a tower that does not exist.
    TowerSaleRejected {
        /// Identifier provided in the sale request.
        tower: TowerId,
    },
    /// Reports that the next wave could not be started.
    WaveStartRejected,
    /// Confirms that a meteor struck the battlefield.
    MeteorCast {
        /// Impact point expressed in pixels.
        at: Vec2,
        /// Number of enemies caught in the blast.
        struck: usize,
    },
    /// Reports that a meteor was requested while on cooldown.
    MeteorRejected {
        /// Cooldown left before the next meteor is available.
        remaining: Duration,
    },
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the map.
    OutOfBounds,
    /// The requested cell is not a build spot.
    NotBuildable,
    /// Another tower already stands on the cell.
    Occupied,
    /// The tower kind is not unlocked on the current level.
    Locked,
    /// The player cannot afford the tower.
    InsufficientGold,
}

/// Reasons a tower upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower already reached its top tier.
    MaxLevel,
    /// The player cannot afford the next tier.
    InsufficientGold,
}

/// Buffer collecting everything a tick reports to the outside world.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    /// Observable simulation events in emission order.
    pub events: Vec<Event>,
    /// Fire-and-forget presentation requests in emission order.
    pub cues: Vec<Cue>,
}

impl Outbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observable event.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Records a presentation request.
    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Empties both buffers while keeping their allocations.
    pub fn clear(&mut self) {
        self.events.clear();
        self.cues.clear();
    }
}

/// Serde helpers that express [`Duration`] values as whole milliseconds.
pub mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes a duration as an integer number of milliseconds.
    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    /// Deserializes an integer number of milliseconds into a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
