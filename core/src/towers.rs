//! Static tower definitions and their upgrade tiers.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    balance::{BARRACKS_STRIKE_PERIOD, DEFAULT_FIRE_RATE},
    CatalogError,
};

/// Enumerates the tower archetypes available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Rapid single-target magic bolts.
    Arcane,
    /// Splash fire that leaves burns.
    Flame,
    /// Bolts that slow and may freeze.
    Frost,
    /// Soldiers that strike and hinder ground enemies.
    Barracks,
    /// Instant lightning that chains between enemies.
    Lightning,
    /// Aura that empowers nearby towers.
    Enchanter,
}

impl TowerKind {
    /// Every tower kind in shop order.
    pub const ALL: [TowerKind; 6] = [
        Self::Arcane,
        Self::Flame,
        Self::Frost,
        Self::Barracks,
        Self::Lightning,
        Self::Enchanter,
    ];

    /// Stable key used to reference the kind in commands and layouts.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Arcane => "arcane",
            Self::Flame => "flame",
            Self::Frost => "frost",
            Self::Barracks => "barracks",
            Self::Lightning => "lightning",
            Self::Enchanter => "enchanter",
        }
    }

    /// Static definition for the kind.
    #[must_use]
    pub fn definition(self) -> &'static TowerDefinition {
        match self {
            Self::Arcane => &ARCANE,
            Self::Flame => &FLAME,
            Self::Frost => &FROST,
            Self::Barracks => &BARRACKS,
            Self::Lightning => &LIGHTNING,
            Self::Enchanter => &ENCHANTER,
        }
    }

    /// Campaign level from which the kind may be built.
    #[must_use]
    pub const fn unlock_level(self) -> u32 {
        match self {
            Self::Arcane | Self::Flame => 1,
            Self::Frost | Self::Barracks => 2,
            Self::Lightning => 3,
            Self::Enchanter => 4,
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TowerKind {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == value)
            .ok_or_else(|| CatalogError::UnknownTower(value.to_owned()))
    }
}

/// Rule used to pick a target among the enemies in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Furthest along the route.
    First,
    /// Least far along the route.
    Last,
    /// Closest to the tower.
    Nearest,
    /// Most current hit points.
    Strongest,
}

/// Named special unlocked by an upgrade tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    /// Display tag on the top arcane tier.
    Piercing,
    /// Display tag on the top flame tier.
    Inferno,
    /// Chance to freeze on projectile hit.
    Freeze,
    /// Display tag on the top barracks tier.
    Shield,
    /// Chance to freeze on projectile or chain hit.
    Stun,
    /// Grants stealth detection to the tower and buffed neighbours.
    Reveal,
    /// Grants stealth detection like [`Special::Reveal`].
    Empower,
}

impl Special {
    /// Reports whether the special lets towers see stealthed enemies.
    #[must_use]
    pub const fn reveals(self) -> bool {
        matches!(self, Self::Reveal | Self::Empower)
    }
}

/// Combat behaviour family of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TowerRole {
    /// Fires homing projectiles.
    Projectile,
    /// Strikes instantly and chains between enemies.
    Chain,
    /// Buffs neighbouring towers and reveals stealth.
    Support,
    /// Soldiers strike the first ground enemy in range.
    Barracks,
}

/// Kind-specific payload of an upgrade tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TierEffect {
    /// Plain damage with no extra effect.
    None,
    /// Area damage around the impact point with a burn.
    Splash {
        /// Blast radius in pixels.
        radius: f32,
        /// Burn damage per second.
        burn_dps: f32,
        /// Burn duration.
        burn_duration: Duration,
    },
    /// Slows the struck enemy.
    Slow {
        /// Fractional speed reduction.
        amount: f32,
        /// Slow duration.
        duration: Duration,
    },
    /// Jumps between enemies with falling damage.
    Chain {
        /// Total number of enemies struck, primary included.
        count: u32,
        /// Damage multiplier applied per jump.
        falloff: f32,
    },
    /// Soldier roster of a barracks.
    Soldiers {
        /// Hit points of each soldier.
        hp: u32,
        /// Damage dealt per strike.
        damage: f32,
        /// Number of soldiers.
        count: u32,
        /// Time before a fallen soldier returns.
        respawn: Duration,
    },
    /// Buff granted to neighbouring towers.
    Aura {
        /// Fractional damage bonus.
        damage_boost: f32,
        /// Fractional range bonus.
        range_boost: f32,
    },
}

/// Statistics of a single upgrade tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTier {
    /// Base damage per hit.
    pub damage: f32,
    /// Base range in pixels.
    pub range: f32,
    /// Time between attacks.
    pub fire_rate: Duration,
    /// Gold needed to reach this tier from the previous one.
    pub upgrade_cost: u32,
    /// Special unlocked at this tier.
    pub special: Option<Special>,
    /// Kind-specific payload.
    pub effect: TierEffect,
}

/// Immutable description of a tower archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerDefinition {
    /// Archetype described by the definition.
    pub kind: TowerKind,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Build cost.
    pub cost: u32,
    /// Target selection rule, absent for towers that never attack.
    pub target_mode: Option<TargetMode>,
    /// Whether flying enemies may be targeted.
    pub can_target_flying: bool,
    /// Combat behaviour family.
    pub role: TowerRole,
    /// Projectile speed in pixels per second.
    pub projectile_speed: f32,
    /// Upgrade tiers starting with the base tier.
    pub tiers: &'static [TowerTier],
}

impl TowerDefinition {
    /// Retrieves a tier, clamping to the top tier.
    #[must_use]
    pub fn tier(&self, level: usize) -> &TowerTier {
        let last = self.tiers.len().saturating_sub(1);
        &self.tiers[level.min(last)]
    }

    /// Index of the top tier.
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.tiers.len().saturating_sub(1)
    }

    /// Cost to upgrade from `level` to the next tier, if one exists.
    #[must_use]
    pub fn upgrade_cost(&self, level: usize) -> Option<u32> {
        self.tiers.get(level + 1).map(|tier| tier.upgrade_cost)
    }
}

const fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

static ARCANE: TowerDefinition = TowerDefinition {
    kind: TowerKind::Arcane,
    name: "Arcane Turret",
    description: "Rapid fire magic bolts",
    cost: 50,
    target_mode: Some(TargetMode::First),
    can_target_flying: true,
    role: TowerRole::Projectile,
    projectile_speed: 200.0,
    tiers: &[
        TowerTier {
            damage: 8.0,
            range: 80.0,
            fire_rate: ms(600),
            upgrade_cost: 0,
            special: None,
            effect: TierEffect::None,
        },
        TowerTier {
            damage: 14.0,
            range: 90.0,
            fire_rate: ms(500),
            upgrade_cost: 40,
            special: None,
            effect: TierEffect::None,
        },
        TowerTier {
            damage: 22.0,
            range: 100.0,
            fire_rate: ms(400),
            upgrade_cost: 80,
            special: Some(Special::Piercing),
            effect: TierEffect::None,
        },
    ],
};

static FLAME: TowerDefinition = TowerDefinition {
    kind: TowerKind::Flame,
    name: "Flame Brazier",
    description: "AoE fire with burn damage",
    cost: 75,
    target_mode: Some(TargetMode::Nearest),
    can_target_flying: false,
    role: TowerRole::Projectile,
    projectile_speed: 150.0,
    tiers: &[
        TowerTier {
            damage: 12.0,
            range: 70.0,
            fire_rate: ms(1200),
            upgrade_cost: 0,
            special: None,
            effect: TierEffect::Splash {
                radius: 24.0,
                burn_dps: 3.0,
                burn_duration: ms(2000),
            },
        },
        TowerTier {
            damage: 20.0,
            range: 75.0,
            fire_rate: ms(1000),
            upgrade_cost: 50,
            special: None,
            effect: TierEffect::Splash {
                radius: 30.0,
                burn_dps: 5.0,
                burn_duration: ms(2500),
            },
        },
        TowerTier {
            damage: 30.0,
            range: 85.0,
            fire_rate: ms(800),
            upgrade_cost: 100,
            special: Some(Special::Inferno),
            effect: TierEffect::Splash {
                radius: 36.0,
                burn_dps: 8.0,
                burn_duration: ms(3000),
            },
        },
    ],
};

static FROST: TowerDefinition = TowerDefinition {
    kind: TowerKind::Frost,
    name: "Frost Spire",
    description: "Slows and freezes enemies",
    cost: 60,
    target_mode: Some(TargetMode::First),
    can_target_flying: true,
    role: TowerRole::Projectile,
    projectile_speed: 180.0,
    tiers: &[
        TowerTier {
            damage: 5.0,
            range: 75.0,
            fire_rate: ms(800),
            upgrade_cost: 0,
            special: None,
            effect: TierEffect::Slow {
                amount: 0.3,
                duration: ms(1500),
            },
        },
        TowerTier {
            damage: 8.0,
            range: 85.0,
            fire_rate: ms(700),
            upgrade_cost: 45,
            special: None,
            effect: TierEffect::Slow {
                amount: 0.4,
                duration: ms(2000),
            },
        },
        TowerTier {
            damage: 12.0,
            range: 95.0,
            fire_rate: ms(600),
            upgrade_cost: 90,
            special: Some(Special::Freeze),
            effect: TierEffect::Slow {
                amount: 0.5,
                duration: ms(2500),
            },
        },
    ],
};

static BARRACKS: TowerDefinition = TowerDefinition {
    kind: TowerKind::Barracks,
    name: "Spirit Barracks",
    description: "Summons warriors to block",
    cost: 70,
    target_mode: Some(TargetMode::Nearest),
    can_target_flying: false,
    role: TowerRole::Barracks,
    projectile_speed: 0.0,
    tiers: &[
        TowerTier {
            damage: 0.0,
            range: 60.0,
            fire_rate: BARRACKS_STRIKE_PERIOD,
            upgrade_cost: 0,
            special: None,
            effect: TierEffect::Soldiers {
                hp: 40,
                damage: 5.0,
                count: 2,
                respawn: ms(8000),
            },
        },
        TowerTier {
            damage: 0.0,
            range: 70.0,
            fire_rate: BARRACKS_STRIKE_PERIOD,
            upgrade_cost: 50,
            special: None,
            effect: TierEffect::Soldiers {
                hp: 60,
                damage: 8.0,
                count: 2,
                respawn: ms(6000),
            },
        },
        TowerTier {
            damage: 0.0,
            range: 80.0,
            fire_rate: BARRACKS_STRIKE_PERIOD,
            upgrade_cost: 100,
            special: Some(Special::Shield),
            effect: TierEffect::Soldiers {
                hp: 90,
                damage: 12.0,
                count: 3,
                respawn: ms(4000),
            },
        },
    ],
};

static LIGHTNING: TowerDefinition = TowerDefinition {
    kind: TowerKind::Lightning,
    name: "Lightning Pylon",
    description: "Chain lightning between enemies",
    cost: 90,
    target_mode: Some(TargetMode::Strongest),
    can_target_flying: true,
    role: TowerRole::Chain,
    projectile_speed: 400.0,
    tiers: &[
        TowerTier {
            damage: 15.0,
            range: 85.0,
            fire_rate: ms(1500),
            upgrade_cost: 0,
            special: None,
            effect: TierEffect::Chain {
                count: 2,
                falloff: 0.7,
            },
        },
        TowerTier {
            damage: 25.0,
            range: 95.0,
            fire_rate: ms(1200),
            upgrade_cost: 70,
            special: None,
            effect: TierEffect::Chain {
                count: 3,
                falloff: 0.75,
            },
        },
        TowerTier {
            damage: 40.0,
            range: 105.0,
            fire_rate: ms(1000),
            upgrade_cost: 130,
            special: Some(Special::Stun),
            effect: TierEffect::Chain {
                count: 4,
                falloff: 0.8,
            },
        },
    ],
};

static ENCHANTER: TowerDefinition = TowerDefinition {
    kind: TowerKind::Enchanter,
    name: "Enchanter's Obelisk",
    description: "Buffs nearby towers",
    cost: 80,
    target_mode: None,
    can_target_flying: false,
    role: TowerRole::Support,
    projectile_speed: 0.0,
    tiers: &[
        TowerTier {
            damage: 0.0,
            range: 80.0,
            fire_rate: DEFAULT_FIRE_RATE,
            upgrade_cost: 0,
            special: None,
            effect: TierEffect::Aura {
                damage_boost: 0.15,
                range_boost: 0.1,
            },
        },
        TowerTier {
            damage: 0.0,
            range: 90.0,
            fire_rate: DEFAULT_FIRE_RATE,
            upgrade_cost: 60,
            special: Some(Special::Reveal),
            effect: TierEffect::Aura {
                damage_boost: 0.25,
                range_boost: 0.15,
            },
        },
        TowerTier {
            damage: 0.0,
            range: 100.0,
            fire_rate: DEFAULT_FIRE_RATE,
            upgrade_cost: 120,
            special: Some(Special::Empower),
            effect: TierEffect::Aura {
                damage_boost: 0.35,
                range_boost: 0.2,
            },
        },
    ],
};
