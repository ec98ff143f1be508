//! Enemy types, their abilities and the catalog that resolves type ids.

use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balance::{GOLD_SCALE_PER_WAVE, HP_SCALE_PER_WAVE};

/// Prefix reserved for enemy types authored outside the built-in roster.
pub const CUSTOM_PREFIX: &str = "cx_";

/// Errors raised while resolving catalog entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The enemy type id matches neither a built-in nor a custom type.
    #[error("unknown enemy type `{0}`")]
    UnknownEnemy(String),
    /// The tower kind name is not recognised.
    #[error("unknown tower kind `{0}`")]
    UnknownTower(String),
    /// A custom record used an id outside the custom namespace.
    #[error("custom enemy id `{0}` must start with `cx_`")]
    InvalidCustomId(String),
    /// A custom record named an ability that does not exist.
    #[error("custom enemy `{id}` lists unknown ability `{ability}`")]
    UnknownAbility {
        /// Id of the offending record.
        id: String,
        /// Ability name that could not be resolved.
        ability: String,
    },
}

/// Built-in enemy types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline infantry.
    Goblin,
    /// Fast, fragile rider.
    WolfRider,
    /// Slow brute that regenerates.
    Troll,
    /// Flyer that only anti-air towers can hit.
    Harpy,
    /// Stealthed spirit that needs revealing.
    Wraith,
    /// Healer that mends nearby allies.
    DarkPriest,
    /// Tiny swarm unit.
    Imp,
    /// Flying boss.
    Dragon,
    /// Ground boss.
    Lich,
}

impl EnemyKind {
    /// Every built-in kind in roster order.
    pub const ALL: [EnemyKind; 9] = [
        Self::Goblin,
        Self::WolfRider,
        Self::Troll,
        Self::Harpy,
        Self::Wraith,
        Self::DarkPriest,
        Self::Imp,
        Self::Dragon,
        Self::Lich,
    ];

    /// Stable key used to reference the kind in level data.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Goblin => "goblin",
            Self::WolfRider => "wolf_rider",
            Self::Troll => "troll",
            Self::Harpy => "harpy",
            Self::Wraith => "wraith",
            Self::DarkPriest => "dark_priest",
            Self::Imp => "imp",
            Self::Dragon => "dragon",
            Self::Lich => "lich",
        }
    }

    /// Base statistics for the kind before wave scaling.
    #[must_use]
    pub fn definition(self) -> EnemyDefinition {
        let base = |name: &str, hp, speed, gold, damage| EnemyDefinition {
            name: name.to_owned(),
            hp,
            speed,
            gold,
            damage,
            size: 1.0,
            flying: false,
            stealth: false,
            boss: false,
            abilities: Vec::new(),
        };
        match self {
            Self::Goblin => base("Goblin", 30, 35.0, 5, 1),
            Self::WolfRider => base("Wolf Rider", 20, 60.0, 8, 1),
            Self::Troll => EnemyDefinition {
                size: 1.25,
                abilities: vec![Ability::Regenerate { rate: 2.0 }],
                ..base("Troll", 120, 20.0, 15, 2)
            },
            Self::Harpy => EnemyDefinition {
                flying: true,
                ..base("Harpy", 35, 45.0, 10, 1)
            },
            Self::Wraith => EnemyDefinition {
                stealth: true,
                ..base("Wraith", 40, 30.0, 12, 1)
            },
            Self::DarkPriest => EnemyDefinition {
                abilities: vec![Ability::Heal {
                    amount: 5.0,
                    radius: 40.0,
                    period: Duration::from_millis(2000),
                }],
                ..base("Dark Priest", 50, 25.0, 14, 1)
            },
            Self::Imp => EnemyDefinition {
                size: 0.5,
                ..base("Imp", 10, 50.0, 2, 1)
            },
            Self::Dragon => EnemyDefinition {
                size: 1.9,
                flying: true,
                boss: true,
                abilities: vec![Ability::FireBreath],
                ..base("Dragon", 500, 18.0, 100, 10)
            },
            Self::Lich => EnemyDefinition {
                size: 1.6,
                boss: true,
                abilities: vec![Ability::Summon, Ability::Shield],
                ..base("Lich King", 800, 15.0, 150, 15)
            },
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reference to an enemy type, either built-in or custom-authored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EnemyTypeId {
    /// One of the built-in kinds.
    Builtin(EnemyKind),
    /// A custom type registered under the `cx_` namespace.
    Custom(String),
}

impl From<EnemyKind> for EnemyTypeId {
    fn from(kind: EnemyKind) -> Self {
        Self::Builtin(kind)
    }
}

impl FromStr for EnemyTypeId {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.starts_with(CUSTOM_PREFIX) {
            return Ok(Self::Custom(value.to_owned()));
        }
        EnemyKind::ALL
            .into_iter()
            .find(|kind| kind.key() == value)
            .map(Self::Builtin)
            .ok_or_else(|| CatalogError::UnknownEnemy(value.to_owned()))
    }
}

impl TryFrom<String> for EnemyTypeId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EnemyTypeId> for String {
    fn from(id: EnemyTypeId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for EnemyTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(kind) => f.write_str(kind.key()),
            Self::Custom(id) => f.write_str(id),
        }
    }
}

/// Special behaviour attached to an enemy type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ability {
    /// Restores hit points every second, capped at maximum health.
    Regenerate {
        /// Hit points restored per second.
        rate: f32,
    },
    /// Periodically heals wounded allies nearby.
    Heal {
        /// Hit points restored per pulse.
        amount: f32,
        /// Pixel radius of the pulse.
        radius: f32,
        /// Time between pulses.
        #[serde(with = "crate::millis")]
        period: Duration,
    },
    /// Tag carried by the dragon with no simulated effect.
    FireBreath,
    /// Tag carried by the lich with no simulated effect.
    Summon,
    /// Tag carried by the lich with no simulated effect.
    Shield,
}

/// Unscaled statistics for an enemy type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    /// Display name.
    pub name: String,
    /// Maximum hit points at wave one.
    pub hp: u32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Bounty at wave one.
    pub gold: u32,
    /// Lives lost when the enemy leaks.
    pub damage: u32,
    /// Visual scale factor.
    pub size: f32,
    /// Whether only anti-air towers can target the enemy.
    pub flying: bool,
    /// Whether the enemy must be revealed before it can be targeted.
    pub stealth: bool,
    /// Whether the enemy is a boss.
    pub boss: bool,
    /// Special behaviours.
    pub abilities: Vec<Ability>,
}

impl EnemyDefinition {
    /// Maximum hit points after scaling to the provided one-based wave.
    #[must_use]
    pub fn scaled_hp(&self, wave: u32) -> u32 {
        scale(self.hp, wave, HP_SCALE_PER_WAVE)
    }

    /// Bounty after scaling to the provided one-based wave.
    #[must_use]
    pub fn scaled_gold(&self, wave: u32) -> u32 {
        scale(self.gold, wave, GOLD_SCALE_PER_WAVE)
    }
}

fn scale(base: u32, wave: u32, per_wave: f64) -> u32 {
    let factor = 1.0 + f64::from(wave.saturating_sub(1)) * per_wave;
    (f64::from(base) * factor).floor() as u32
}

/// Statistics of an enemy instantiated for a specific wave.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledEnemyStats {
    /// Type the stats were derived from.
    pub type_id: EnemyTypeId,
    /// Wave the stats were scaled to.
    pub wave: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Bounty paid on death.
    pub gold: u32,
    /// Lives lost when the enemy leaks.
    pub damage: u32,
    /// Visual scale factor.
    pub size: f32,
    /// Whether only anti-air towers can target the enemy.
    pub flying: bool,
    /// Whether the enemy must be revealed before it can be targeted.
    pub stealth: bool,
    /// Whether the enemy is a boss.
    pub boss: bool,
    /// Special behaviours.
    pub abilities: Vec<Ability>,
}

/// Custom enemy record as authored by the external monster editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEnemyRecord {
    /// Identifier within the `cx_` namespace.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Maximum hit points at wave one.
    pub hp: u32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Bounty at wave one.
    pub gold: u32,
    /// Lives lost when the enemy leaks.
    #[serde(default = "default_damage")]
    pub damage: u32,
    /// Visual scale factor.
    #[serde(default = "default_size")]
    pub size: f32,
    /// Whether the enemy flies.
    #[serde(default)]
    pub is_flying: bool,
    /// Whether the enemy is stealthed.
    #[serde(default)]
    pub is_stealth: bool,
    /// Whether the enemy is a boss.
    #[serde(default)]
    pub is_boss: bool,
    /// Ability names attached to the enemy.
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Hit points restored per second by `regenerate`.
    #[serde(default)]
    pub regen_rate: f32,
    /// Hit points restored per pulse by `heal`.
    #[serde(default)]
    pub heal_amount: f32,
    /// Pixel radius of the `heal` pulse.
    #[serde(default)]
    pub heal_radius: f32,
    /// Milliseconds between `heal` pulses.
    #[serde(default = "default_heal_rate")]
    pub heal_rate: u64,
}

fn default_damage() -> u32 {
    1
}

fn default_size() -> f32 {
    1.0
}

fn default_heal_rate() -> u64 {
    2000
}

impl CustomEnemyRecord {
    /// Converts the record into a catalog definition.
    ///
    /// # Errors
    ///
    /// Returns an error when the id lies outside the custom namespace or an
    /// ability name is not recognised.
    pub fn into_definition(self) -> Result<(String, EnemyDefinition), CatalogError> {
        if !self.id.starts_with(CUSTOM_PREFIX) {
            return Err(CatalogError::InvalidCustomId(self.id));
        }

        let mut abilities = Vec::with_capacity(self.abilities.len());
        for name in &self.abilities {
            let ability = match name.as_str() {
                "regenerate" => Ability::Regenerate {
                    rate: self.regen_rate,
                },
                "heal" => Ability::Heal {
                    amount: self.heal_amount,
                    radius: self.heal_radius,
                    period: Duration::from_millis(self.heal_rate),
                },
                "fireBreath" => Ability::FireBreath,
                "summon" => Ability::Summon,
                "shield" => Ability::Shield,
                other => {
                    return Err(CatalogError::UnknownAbility {
                        id: self.id.clone(),
                        ability: other.to_owned(),
                    })
                }
            };
            abilities.push(ability);
        }

        let definition = EnemyDefinition {
            name: self.name,
            hp: self.hp,
            speed: self.speed,
            gold: self.gold,
            damage: self.damage,
            size: self.size,
            flying: self.is_flying,
            stealth: self.is_stealth,
            boss: self.is_boss,
            abilities,
        };
        Ok((self.id, definition))
    }
}

/// Resolves enemy type ids into definitions.
#[derive(Clone, Debug)]
pub struct EnemyCatalog {
    builtin: BTreeMap<EnemyKind, EnemyDefinition>,
    custom: BTreeMap<String, EnemyDefinition>,
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EnemyCatalog {
    /// Creates a catalog holding only the built-in roster.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            builtin: EnemyKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.definition()))
                .collect(),
            custom: BTreeMap::new(),
        }
    }

    /// Registers custom enemy records, replacing earlier entries with the same id.
    ///
    /// # Errors
    ///
    /// Returns the first record conversion failure.
    pub fn register_custom<I>(&mut self, records: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = CustomEnemyRecord>,
    {
        for record in records {
            let (id, definition) = record.into_definition()?;
            let _ = self.custom.insert(id, definition);
        }
        Ok(())
    }

    /// Looks up the definition for an enemy type id.
    #[must_use]
    pub fn get(&self, id: &EnemyTypeId) -> Option<&EnemyDefinition> {
        match id {
            EnemyTypeId::Builtin(kind) => self.builtin.get(kind),
            EnemyTypeId::Custom(key) => self.custom.get(key),
        }
    }

    /// Produces wave-scaled statistics for an enemy type id.
    #[must_use]
    pub fn scaled(&self, id: &EnemyTypeId, wave: u32) -> Option<ScaledEnemyStats> {
        let definition = self.get(id)?;
        Some(ScaledEnemyStats {
            type_id: id.clone(),
            wave,
            max_hp: definition.scaled_hp(wave),
            speed: definition.speed,
            gold: definition.scaled_gold(wave),
            damage: definition.damage,
            size: definition.size,
            flying: definition.flying,
            stealth: definition.stealth,
            boss: definition.boss,
            abilities: definition.abilities.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goblin_scales_with_wave_number() {
        let catalog = EnemyCatalog::builtin();
        let stats = catalog
            .scaled(&EnemyKind::Goblin.into(), 5)
            .expect("goblin is built in");

        assert_eq!(stats.max_hp, 44);
        assert_eq!(stats.gold, 6);
        assert_eq!(stats.speed, 35.0);
    }

    #[test]
    fn first_wave_uses_base_stats() {
        let troll = EnemyKind::Troll.definition();
        assert_eq!(troll.scaled_hp(1), 120);
        assert_eq!(troll.scaled_gold(1), 15);
        assert_eq!(troll.scaled_hp(0), 120);
    }

    #[test]
    fn bosses_carry_their_display_names() {
        let lich = EnemyKind::Lich.definition();
        assert_eq!(lich.name, "Lich King");
        assert!(lich.boss);
        assert_eq!(EnemyKind::Dragon.definition().name, "Dragon");
    }

    #[test]
    fn type_ids_parse_builtin_and_custom_names() {
        assert_eq!(
            "wolf_rider".parse::<EnemyTypeId>(),
            Ok(EnemyTypeId::Builtin(EnemyKind::WolfRider))
        );
        assert_eq!(
            "cx_1700000000".parse::<EnemyTypeId>(),
            Ok(EnemyTypeId::Custom("cx_1700000000".to_owned()))
        );
        assert_eq!(
            "balrog".parse::<EnemyTypeId>(),
            Err(CatalogError::UnknownEnemy("balrog".to_owned()))
        );
    }

    #[test]
    fn unknown_custom_id_is_absent() {
        let catalog = EnemyCatalog::builtin();
        assert!(catalog
            .get(&EnemyTypeId::Custom("cx_missing".to_owned()))
            .is_none());
    }

    #[test]
    fn custom_records_register_with_abilities() {
        let json = r#"{
            "id": "cx_42",
            "name": "Mire Hulk",
            "sprite": "hulk",
            "hp": 200,
            "speed": 12,
            "gold": 30,
            "damage": 3,
            "size": 1.4,
            "isFlying": false,
            "isStealth": true,
            "isBoss": false,
            "abilities": ["regenerate", "heal"],
            "regenRate": 4,
            "healAmount": 6,
            "healRadius": 30,
            "healRate": 1500
        }"#;
        let record: CustomEnemyRecord = serde_json::from_str(json).expect("valid record");
        let mut catalog = EnemyCatalog::builtin();
        catalog.register_custom([record]).expect("record converts");

        let id: EnemyTypeId = "cx_42".parse().expect("custom id");
        let definition = catalog.get(&id).expect("registered");
        assert!(definition.stealth);
        assert_eq!(
            definition.abilities,
            vec![
                Ability::Regenerate { rate: 4.0 },
                Ability::Heal {
                    amount: 6.0,
                    radius: 30.0,
                    period: Duration::from_millis(1500),
                },
            ]
        );
    }

    #[test]
    fn custom_records_outside_namespace_are_rejected() {
        let record = CustomEnemyRecord {
            id: "goblin".to_owned(),
            name: "Impostor".to_owned(),
            hp: 1,
            speed: 1.0,
            gold: 1,
            damage: 1,
            size: 1.0,
            is_flying: false,
            is_stealth: false,
            is_boss: false,
            abilities: Vec::new(),
            regen_rate: 0.0,
            heal_amount: 0.0,
            heal_radius: 0.0,
            heal_rate: 2000,
        };
        assert_eq!(
            record.into_definition(),
            Err(CatalogError::InvalidCustomId("goblin".to_owned()))
        );
    }
}
