//! Wave schedules and level records.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    balance::{STARTING_GOLD, STARTING_LIVES},
    EnemyTypeId, TowerKind,
};

/// Spawn schedule for one enemy type within a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveGroup {
    /// Enemy type to spawn.
    #[serde(rename = "type")]
    pub enemy: EnemyTypeId,
    /// Number of enemies to spawn.
    pub count: u32,
    /// Time between consecutive spawns.
    #[serde(with = "crate::millis")]
    pub interval: Duration,
    /// Time after the wave starts before the group becomes eligible.
    #[serde(default, with = "crate::millis")]
    pub delay: Duration,
}

/// Ordered list of groups that spawn concurrently.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Groups making up the wave.
    #[serde(rename = "enemies")]
    pub groups: Vec<WaveGroup>,
}

/// Complete authored level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    /// Display name.
    pub name: String,
    /// Campaign number, absent for custom levels.
    #[serde(default)]
    pub number: Option<u32>,
    /// Gold available before the first wave.
    #[serde(default = "default_gold")]
    pub starting_gold: u32,
    /// Lives available at the start.
    #[serde(default = "default_lives")]
    pub lives: u32,
    /// Map rows expressed in the ASCII legend.
    pub map: Vec<String>,
    /// Authored waypoints used when the map cannot be traced.
    #[serde(default)]
    pub waypoints: Vec<Vec2>,
    /// Waves in play order.
    #[serde(default)]
    pub waves: Vec<WaveDefinition>,
}

fn default_gold() -> u32 {
    STARTING_GOLD
}

fn default_lives() -> u32 {
    STARTING_LIVES
}

impl LevelDefinition {
    /// Every enemy type referenced by the level's waves.
    pub fn enemy_types(&self) -> impl Iterator<Item = &EnemyTypeId> {
        self.waves
            .iter()
            .flat_map(|wave| wave.groups.iter().map(|group| &group.enemy))
    }

    /// Reports whether the tower kind may be built on this level.
    ///
    /// Levels without a campaign number unlock every tower.
    #[must_use]
    pub fn unlocks(&self, kind: TowerKind) -> bool {
        self.number
            .map_or(true, |number| kind.unlock_level() <= number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnemyKind;

    const LEVEL: &str = r#"{
        "name": "Test Ford",
        "number": 2,
        "startingGold": 150,
        "map": ["S.PPE"],
        "waypoints": [[8, 8], [72, 8]],
        "waves": [
            { "enemies": [
                { "type": "goblin", "count": 3, "interval": 1000 },
                { "type": "cx_7", "count": 1, "interval": 0, "delay": 5000 }
            ] }
        ]
    }"#;

    #[test]
    fn level_records_parse_with_defaults() {
        let level: LevelDefinition = serde_json::from_str(LEVEL).expect("valid level");

        assert_eq!(level.starting_gold, 150);
        assert_eq!(level.lives, STARTING_LIVES);
        assert_eq!(level.waypoints, vec![Vec2::new(8.0, 8.0), Vec2::new(72.0, 8.0)]);

        let groups = &level.waves[0].groups;
        assert_eq!(groups[0].enemy, EnemyTypeId::Builtin(EnemyKind::Goblin));
        assert_eq!(groups[0].delay, Duration::ZERO);
        assert_eq!(groups[1].delay, Duration::from_millis(5000));
        assert_eq!(level.enemy_types().count(), 2);
    }

    #[test]
    fn campaign_number_gates_tower_unlocks() {
        let mut level: LevelDefinition = serde_json::from_str(LEVEL).expect("valid level");
        assert!(level.unlocks(TowerKind::Frost));
        assert!(!level.unlocks(TowerKind::Lightning));

        level.number = None;
        assert!(level.unlocks(TowerKind::Enchanter));
    }

    #[test]
    fn unknown_builtin_type_fails_to_parse() {
        let json = r#"{ "type": "balrog", "count": 1, "interval": 0 }"#;
        assert!(serde_json::from_str::<WaveGroup>(json).is_err());
    }
}
