//! Levels bundled with the game.

use arcane_defenders_core::LevelDefinition;

use crate::SessionError;

const EMERALD_FOREST: &str = include_str!("../levels/emerald_forest.json");

/// Campaign records in play order.
const CAMPAIGN: [&str; 6] = [
    EMERALD_FOREST,
    include_str!("../levels/mountain_pass.json"),
    include_str!("../levels/misty_marshlands.json"),
    include_str!("../levels/haunted_ruins.json"),
    include_str!("../levels/dragons_peak.json"),
    include_str!("../levels/lich_kings_throne.json"),
];

/// Parses a level record from JSON.
///
/// # Errors
///
/// Returns [`SessionError::InvalidLevel`] when the record is malformed.
pub fn parse(json: &str) -> Result<LevelDefinition, SessionError> {
    Ok(serde_json::from_str(json)?)
}

/// The first campaign level.
///
/// # Errors
///
/// Returns an error only if the bundled record is malformed.
pub fn emerald_forest() -> Result<LevelDefinition, SessionError> {
    parse(EMERALD_FOREST)
}

/// Every campaign level, from The Emerald Forest to The Lich King's Throne.
///
/// # Errors
///
/// Returns an error only if a bundled record is malformed.
pub fn campaign() -> Result<Vec<LevelDefinition>, SessionError> {
    CAMPAIGN.iter().map(|json| parse(json)).collect()
}

/// Looks up a campaign level by its one-based number.
///
/// # Errors
///
/// Returns an error only if the bundled record is malformed.
pub fn by_number(number: u32) -> Result<Option<LevelDefinition>, SessionError> {
    let index = number.checked_sub(1).and_then(|index| usize::try_from(index).ok());
    index
        .and_then(|index| CAMPAIGN.get(index))
        .map(|json| parse(json))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_level_parses() {
        let level = emerald_forest().expect("bundled level");
        assert_eq!(level.name, "The Emerald Forest");
        assert_eq!(level.starting_gold, 120);
        assert_eq!(level.waves.len(), 5);
        assert_eq!(level.waypoints.len(), 8);
    }

    #[test]
    fn campaign_levels_are_numbered_in_play_order() {
        let levels = campaign().expect("bundled levels");
        let numbers: Vec<_> = levels.iter().map(|level| level.number).collect();
        assert_eq!(numbers, (1..=6).map(Some).collect::<Vec<_>>());
        assert_eq!(levels[5].name, "The Lich King's Throne");
        assert_eq!(levels[5].waves.len(), 10);
    }

    #[test]
    fn levels_are_found_by_number() {
        let pass = by_number(2).expect("bundled level").expect("second level");
        assert_eq!(pass.name, "Mountain Pass");
        assert_eq!(pass.lives, 18);
        assert!(by_number(0).expect("no record").is_none());
        assert!(by_number(7).expect("no record").is_none());
    }

    #[test]
    fn malformed_records_are_reported() {
        assert!(matches!(parse("{"), Err(SessionError::InvalidLevel(_))));
    }
}
