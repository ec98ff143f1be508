use arcane_defenders_core::{
    CellCoord, Command, EnemyCatalog, Event, LevelDefinition, Outbox, PlacementError, TowerKind,
};
use arcane_defenders_session::{levels, Session, SessionConfig};
use arcane_defenders_world::query;

fn play(level: &LevelDefinition) -> Session {
    Session::new(level, EnemyCatalog::builtin(), SessionConfig::default())
        .unwrap_or_else(|error| panic!("{} should be playable: {error}", level.name))
}

fn first_build_spot(level: &LevelDefinition) -> CellCoord {
    level
        .map
        .iter()
        .enumerate()
        .find_map(|(row, cells)| {
            cells
                .find('B')
                .map(|column| CellCoord::new(column as u32, row as u32))
        })
        .expect("every campaign map has build spots")
}

#[test]
fn every_campaign_level_resolves_a_route() {
    let campaign = levels::campaign().expect("bundled levels");
    assert_eq!(campaign.len(), 6);

    for level in &campaign {
        let session = play(level);
        let route = query::route(session.world());
        assert!(route.is_walkable(), "{} has no route", level.name);
        assert_eq!(
            route.points().last(),
            level.waypoints.last(),
            "{} should end at its castle",
            level.name
        );
        assert_eq!(session.waves().total_waves(), level.waves.len());
        assert_eq!(session.economy().gold(), level.starting_gold);
    }
}

#[test]
fn campaign_number_gates_tower_unlocks() {
    for level in levels::campaign().expect("bundled levels") {
        let number = level.number.expect("campaign levels are numbered");
        let spot = first_build_spot(&level);

        for kind in TowerKind::ALL {
            let mut session = play(&level);
            let mut out = Outbox::new();
            session.apply(Command::PlaceTower { kind, cell: spot }, &mut out);

            let locked = out.events.iter().any(|event| {
                matches!(
                    event,
                    Event::TowerPlacementRejected {
                        reason: PlacementError::Locked,
                        ..
                    }
                )
            });
            assert_eq!(locked, !level.unlocks(kind), "{kind} on {}", level.name);
            assert_eq!(locked, kind.unlock_level() > number, "{kind} on {}", level.name);
        }
    }
}

#[test]
fn final_levels_field_the_bosses() {
    let campaign = levels::campaign().expect("bundled levels");
    let groups = |level: &LevelDefinition| -> Vec<String> {
        level
            .waves
            .iter()
            .flat_map(|wave| wave.groups.iter().map(|group| group.enemy.to_string()))
            .collect()
    };

    assert!(groups(&campaign[4]).iter().any(|enemy| enemy == "dragon"));
    let throne = groups(&campaign[5]);
    assert!(throne.iter().any(|enemy| enemy == "dragon"));
    assert!(throne.iter().any(|enemy| enemy == "lich"));
    assert!(campaign[..4]
        .iter()
        .all(|level| !groups(level).iter().any(|enemy| enemy == "lich")));
}
