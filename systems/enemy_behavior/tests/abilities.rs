use std::time::Duration;

use arcane_defenders_core::{Cue, EnemyCatalog, EnemyId, EnemyKind, Outbox, Route, Vec2};
use arcane_defenders_system_enemy_behavior::EnemyBehavior;
use arcane_defenders_world::Enemy;

fn spawn(id: u32, kind: EnemyKind, position: Vec2) -> Enemy {
    let stats = EnemyCatalog::builtin()
        .scaled(&kind.into(), 1)
        .expect("built-in kind");
    Enemy::new(EnemyId::new(id), stats, position)
}

fn long_route() -> Route {
    Route::from_points(vec![Vec2::new(0.0, 0.0), Vec2::new(1000.0, 0.0)])
}

#[test]
fn dark_priest_heals_wounded_allies_in_radius_on_its_period() {
    let mut out = Outbox::new();
    let mut enemies = vec![
        spawn(0, EnemyKind::DarkPriest, Vec2::new(0.0, 0.0)),
        spawn(1, EnemyKind::Goblin, Vec2::new(30.0, 0.0)),
        spawn(2, EnemyKind::Goblin, Vec2::new(200.0, 0.0)),
    ];
    let _ = enemies[1].take_damage(20.0, &mut out);
    let _ = enemies[2].take_damage(20.0, &mut out);
    out.clear();

    let mut system = EnemyBehavior::new();
    let route = long_route();

    system.handle(&route, &mut enemies, Duration::from_millis(100), &mut out);
    assert_eq!(enemies[1].hp(), 15.0);
    assert_eq!(enemies[2].hp(), 10.0);
    assert_eq!(enemies[0].hp(), 50.0);

    system.handle(&route, &mut enemies, Duration::from_millis(1000), &mut out);
    assert_eq!(enemies[1].hp(), 15.0, "pulse waits for its period");

    system.handle(&route, &mut enemies, Duration::from_millis(1000), &mut out);
    assert_eq!(enemies[1].hp(), 20.0);

    let heals = out
        .cues
        .iter()
        .filter(|cue| matches!(cue, Cue::EnemyHealed { .. }))
        .count();
    assert_eq!(heals, 2);
}

#[test]
fn priest_skips_allies_at_full_health() {
    let mut out = Outbox::new();
    let mut enemies = vec![
        spawn(0, EnemyKind::DarkPriest, Vec2::new(0.0, 0.0)),
        spawn(1, EnemyKind::Goblin, Vec2::new(10.0, 0.0)),
    ];

    EnemyBehavior::new().handle(&long_route(), &mut enemies, Duration::from_millis(16), &mut out);
    assert!(out
        .cues
        .iter()
        .all(|cue| !matches!(cue, Cue::EnemyHealed { .. })));
}
