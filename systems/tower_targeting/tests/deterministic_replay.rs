use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use arcane_defenders_core::{EnemyCatalog, EnemyId, EnemyKind, Route, TargetMode, Vec2};
use arcane_defenders_system_tower_targeting::{TargetQuery, TowerTargeting};
use arcane_defenders_world::{Enemy, TargetingProfile};

const MODES: [TargetMode; 4] = [
    TargetMode::First,
    TargetMode::Last,
    TargetMode::Nearest,
    TargetMode::Strongest,
];

fn route() -> Route {
    Route::from_points(vec![Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0)])
}

fn enemy(id: u32, kind: EnemyKind, x: f32) -> Enemy {
    let stats = EnemyCatalog::builtin()
        .scaled(&kind.into(), 1)
        .expect("built-in kind");
    Enemy::new(EnemyId::new(id), stats, Vec2::new(x, 0.0))
}

fn query(mode: TargetMode) -> TargetQuery {
    TargetQuery {
        mode,
        origin: Vec2::new(100.0, 30.0),
        range: 80.0,
        profile: TargetingProfile {
            can_target_flying: false,
            can_reveal: false,
        },
    }
}

/// Goblins enter every third frame and march right; a troll trails them.
fn roster_at(frame: u32) -> Vec<Enemy> {
    let mut enemies: Vec<Enemy> = (0..=frame / 3)
        .map(|index| enemy(index, EnemyKind::Goblin, (frame - index * 3) as f32 * 6.0))
        .collect();
    if frame >= 10 {
        enemies.push(enemy(100, EnemyKind::Troll, (frame - 10) as f32 * 4.0));
    }
    enemies
}

#[derive(Debug, PartialEq)]
struct Replay {
    assignments: Vec<[Option<EnemyId>; 4]>,
}

impl Replay {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.assignments.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(frames: u32) -> Replay {
    let targeting = TowerTargeting::new();
    let route = route();
    let assignments = (0..frames)
        .map(|frame| {
            let enemies = roster_at(frame);
            MODES.map(|mode| targeting.select(&query(mode), &route, &enemies))
        })
        .collect();
    Replay { assignments }
}

#[test]
fn replaying_the_same_script_picks_the_same_targets() {
    let first = replay(40);
    let second = replay(40);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first
        .assignments
        .iter()
        .any(|targets| targets.iter().all(Option::is_some)));
}

#[test]
fn equidistant_enemies_resolve_in_spawn_order() {
    let targeting = TowerTargeting::new();
    let route = route();
    let enemies = vec![
        enemy(0, EnemyKind::Goblin, 70.0),
        enemy(1, EnemyKind::Goblin, 130.0),
    ];

    let pick = |mode| targeting.select(&query(mode), &route, &enemies);
    assert_eq!(pick(TargetMode::Nearest), Some(EnemyId::new(0)));
    assert_eq!(pick(TargetMode::Strongest), Some(EnemyId::new(0)));
    assert_eq!(pick(TargetMode::First), Some(EnemyId::new(1)));
    assert_eq!(pick(TargetMode::Last), Some(EnemyId::new(0)));
}

#[test]
fn heavier_enemies_win_strongest_without_changing_nearest() {
    let targeting = TowerTargeting::new();
    let route = route();
    let enemies = vec![
        enemy(0, EnemyKind::Goblin, 70.0),
        enemy(1, EnemyKind::Goblin, 130.0),
        enemy(2, EnemyKind::Troll, 160.0),
    ];

    let pick = |mode| targeting.select(&query(mode), &route, &enemies);
    assert_eq!(pick(TargetMode::Strongest), Some(EnemyId::new(2)));
    assert_eq!(pick(TargetMode::First), Some(EnemyId::new(2)));
    assert_eq!(pick(TargetMode::Nearest), Some(EnemyId::new(0)));
}
