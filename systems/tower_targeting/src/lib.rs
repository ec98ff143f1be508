#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks tower targets from the enemy roster.

use arcane_defenders_core::{EnemyId, Route, TargetMode, Vec2};
use arcane_defenders_world::{Enemy, TargetingProfile};

/// Describes the attacker for a single target query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetQuery {
    /// Ranking rule.
    pub mode: TargetMode,
    /// Attacker position in pixels.
    pub origin: Vec2,
    /// Effective attack range in pixels.
    pub range: f32,
    /// Flying and stealth capabilities of the attacker.
    pub profile: TargetingProfile,
}

/// Tower targeting system.
///
/// Ties are resolved in favour of the enemy met first in roster order, which
/// is spawn order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TowerTargeting;

impl TowerTargeting {
    /// Creates a new tower targeting system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the best targetable enemy within range.
    #[must_use]
    pub fn select(&self, query: &TargetQuery, route: &Route, enemies: &[Enemy]) -> Option<EnemyId> {
        let mut best: Option<BestCandidate> = None;

        for enemy in enemies {
            if !enemy.is_targetable(query.profile) {
                continue;
            }
            let distance = enemy.position().distance(query.origin);
            if distance > query.range {
                continue;
            }

            let score = match query.mode {
                TargetMode::First | TargetMode::Last => enemy.path_progress(route),
                TargetMode::Nearest => distance,
                TargetMode::Strongest => enemy.hp(),
            };
            let current = BestCandidate {
                enemy: enemy.id(),
                score,
            };

            match &mut best {
                Some(existing) => {
                    if current.precedes(existing, query.mode) {
                        *existing = current;
                    }
                }
                None => best = Some(current),
            }
        }

        best.map(|candidate| candidate.enemy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    enemy: EnemyId,
    score: f32,
}

impl BestCandidate {
    fn precedes(&self, other: &Self, mode: TargetMode) -> bool {
        match mode {
            TargetMode::First | TargetMode::Strongest => self.score > other.score,
            TargetMode::Last | TargetMode::Nearest => self.score < other.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcane_defenders_core::{EnemyCatalog, EnemyKind, Outbox};

    fn enemy(id: u32, kind: EnemyKind, position: Vec2) -> Enemy {
        let stats = EnemyCatalog::builtin()
            .scaled(&kind.into(), 1)
            .expect("built-in kind");
        Enemy::new(EnemyId::new(id), stats, position)
    }

    fn route() -> Route {
        Route::from_points(vec![Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0)])
    }

    fn query(mode: TargetMode) -> TargetQuery {
        TargetQuery {
            mode,
            origin: Vec2::new(60.0, 20.0),
            range: 80.0,
            profile: TargetingProfile {
                can_target_flying: false,
                can_reveal: false,
            },
        }
    }

    #[test]
    fn each_mode_ranks_its_own_key() {
        let mut out = Outbox::new();
        let mut enemies = vec![
            enemy(0, EnemyKind::Goblin, Vec2::new(20.0, 0.0)),
            enemy(1, EnemyKind::Troll, Vec2::new(60.0, 0.0)),
            enemy(2, EnemyKind::Goblin, Vec2::new(110.0, 0.0)),
        ];
        let _ = enemies[1].take_damage(100.0, &mut out);
        let system = TowerTargeting::new();

        let pick = |mode| system.select(&query(mode), &route(), &enemies);
        assert_eq!(pick(TargetMode::First), Some(EnemyId::new(2)));
        assert_eq!(pick(TargetMode::Last), Some(EnemyId::new(0)));
        assert_eq!(pick(TargetMode::Nearest), Some(EnemyId::new(1)));
        assert_eq!(pick(TargetMode::Strongest), Some(EnemyId::new(0)));
    }

    #[test]
    fn ties_go_to_the_earliest_spawn() {
        let enemies = vec![
            enemy(3, EnemyKind::Goblin, Vec2::new(40.0, 0.0)),
            enemy(4, EnemyKind::Goblin, Vec2::new(40.0, 0.0)),
        ];
        let system = TowerTargeting::new();
        for mode in [
            TargetMode::First,
            TargetMode::Last,
            TargetMode::Nearest,
            TargetMode::Strongest,
        ] {
            let first = system.select(&query(mode), &route(), &enemies);
            let second = system.select(&query(mode), &route(), &enemies);
            assert_eq!(first, Some(EnemyId::new(3)));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let enemies = vec![enemy(0, EnemyKind::Goblin, Vec2::new(60.0, 100.0))];
        let system = TowerTargeting::new();
        assert_eq!(
            system.select(&query(TargetMode::First), &route(), &enemies),
            Some(EnemyId::new(0))
        );

        let enemies = vec![enemy(0, EnemyKind::Goblin, Vec2::new(60.0, 100.5))];
        assert_eq!(system.select(&query(TargetMode::First), &route(), &enemies), None);
    }

    #[test]
    fn untargetable_enemies_are_ignored() {
        let mut out = Outbox::new();
        let mut enemies = vec![
            enemy(0, EnemyKind::Harpy, Vec2::new(60.0, 0.0)),
            enemy(1, EnemyKind::Wraith, Vec2::new(60.0, 0.0)),
            enemy(2, EnemyKind::Goblin, Vec2::new(60.0, 0.0)),
        ];
        enemies[2].die(&mut out);
        let system = TowerTargeting::new();
        assert_eq!(system.select(&query(TargetMode::Nearest), &route(), &enemies), None);

        enemies[1].reveal();
        assert_eq!(
            system.select(&query(TargetMode::Nearest), &route(), &enemies),
            Some(EnemyId::new(1))
        );
    }
}
