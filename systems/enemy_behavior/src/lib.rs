#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick enemy update: status timers, movement, abilities and burns.

use std::time::Duration;

use arcane_defenders_core::{
    balance::WAYPOINT_ARRIVAL_RADIUS, Ability, Cue, Outbox, Route, StatusKind, Vec2,
};
use arcane_defenders_world::Enemy;

/// Drives every living enemy forward by one tick.
#[derive(Debug, Default)]
pub struct EnemyBehavior {
    healed: Vec<usize>,
}

impl EnemyBehavior {
    /// Creates the system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates enemies in spawn order.
    ///
    /// Each enemy counts down its status effects, walks toward the next route
    /// point, regenerates, pulses heals onto wounded allies and finally takes
    /// burn damage. Enemies that already left play are skipped.
    pub fn handle(&mut self, route: &Route, enemies: &mut [Enemy], delta: Duration, out: &mut Outbox) {
        for index in 0..enemies.len() {
            if !enemies[index].is_alive() {
                continue;
            }

            let pulse = {
                let enemy = &mut enemies[index];
                if !advance(enemy, route, delta, out) {
                    continue;
                }
                abilities(enemy, delta)
            };

            if let Some(pulse) = pulse {
                self.heal_allies(enemies, index, pulse, out);
            }

            let enemy = &mut enemies[index];
            if let Some(dps) = enemy.status().burn_dps() {
                let _ = enemy.take_damage(dps * delta.as_secs_f32(), out);
            }
        }
    }

    fn heal_allies(&mut self, enemies: &mut [Enemy], source: usize, pulse: HealPulse, out: &mut Outbox) {
        self.healed.clear();
        self.healed.extend(enemies.iter().enumerate().filter_map(|(index, ally)| {
            let eligible = index != source
                && ally.is_alive()
                && ally.position().distance(pulse.origin) <= pulse.radius
                && ally.hp() < ally.max_hp();
            eligible.then_some(index)
        }));

        for &index in &self.healed {
            let ally = &mut enemies[index];
            let restored = ally.heal(pulse.amount);
            out.cue(Cue::EnemyHealed {
                enemy: ally.id(),
                amount: restored,
            });
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct HealPulse {
    origin: Vec2,
    amount: f32,
    radius: f32,
}

/// Runs status timers and movement. Returns `false` when the enemy leaked.
fn advance(enemy: &mut Enemy, route: &Route, delta: Duration, out: &mut Outbox) -> bool {
    let id = enemy.id();
    enemy.status_mut().tick(delta, |status| {
        if matches!(status, StatusKind::Slow | StatusKind::Freeze) {
            out.cue(Cue::TintCleared { enemy: id, status });
        }
    });

    let last = route.len().saturating_sub(1);
    if enemy.waypoint() >= last {
        return true;
    }
    let Some(target) = route.point(enemy.waypoint() + 1) else {
        return true;
    };

    let offset = target - enemy.position();
    let distance = offset.length();
    if distance < WAYPOINT_ARRIVAL_RADIUS {
        if enemy.advance_waypoint() >= last {
            enemy.reach_end(out);
            return false;
        }
        return true;
    }

    let speed = enemy.stats().speed * enemy.status().speed_factor();
    let step = (speed * delta.as_secs_f32()).min(distance);
    if step > 0.0 {
        let position = enemy.position() + offset / distance * step;
        enemy.set_position(position);
        out.cue(Cue::EnemyMoved {
            enemy: id,
            position,
        });
    }
    true
}

/// Applies regeneration and reports a heal pulse when one is due.
fn abilities(enemy: &mut Enemy, delta: Duration) -> Option<HealPulse> {
    let mut regen = 0.0;
    let mut heal = None;
    for ability in &enemy.stats().abilities {
        match *ability {
            Ability::Regenerate { rate } => regen += rate,
            Ability::Heal {
                amount,
                radius,
                period,
            } => heal = Some((amount, radius, period)),
            Ability::FireBreath | Ability::Summon | Ability::Shield => {}
        }
    }

    if regen > 0.0 && enemy.hp() < enemy.max_hp() {
        let _ = enemy.heal(regen * delta.as_secs_f32());
    }

    let (amount, radius, period) = heal?;
    enemy
        .heal_pulse_due(delta, period)
        .then_some(HealPulse {
            origin: enemy.position(),
            amount,
            radius,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcane_defenders_core::{EnemyCatalog, EnemyId, EnemyKind, Event};

    fn enemy(kind: EnemyKind, position: Vec2) -> Enemy {
        let stats = EnemyCatalog::builtin()
            .scaled(&kind.into(), 1)
            .expect("built-in kind");
        Enemy::new(EnemyId::new(0), stats, position)
    }

    fn corridor() -> Route {
        Route::from_points(vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)])
    }

    #[test]
    fn moves_toward_next_point_at_base_speed() {
        let mut enemies = vec![enemy(EnemyKind::Goblin, Vec2::ZERO)];
        let mut out = Outbox::new();
        EnemyBehavior::new().handle(&corridor(), &mut enemies, Duration::from_secs(1), &mut out);

        assert_eq!(enemies[0].position(), Vec2::new(35.0, 0.0));
    }

    #[test]
    fn freeze_and_slow_together_hold_position() {
        let mut enemies = vec![enemy(EnemyKind::WolfRider, Vec2::new(10.0, 0.0))];
        enemies[0].apply_status(StatusKind::Slow, 0.5, Duration::from_millis(1000));
        enemies[0].apply_status(StatusKind::Freeze, 0.0, Duration::from_millis(1000));
        let mut out = Outbox::new();

        EnemyBehavior::new().handle(&corridor(), &mut enemies, Duration::from_millis(100), &mut out);
        assert_eq!(enemies[0].position(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn arrival_at_final_point_leaks_once() {
        let mut enemies = vec![enemy(EnemyKind::Goblin, Vec2::new(99.0, 0.0))];
        let mut out = Outbox::new();
        let mut system = EnemyBehavior::new();
        system.handle(&corridor(), &mut enemies, Duration::from_millis(16), &mut out);
        system.handle(&corridor(), &mut enemies, Duration::from_millis(16), &mut out);

        assert!(enemies[0].has_reached_end());
        assert_eq!(
            out.events,
            vec![Event::EnemyReachedEnd {
                enemy: EnemyId::new(0),
                damage: 1,
            }]
        );
    }

    #[test]
    fn burn_can_kill_during_the_update() {
        let mut enemies = vec![enemy(EnemyKind::Imp, Vec2::ZERO)];
        enemies[0].apply_status(StatusKind::Burn, 20.0, Duration::from_millis(2000));
        let mut out = Outbox::new();

        EnemyBehavior::new().handle(&corridor(), &mut enemies, Duration::from_millis(500), &mut out);
        assert!(!enemies[0].is_alive());
        assert!(matches!(out.events[..], [Event::EnemyKilled { .. }]));
    }

    #[test]
    fn troll_regenerates_up_to_maximum() {
        let mut enemies = vec![enemy(EnemyKind::Troll, Vec2::ZERO)];
        let mut out = Outbox::new();
        let _ = enemies[0].take_damage(3.0, &mut out);

        let mut system = EnemyBehavior::new();
        system.handle(&corridor(), &mut enemies, Duration::from_secs(1), &mut out);
        assert_eq!(enemies[0].hp(), 119.0);
        system.handle(&corridor(), &mut enemies, Duration::from_secs(1), &mut out);
        assert_eq!(enemies[0].hp(), 120.0);
    }
}
