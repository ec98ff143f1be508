#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flight and impact resolution for homing projectiles.

use std::time::Duration;

use arcane_defenders_core::{
    balance::{
        FREEZE_CHANCE, FREEZE_DURATION, PROJECTILE_HIT_RADIUS, SPLASH_BURN_FRACTION,
        SPLASH_EDGE_FALLOFF, STUN_CHANCE, STUN_DURATION,
    },
    Cue, Outbox, Special, StatusKind, TierEffect, Vec2,
};
use arcane_defenders_world::{Enemy, Projectile};
use rand::Rng;

/// Moves projectiles toward their targets and applies hits.
#[derive(Debug, Default)]
pub struct ProjectileFlight {
    splashed: Vec<(usize, f32)>,
}

impl ProjectileFlight {
    /// Creates the system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every live projectile by one tick.
    ///
    /// Projectiles whose target died or was reaped fizzle without effect. A
    /// projectile within the hit radius at the start of its update connects;
    /// otherwise it closes in, never travelling past its target. Spent
    /// projectiles remain in the slice until swept.
    pub fn handle<R: Rng>(
        &mut self,
        enemies: &mut [Enemy],
        projectiles: &mut [Projectile],
        delta: Duration,
        rng: &mut R,
        out: &mut Outbox,
    ) {
        for projectile in projectiles.iter_mut() {
            if projectile.is_spent() {
                continue;
            }

            let target = enemies
                .binary_search_by_key(&projectile.target(), Enemy::id)
                .ok()
                .filter(|&index| enemies[index].is_alive());
            let Some(index) = target else {
                projectile.spend();
                out.cue(Cue::ProjectileRemoved {
                    projectile: projectile.id(),
                });
                continue;
            };

            let offset = enemies[index].position() - projectile.position();
            let distance = offset.length();
            if distance < PROJECTILE_HIT_RADIUS {
                self.impact(projectile, index, enemies, rng, out);
                continue;
            }

            let step = (projectile.speed() * delta.as_secs_f32()).min(distance);
            projectile.set_position(projectile.position() + offset / distance * step);
        }
    }

    fn impact<R: Rng>(
        &mut self,
        projectile: &mut Projectile,
        index: usize,
        enemies: &mut [Enemy],
        rng: &mut R,
        out: &mut Outbox,
    ) {
        projectile.spend();
        let at = projectile.position();
        let tier = *projectile.tier();
        out.cue(Cue::ProjectileImpact {
            projectile: projectile.id(),
            at,
        });

        let _ = enemies[index].take_damage(projectile.damage(), out);

        if let TierEffect::Splash {
            radius,
            burn_dps,
            burn_duration,
        } = tier.effect
        {
            out.cue(Cue::SplashBurst { at, radius });
            self.splash(at, radius, index, enemies);
            for &(victim, distance) in &self.splashed {
                let enemy = &mut enemies[victim];
                let falloff = 1.0 - distance / radius * SPLASH_EDGE_FALLOFF;
                let _ = enemy.take_damage(tier.damage * falloff, out);
                if burn_dps > 0.0 {
                    enemy.apply_status(
                        StatusKind::Burn,
                        burn_dps * SPLASH_BURN_FRACTION,
                        burn_duration.mul_f32(SPLASH_BURN_FRACTION),
                    );
                }
            }
        }

        let target = &mut enemies[index];
        match tier.effect {
            TierEffect::Slow { amount, duration } => {
                target.apply_status(StatusKind::Slow, amount, duration);
            }
            TierEffect::Splash {
                burn_dps,
                burn_duration,
                ..
            } if burn_dps > 0.0 => {
                target.apply_status(StatusKind::Burn, burn_dps, burn_duration);
            }
            _ => {}
        }

        match tier.special {
            Some(Special::Freeze) if rng.gen::<f64>() < FREEZE_CHANCE => {
                target.apply_status(StatusKind::Freeze, 0.0, FREEZE_DURATION);
            }
            Some(Special::Stun) if rng.gen::<f64>() < STUN_CHANCE => {
                target.apply_status(StatusKind::Freeze, 0.0, STUN_DURATION);
            }
            _ => {}
        }

        out.cue(Cue::ProjectileRemoved {
            projectile: projectile.id(),
        });
    }

    /// Collects living bystanders inside the blast with their distances.
    fn splash(&mut self, at: Vec2, radius: f32, primary: usize, enemies: &[Enemy]) {
        self.splashed.clear();
        self.splashed
            .extend(enemies.iter().enumerate().filter_map(|(index, enemy)| {
                if index == primary || !enemy.is_alive() {
                    return None;
                }
                let distance = enemy.position().distance(at);
                (distance <= radius).then_some((index, distance))
            }));
    }
}
