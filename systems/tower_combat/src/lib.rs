#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower attacks and support auras.
//!
//! Support towers resolve first so that every attacker fires with the bonuses
//! granted during the same tick. Attackers then act in placement order: barracks
//! soldiers strike the first ground enemy in range, projectile towers launch
//! homing shots and lightning pylons chain instantly between nearby enemies.

use std::{ops::Range, time::Duration};

use arcane_defenders_core::{
    balance::{
        BARRACKS_SLOW_AMOUNT, BARRACKS_SLOW_DURATION, CHAIN_JUMP_RADIUS, CHAIN_STUN_CHANCE,
        CHAIN_STUN_DURATION, MUZZLE_OFFSET, SUPPORT_PULSE,
    },
    Cue, EnemyId, Outbox, Route, Special, StatusKind, TierEffect, TowerId, TowerRole, Vec2,
};
use arcane_defenders_system_tower_targeting::{TargetQuery, TowerTargeting};
use arcane_defenders_world::{Enemy, Launch, ProjectileSet, Tower, TowerRegistry};
use rand::Rng;

/// Tower combat system that keeps scratch buffers between ticks.
#[derive(Debug, Default)]
pub struct TowerCombat {
    targeting: TowerTargeting,
    layout: Vec<Placement>,
    grants: Vec<AuraGrant>,
    members: Vec<TowerId>,
    struck: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
struct Placement {
    tower: TowerId,
    position: Vec2,
    support: bool,
}

#[derive(Clone, Debug)]
struct AuraGrant {
    origin: Vec2,
    radius: f32,
    damage_boost: f32,
    range_boost: f32,
    reveal: bool,
    members: Range<usize>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one tick of tower activity.
    ///
    /// Aura bonuses must have been reset beforehand; this call reapplies them
    /// from the aura membership captured at each support tower's latest pulse.
    #[allow(clippy::too_many_arguments)]
    pub fn handle<R: Rng>(
        &mut self,
        route: &Route,
        enemies: &mut [Enemy],
        towers: &mut TowerRegistry,
        projectiles: &mut ProjectileSet,
        delta: Duration,
        rng: &mut R,
        out: &mut Outbox,
    ) {
        if towers.is_empty() {
            return;
        }

        self.pulse_auras(towers, delta, out);
        self.apply_auras(towers, enemies);

        for tower in towers.iter_mut() {
            match tower.definition().role {
                TowerRole::Support => {}
                TowerRole::Barracks => strike(tower, enemies, delta, out),
                TowerRole::Projectile | TowerRole::Chain => {
                    let Some((target, index)) = self.aim(tower, route, enemies, delta) else {
                        continue;
                    };
                    if tower.definition().role == TowerRole::Projectile {
                        launch(tower, target, projectiles, out);
                    } else {
                        self.chain(tower, index, enemies, rng, out);
                    }
                }
            }
        }
    }

    fn pulse_auras(&mut self, towers: &mut TowerRegistry, delta: Duration, out: &mut Outbox) {
        self.layout.clear();
        self.layout.extend(towers.iter().map(|tower| Placement {
            tower: tower.id(),
            position: tower.position(),
            support: tower.definition().role == TowerRole::Support,
        }));
        self.grants.clear();
        self.members.clear();

        for tower in towers.iter_mut() {
            let TierEffect::Aura {
                damage_boost,
                range_boost,
            } = tower.tier().effect
            else {
                continue;
            };
            let origin = tower.position();
            let radius = tower.range();

            if tower.pulse_due(delta, SUPPORT_PULSE) {
                let source = tower.id();
                let covered = self
                    .layout
                    .iter()
                    .filter(|placement| {
                        !placement.support
                            && placement.tower != source
                            && placement.position.distance(origin) <= radius
                    })
                    .map(|placement| placement.tower)
                    .collect();
                tower.set_aura_members(covered);
                out.cue(Cue::AuraPulse {
                    tower: source,
                    radius,
                });
            }

            let start = self.members.len();
            self.members.extend_from_slice(tower.aura_members());
            self.grants.push(AuraGrant {
                origin,
                radius,
                damage_boost,
                range_boost,
                reveal: tower.special().is_some_and(Special::reveals),
                members: start..self.members.len(),
            });
        }
    }

    fn apply_auras(&self, towers: &mut TowerRegistry, enemies: &mut [Enemy]) {
        for grant in &self.grants {
            for &member in &self.members[grant.members.clone()] {
                if let Some(tower) = towers.get_mut(member) {
                    tower.apply_aura(grant.damage_boost, grant.range_boost, grant.reveal);
                }
            }

            if !grant.reveal {
                continue;
            }
            for enemy in enemies.iter_mut() {
                if enemy.is_alive()
                    && enemy.stats().stealth
                    && enemy.position().distance(grant.origin) <= grant.radius
                {
                    enemy.reveal();
                }
            }
        }
    }

    /// Picks a target and reports it once the fire clock allows an attack.
    fn aim(
        &self,
        tower: &mut Tower,
        route: &Route,
        enemies: &[Enemy],
        delta: Duration,
    ) -> Option<(EnemyId, usize)> {
        let mode = tower.definition().target_mode?;
        let query = TargetQuery {
            mode,
            origin: tower.position(),
            range: tower.range(),
            profile: tower.profile(),
        };
        let target = self.targeting.select(&query, route, enemies);
        tower.set_target(target);

        let elapsed = tower.accumulate_fire_clock(delta);
        let target = target?;
        if elapsed < tower.fire_rate() {
            return None;
        }
        tower.reset_fire_clock();

        let index = enemies.binary_search_by_key(&target, Enemy::id).ok()?;
        Some((target, index))
    }

    fn chain<R: Rng>(
        &mut self,
        tower: &Tower,
        primary: usize,
        enemies: &mut [Enemy],
        rng: &mut R,
        out: &mut Outbox,
    ) {
        let (count, falloff) = match tower.tier().effect {
            TierEffect::Chain { count, falloff } => (count, falloff),
            _ => (1, 1.0),
        };
        let stuns = tower.special() == Some(Special::Stun);
        let mut damage = tower.damage();

        self.struck.clear();
        self.struck.push(primary);
        out.cue(Cue::LightningArc {
            from: muzzle(tower),
            to: enemies[primary].position(),
        });
        let _ = enemies[primary].take_damage(damage.floor(), out);

        let mut current = primary;
        for _ in 1..count {
            damage *= falloff;
            let Some(next) = self.next_link(enemies, current) else {
                break;
            };
            out.cue(Cue::LightningArc {
                from: enemies[current].position(),
                to: enemies[next].position(),
            });

            let victim = &mut enemies[next];
            let _ = victim.take_damage(damage.floor(), out);
            if stuns && rng.gen::<f64>() < CHAIN_STUN_CHANCE {
                victim.apply_status(StatusKind::Freeze, 0.0, CHAIN_STUN_DURATION);
            }

            self.struck.push(next);
            current = next;
        }
    }

    /// Nearest living enemy not yet struck by the current bolt.
    fn next_link(&self, enemies: &[Enemy], current: usize) -> Option<usize> {
        let from = enemies[current].position();
        let mut best: Option<(usize, f32)> = None;

        for (index, enemy) in enemies.iter().enumerate() {
            if !enemy.is_alive() || self.struck.contains(&index) {
                continue;
            }
            let distance = enemy.position().distance(from);
            if distance >= CHAIN_JUMP_RADIUS {
                continue;
            }
            if best.map_or(true, |(_, nearest)| distance < nearest) {
                best = Some((index, distance));
            }
        }

        best.map(|(index, _)| index)
    }
}

fn muzzle(tower: &Tower) -> Vec2 {
    tower.position() - Vec2::new(0.0, MUZZLE_OFFSET)
}

fn launch(tower: &Tower, target: EnemyId, projectiles: &mut ProjectileSet, out: &mut Outbox) {
    let origin = muzzle(tower);
    let projectile = projectiles.launch(Launch {
        source: tower.id(),
        target,
        origin,
        speed: tower.definition().projectile_speed,
        damage: tower.damage(),
        tier: *tower.tier(),
    });
    out.cue(Cue::ProjectileLaunched {
        projectile,
        tower: tower.id(),
        from: origin,
    });
}

/// Lets barracks soldiers hit the first ground enemy in range.
fn strike(tower: &mut Tower, enemies: &mut [Enemy], delta: Duration, out: &mut Outbox) {
    if tower.accumulate_fire_clock(delta) < tower.fire_rate() {
        return;
    }
    tower.reset_fire_clock();

    let TierEffect::Soldiers { damage, .. } = tower.tier().effect else {
        return;
    };
    let origin = tower.position();
    let range = tower.range();
    let Some(enemy) = enemies.iter_mut().find(|enemy| {
        enemy.is_alive() && !enemy.stats().flying && enemy.position().distance(origin) <= range
    }) else {
        return;
    };

    out.cue(Cue::SoldierStrike {
        tower: tower.id(),
        enemy: enemy.id(),
    });
    let _ = enemy.take_damage(damage, out);
    enemy.apply_status(StatusKind::Slow, BARRACKS_SLOW_AMOUNT, BARRACKS_SLOW_DURATION);
}
