#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver for a single level of Arcane Defenders.
//!
//! A [`Session`] owns the world and every system. Adapters feed it
//! [`Command`] values and wall-clock deltas; it answers with [`Event`] values
//! and presentation [`Cue`]s in an [`Outbox`]. Each tick runs, in order: wave
//! spawning, enemy updates, reaping, aura reset, towers, projectiles and the
//! wave completion check. Kill, leak and wave events are then settled against
//! the player's purse.

mod config;
pub mod levels;

use std::time::Duration;

use arcane_defenders_core::{
    balance::{
        METEOR_BURN_DPS, METEOR_BURN_DURATION, METEOR_COOLDOWN, METEOR_FALLOFF_DISTANCE,
        METEOR_MIN_DAMAGE, METEOR_PEAK_DAMAGE, METEOR_RADIUS,
    },
    CellCoord, Command, Cue, EnemyCatalog, EnemyTypeId, Event, LevelDefinition, MapGrid, Outbox,
    PlacementError, Presentation, Route, StatusKind, TowerId, TowerKind, UpgradeError, Vec2,
};
use arcane_defenders_system_economy::Economy;
use arcane_defenders_system_enemy_behavior::EnemyBehavior;
use arcane_defenders_system_path_tracer::{grid_from_ascii, PathTracer};
use arcane_defenders_system_projectiles::ProjectileFlight;
use arcane_defenders_system_spawning::{SpawnRequest, WaveManager, WaveStart};
use arcane_defenders_system_tower_combat::TowerCombat;
use arcane_defenders_world::{query, Tower, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::{SessionConfig, DEFAULT_SEED};

/// Failures that prevent a session from starting.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Neither the map nor the authored waypoints describe a usable route.
    #[error(
        "level `{level}` has no walkable route: the map traced to {traced} point(s) \
         and {authored} waypoint(s) are authored"
    )]
    NoRoute {
        /// Name of the level.
        level: String,
        /// Points produced by the tracer.
        traced: usize,
        /// Waypoints authored in the level record.
        authored: usize,
    },
    /// A wave references an enemy type missing from the catalog.
    #[error("wave {wave} of level `{level}` spawns unknown enemy `{enemy}`")]
    UnknownEnemy {
        /// Name of the level.
        level: String,
        /// One-based wave number.
        wave: usize,
        /// Unresolved enemy type.
        enemy: EnemyTypeId,
    },
    /// The configured game speed is not a positive finite multiplier.
    #[error("game speed must be a positive finite multiplier, got {0}")]
    InvalidSpeed(f32),
    /// The configured spawn jitter is negative or not finite.
    #[error("spawn jitter must be a finite non-negative distance, got {0}")]
    InvalidJitter(f32),
    /// A level record could not be parsed.
    #[error("could not parse level record")]
    InvalidLevel(#[from] serde_json::Error),
}

/// One running level.
#[derive(Debug)]
pub struct Session {
    level: LevelDefinition,
    world: World,
    catalog: EnemyCatalog,
    waves: WaveManager,
    economy: Economy,
    behavior: EnemyBehavior,
    combat: TowerCombat,
    flight: ProjectileFlight,
    rng: ChaCha8Rng,
    speed: f32,
    paused: bool,
    spawn_jitter: f32,
    meteor_cooldown: Duration,
    elapsed: Duration,
    selected: Option<TowerId>,
    spawns: Vec<SpawnRequest>,
}

impl Session {
    /// Prepares a level for play.
    ///
    /// The route is traced from the map; when the trace yields fewer than two
    /// points the level's authored waypoints are used instead.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is unusable, a wave references an enemy
    /// the catalog cannot resolve, or no route can be derived.
    pub fn new(
        level: &LevelDefinition,
        catalog: EnemyCatalog,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        for (index, wave) in level.waves.iter().enumerate() {
            for group in &wave.groups {
                if catalog.get(&group.enemy).is_none() {
                    return Err(SessionError::UnknownEnemy {
                        level: level.name.clone(),
                        wave: index + 1,
                        enemy: group.enemy.clone(),
                    });
                }
            }
        }

        let grid = grid_from_ascii(&level.map);
        let route = resolve_route(level, &grid)?;
        info!(
            level = %level.name,
            waypoints = route.len(),
            waves = level.waves.len(),
            seed = config.seed,
            "session ready"
        );

        Ok(Self {
            level: level.clone(),
            world: World::new(grid, route),
            catalog,
            waves: WaveManager::new(level.waves.clone()),
            economy: Economy::new(level.starting_gold, level.lives),
            behavior: EnemyBehavior::new(),
            combat: TowerCombat::new(),
            flight: ProjectileFlight::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            speed: config.speed,
            paused: false,
            spawn_jitter: config.spawn_jitter,
            meteor_cooldown: Duration::ZERO,
            elapsed: Duration::ZERO,
            selected: None,
            spawns: Vec::new(),
        })
    }

    /// Name of the level being played.
    #[must_use]
    pub fn level_name(&self) -> &str {
        &self.level.name
    }

    /// Read-only view of the battlefield.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Player purse and scorecard.
    #[must_use]
    pub const fn economy(&self) -> &Economy {
        &self.economy
    }

    /// Wave schedule.
    #[must_use]
    pub const fn waves(&self) -> &WaveManager {
        &self.waves
    }

    /// Current game speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Reports whether ticks are withheld.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reports whether the level ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.economy.is_game_over()
    }

    /// Simulated time elapsed, game speed included.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Cooldown left before the next meteor.
    #[must_use]
    pub const fn meteor_cooldown(&self) -> Duration {
        self.meteor_cooldown
    }

    /// Tower most recently selected by the player.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerId> {
        self.selected
    }

    /// Applies a player command, settling any purse changes it causes.
    ///
    /// Commands arriving after the level ended are ignored.
    pub fn apply(&mut self, command: Command, out: &mut Outbox) {
        if self.is_over() {
            debug!(?command, "level over; ignoring command");
            return;
        }

        let mark = out.events.len();
        match command {
            Command::PlaceTower { kind, cell } => self.place_tower(kind, cell, out),
            Command::UpgradeTower { tower } => self.upgrade_tower(tower, out),
            Command::SellTower { tower } => self.sell_tower(tower, out),
            Command::SelectTower { tower } => {
                if query::tower(&self.world, tower).is_some() {
                    self.selected = Some(tower);
                    out.emit(Event::TowerSelected { tower });
                } else {
                    debug!(tower = tower.get(), "selection of missing tower ignored");
                }
            }
            Command::StartNextWave => match self.waves.start_next_wave(out) {
                WaveStart::Started { wave } => {
                    info!(wave, total = self.waves.total_waves(), "wave started");
                }
                WaveStart::Exhausted => info!("no waves remain"),
                WaveStart::Rejected => {
                    debug!(phase = ?self.waves.phase(), "wave start rejected");
                    out.emit(Event::WaveStartRejected);
                }
            },
            Command::SetGameSpeed { multiplier } => {
                if multiplier.is_finite() && multiplier > 0.0 {
                    self.speed = multiplier;
                } else {
                    debug!(multiplier, "ignoring unusable game speed");
                }
            }
            Command::SetPaused { paused } => self.paused = paused,
            Command::CastMeteor { at } => self.cast_meteor(at, out),
        }
        self.settle(mark, out);
    }

    /// Advances the simulation by a wall-clock delta and flushes cues.
    ///
    /// The delta is scaled by the game speed. Paused or finished sessions
    /// only flush cues left in the outbox by earlier commands.
    pub fn update<P>(&mut self, delta: Duration, out: &mut Outbox, presentation: &mut P)
    where
        P: Presentation + ?Sized,
    {
        if !self.paused && !self.is_over() {
            self.tick(delta.mul_f64(f64::from(self.speed)), out);
        }
        flush_cues(out, presentation);
    }

    fn tick(&mut self, delta: Duration, out: &mut Outbox) {
        let mark = out.events.len();
        self.elapsed = self.elapsed.saturating_add(delta);

        self.spawns.clear();
        self.waves.update(delta, &mut self.spawns);
        let spawns = std::mem::take(&mut self.spawns);
        for request in &spawns {
            self.spawn(request, out);
        }
        self.spawns = spawns;

        {
            let parts = self.world.parts_mut();
            self.behavior
                .handle(parts.route, parts.enemies.as_mut_slice(), delta, out);
        }
        let _ = self.world.reap_enemies();

        // Leaks settle first so a defeat cannot also clear the wave.
        self.settle(mark, out);
        if self.is_over() {
            return;
        }
        let mark = out.events.len();

        self.world.reset_buffs();
        {
            let parts = self.world.parts_mut();
            self.combat.handle(
                parts.route,
                parts.enemies.as_mut_slice(),
                parts.towers,
                parts.projectiles,
                delta,
                &mut self.rng,
                out,
            );
            self.flight.handle(
                parts.enemies.as_mut_slice(),
                parts.projectiles.as_mut_slice(),
                delta,
                &mut self.rng,
                out,
            );
        }
        self.world.sweep_projectiles();

        let living = query::living_enemy_count(&self.world);
        let _ = self.waves.check_wave_complete(living, out);

        self.meteor_cooldown = self.meteor_cooldown.saturating_sub(delta);
        self.settle(mark, out);
    }

    fn spawn(&mut self, request: &SpawnRequest, out: &mut Outbox) {
        let Some(stats) = self.catalog.scaled(&request.enemy, request.wave) else {
            warn!(enemy = %request.enemy, "skipping spawn of unknown enemy");
            return;
        };
        let jitter = self.spawn_jitter;
        let offset = if jitter > 0.0 {
            Vec2::new(
                self.rng.gen_range(-jitter..=jitter),
                self.rng.gen_range(-jitter..=jitter),
            )
        } else {
            Vec2::ZERO
        };
        let _ = self.world.spawn_enemy(stats, offset, out);
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out: &mut Outbox) {
        let cost = kind.definition().cost;
        let verdict = if self.level.unlocks(kind) {
            self.world.check_placement(cell).and_then(|()| {
                if self.economy.can_afford(cost) {
                    Ok(())
                } else {
                    Err(PlacementError::InsufficientGold)
                }
            })
        } else {
            Err(PlacementError::Locked)
        };

        let placed = verdict.and_then(|()| self.world.place_tower(kind, cell, out));
        match placed {
            Ok(tower) => {
                let _ = self.economy.spend(cost, out);
                debug!(tower = tower.get(), %kind, ?cell, "tower placed");
            }
            Err(reason) => {
                debug!(%kind, ?cell, ?reason, "tower placement rejected");
                out.emit(Event::TowerPlacementRejected { kind, cell, reason });
            }
        }
    }

    fn upgrade_tower(&mut self, tower: TowerId, out: &mut Outbox) {
        let verdict = match query::tower(&self.world, tower).map(Tower::next_upgrade_cost) {
            None => Err(UpgradeError::MissingTower),
            Some(None) => Err(UpgradeError::MaxLevel),
            Some(Some(cost)) if !self.economy.can_afford(cost) => {
                Err(UpgradeError::InsufficientGold)
            }
            Some(Some(cost)) => self.world.upgrade_tower(tower, out).map(|level| (cost, level)),
        };

        match verdict {
            Ok((cost, level)) => {
                let _ = self.economy.spend(cost, out);
                debug!(tower = tower.get(), level, "tower upgraded");
            }
            Err(reason) => {
                debug!(tower = tower.get(), ?reason, "tower upgrade rejected");
                out.emit(Event::TowerUpgradeRejected { tower, reason });
            }
        }
    }

    fn sell_tower(&mut self, tower: TowerId, out: &mut Outbox) {
        let Some(refund) = self.world.sell_tower(tower, out) else {
            debug!(tower = tower.get(), "sale of missing tower rejected");
            out.emit(Event::TowerSaleRejected { tower });
            return;
        };
        self.economy.earn(refund, out);
        if self.selected == Some(tower) {
            self.selected = None;
        }
    }

    fn cast_meteor(&mut self, at: Vec2, out: &mut Outbox) {
        if !self.meteor_cooldown.is_zero() {
            debug!(remaining = ?self.meteor_cooldown, "meteor still cooling down");
            out.emit(Event::MeteorRejected {
                remaining: self.meteor_cooldown,
            });
            return;
        }
        self.meteor_cooldown = METEOR_COOLDOWN;
        out.cue(Cue::MeteorImpact {
            at,
            radius: METEOR_RADIUS,
        });

        let mut struck = 0;
        for enemy in self.world.parts_mut().enemies.as_mut_slice() {
            if !enemy.is_alive() {
                continue;
            }
            let distance = enemy.position().distance(at);
            if distance > METEOR_RADIUS {
                continue;
            }
            let damage = (METEOR_PEAK_DAMAGE * (1.0 - distance / METEOR_FALLOFF_DISTANCE))
                .max(METEOR_MIN_DAMAGE);
            let _ = enemy.take_damage(damage, out);
            enemy.apply_status(StatusKind::Burn, METEOR_BURN_DPS, METEOR_BURN_DURATION);
            struck += 1;
        }
        out.emit(Event::MeteorCast { at, struck });
    }

    /// Books kills, leaks and wave completions reported since `mark`.
    fn settle(&mut self, mark: usize, out: &mut Outbox) {
        let mut index = mark;
        while index < out.events.len() {
            let event = out.events[index].clone();
            match event {
                Event::EnemyKilled { gold, .. } => self.economy.add_kill(gold, out),
                Event::EnemyReachedEnd { damage, .. } => self.economy.lose_life(damage, out),
                Event::WaveComplete { wave } => {
                    info!(wave, "wave cleared");
                    self.economy.complete_wave(out);
                }
                Event::AllWavesComplete => {
                    info!(level = %self.level.name, "every wave cleared");
                    self.economy.complete_level(out);
                }
                Event::GameOver { victory } => {
                    info!(victory, score = self.economy.score(), "game over");
                }
                _ => {}
            }
            index += 1;
        }
    }
}

/// Hands every buffered cue to the presentation layer and empties the buffer.
pub fn flush_cues<P>(out: &mut Outbox, presentation: &mut P)
where
    P: Presentation + ?Sized,
{
    for cue in out.cues.drain(..) {
        presentation.cue(&cue);
    }
}

fn resolve_route(level: &LevelDefinition, grid: &MapGrid) -> Result<Route, SessionError> {
    let trace = PathTracer::new().trace(grid);
    if trace.route.is_walkable() {
        return Ok(trace.route);
    }
    if level.waypoints.len() >= 2 {
        debug!(
            level = %level.name,
            outcome = ?trace.outcome,
            "map did not trace; using authored waypoints"
        );
        return Ok(Route::from_points(level.waypoints.clone()));
    }
    Err(SessionError::NoRoute {
        level: level.name.clone(),
        traced: trace.route.len(),
        authored: level.waypoints.len(),
    })
}
