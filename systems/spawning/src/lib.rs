#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that staggers enemy spawns and detects wave completion.

use std::time::Duration;

use arcane_defenders_core::{EnemyTypeId, Event, Outbox, WaveDefinition};

/// Enemy the driver must place at the head of the route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Type of the enemy.
    pub enemy: EnemyTypeId,
    /// One-based wave number used to scale the enemy's stats.
    pub wave: u32,
}

/// Coarse progress of the wave schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// Waiting for the player to start the next wave.
    Idle,
    /// At least one group still has enemies to spawn.
    Spawning,
    /// Every group finished spawning; living enemies remain.
    AwaitingClear,
    /// The final wave was cleared.
    AllComplete,
}

/// Outcome of a request to start the next wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveStart {
    /// The wave with the provided one-based number began.
    Started {
        /// One-based wave number.
        wave: u32,
    },
    /// No waves remained, so the schedule is complete.
    Exhausted,
    /// A wave is still running or the schedule already finished.
    Rejected,
}

#[derive(Clone, Debug)]
struct GroupQueue {
    enemy: EnemyTypeId,
    remaining: u32,
    interval: Duration,
    delay: Duration,
    last_spawn: Duration,
    started: bool,
}

/// Runs the waves of a level in order.
#[derive(Clone, Debug)]
pub struct WaveManager {
    waves: Vec<WaveDefinition>,
    current: usize,
    active: bool,
    spawning: bool,
    finished: bool,
    elapsed: Duration,
    queues: Vec<GroupQueue>,
}

impl WaveManager {
    /// Creates a manager positioned before the first wave.
    #[must_use]
    pub fn new(waves: Vec<WaveDefinition>) -> Self {
        Self {
            waves,
            current: 0,
            active: false,
            spawning: false,
            finished: false,
            elapsed: Duration::ZERO,
            queues: Vec::new(),
        }
    }

    /// Number of waves in the level.
    #[must_use]
    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    /// Zero-based index of the running or next wave.
    #[must_use]
    pub const fn current_wave(&self) -> usize {
        self.current
    }

    /// One-based number of the running or next wave.
    #[must_use]
    pub fn wave_number(&self) -> u32 {
        u32::try_from(self.current + 1).unwrap_or(u32::MAX)
    }

    /// Wave that the next start request would launch.
    #[must_use]
    pub fn next_wave(&self) -> Option<&WaveDefinition> {
        if self.active {
            return None;
        }
        self.waves.get(self.current)
    }

    /// Time elapsed since the running wave started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Reports whether a wave is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Current phase of the schedule.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        if self.finished {
            WavePhase::AllComplete
        } else if !self.active {
            WavePhase::Idle
        } else if self.spawning {
            WavePhase::Spawning
        } else {
            WavePhase::AwaitingClear
        }
    }

    /// Starts the next wave, building one countdown queue per group.
    ///
    /// Emits `WaveStarted` for a new wave or `AllWavesComplete` when none
    /// remain. Requests made while a wave runs, or after the schedule
    /// finished, change nothing and report [`WaveStart::Rejected`].
    pub fn start_next_wave(&mut self, out: &mut Outbox) -> WaveStart {
        if self.active || self.finished {
            return WaveStart::Rejected;
        }

        let Some(wave) = self.waves.get(self.current) else {
            self.finished = true;
            out.emit(Event::AllWavesComplete);
            return WaveStart::Exhausted;
        };

        self.queues.clear();
        self.queues.extend(wave.groups.iter().map(|group| GroupQueue {
            enemy: group.enemy.clone(),
            remaining: group.count,
            interval: group.interval,
            delay: group.delay,
            last_spawn: Duration::ZERO,
            started: false,
        }));
        self.active = true;
        self.spawning = true;
        self.elapsed = Duration::ZERO;

        let number = self.wave_number();
        out.emit(Event::WaveStarted { wave: number });
        WaveStart::Started { wave: number }
    }

    /// Advances the wave clock and queues every spawn that fell due.
    ///
    /// Each group spawns at most once per call. A group becomes eligible once
    /// its delay has elapsed; its first enemy arrives one interval later.
    pub fn update(&mut self, delta: Duration, out: &mut Vec<SpawnRequest>) {
        if !self.active || !self.spawning {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(delta);
        let wave = self.wave_number();
        let mut exhausted = true;

        for queue in &mut self.queues {
            if queue.remaining == 0 {
                continue;
            }
            exhausted = false;

            if self.elapsed < queue.delay {
                continue;
            }
            if !queue.started {
                queue.started = true;
                queue.last_spawn = self.elapsed;
            }

            if self.elapsed.saturating_sub(queue.last_spawn) >= queue.interval {
                out.push(SpawnRequest {
                    enemy: queue.enemy.clone(),
                    wave,
                });
                queue.remaining -= 1;
                queue.last_spawn = self.elapsed;
            }
        }

        if exhausted {
            self.spawning = false;
        }
    }

    /// Completes the running wave once spawning finished and no enemy lives.
    ///
    /// Emits `WaveComplete` with the cleared wave's number, or
    /// `AllWavesComplete` after the final wave. Returns `true` when the wave
    /// completed during this call.
    pub fn check_wave_complete(&mut self, living_enemies: usize, out: &mut Outbox) -> bool {
        if !self.active || self.spawning || living_enemies > 0 {
            return false;
        }

        self.active = false;
        self.queues.clear();
        self.current += 1;

        if self.current >= self.waves.len() {
            self.finished = true;
            out.emit(Event::AllWavesComplete);
        } else {
            out.emit(Event::WaveComplete {
                wave: u32::try_from(self.current).unwrap_or(u32::MAX),
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcane_defenders_core::{EnemyKind, WaveGroup};

    fn group(kind: EnemyKind, count: u32, interval: u64, delay: u64) -> WaveGroup {
        WaveGroup {
            enemy: kind.into(),
            count,
            interval: Duration::from_millis(interval),
            delay: Duration::from_millis(delay),
        }
    }

    fn wave(groups: Vec<WaveGroup>) -> WaveDefinition {
        WaveDefinition { groups }
    }

    fn tick(manager: &mut WaveManager, millis: u64) -> Vec<SpawnRequest> {
        let mut spawned = Vec::new();
        manager.update(Duration::from_millis(millis), &mut spawned);
        spawned
    }

    #[test]
    fn idle_manager_spawns_nothing() {
        let mut manager = WaveManager::new(vec![wave(vec![group(EnemyKind::Goblin, 2, 0, 0)])]);
        assert!(tick(&mut manager, 5000).is_empty());
        assert_eq!(manager.phase(), WavePhase::Idle);
    }

    #[test]
    fn first_spawn_waits_one_interval_after_the_delay() {
        let mut manager = WaveManager::new(vec![wave(vec![group(EnemyKind::Goblin, 2, 500, 1000)])]);
        let mut out = Outbox::new();
        assert_eq!(
            manager.start_next_wave(&mut out),
            WaveStart::Started { wave: 1 }
        );

        assert!(tick(&mut manager, 1000).is_empty());
        assert!(tick(&mut manager, 400).is_empty());
        assert_eq!(tick(&mut manager, 100).len(), 1);
        assert!(tick(&mut manager, 499).is_empty());
        assert_eq!(tick(&mut manager, 1).len(), 1);
        assert_eq!(manager.phase(), WavePhase::Spawning);
        assert!(tick(&mut manager, 16).is_empty());
        assert_eq!(manager.phase(), WavePhase::AwaitingClear);
    }

    #[test]
    fn groups_spawn_at_most_once_per_update() {
        let mut manager = WaveManager::new(vec![wave(vec![
            group(EnemyKind::Goblin, 5, 0, 0),
            group(EnemyKind::Imp, 5, 0, 0),
        ])]);
        let mut out = Outbox::new();
        let _ = manager.start_next_wave(&mut out);

        let spawned = tick(&mut manager, 10_000);
        let kinds: Vec<_> = spawned.iter().map(|request| request.enemy.clone()).collect();
        assert_eq!(
            kinds,
            vec![EnemyKind::Goblin.into(), EnemyKind::Imp.into()]
        );
    }

    #[test]
    fn start_is_rejected_while_a_wave_runs() {
        let mut manager = WaveManager::new(vec![
            wave(vec![group(EnemyKind::Goblin, 1, 0, 0)]),
            wave(vec![group(EnemyKind::Goblin, 1, 0, 0)]),
        ]);
        let mut out = Outbox::new();
        let _ = manager.start_next_wave(&mut out);
        assert_eq!(manager.start_next_wave(&mut out), WaveStart::Rejected);
        assert_eq!(out.events, vec![Event::WaveStarted { wave: 1 }]);
    }

    #[test]
    fn final_wave_reports_all_complete_once() {
        let mut manager = WaveManager::new(vec![wave(vec![group(EnemyKind::Goblin, 1, 0, 0)])]);
        let mut out = Outbox::new();
        let _ = manager.start_next_wave(&mut out);
        assert_eq!(tick(&mut manager, 16).len(), 1);
        let _ = tick(&mut manager, 16);
        out.clear();

        assert!(manager.check_wave_complete(0, &mut out));
        assert_eq!(out.events, vec![Event::AllWavesComplete]);
        assert_eq!(manager.phase(), WavePhase::AllComplete);
        assert_eq!(manager.start_next_wave(&mut out), WaveStart::Rejected);
        assert_eq!(out.events.len(), 1);
    }

    #[test]
    fn empty_schedule_completes_on_first_start() {
        let mut manager = WaveManager::new(Vec::new());
        let mut out = Outbox::new();
        assert_eq!(manager.start_next_wave(&mut out), WaveStart::Exhausted);
        assert_eq!(out.events, vec![Event::AllWavesComplete]);
    }
}
