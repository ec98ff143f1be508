use std::time::Duration;

use arcane_defenders_core::{EnemyCatalog, Event, LevelDefinition, Outbox, Vec2};
use arcane_defenders_system_spawning::{SpawnRequest, WaveManager, WaveStart};
use arcane_defenders_world::EnemyRoster;

const LEVEL: &str = r#"{
    "name": "Gate Test",
    "map": ["SPE"],
    "waves": [
        { "enemies": [ { "type": "goblin", "count": 3, "interval": 1000 } ] },
        { "enemies": [ { "type": "imp", "count": 1, "interval": 0 } ] }
    ]
}"#;

struct Harness {
    manager: WaveManager,
    roster: EnemyRoster,
    catalog: EnemyCatalog,
    out: Outbox,
}

impl Harness {
    fn new() -> Self {
        let level: LevelDefinition = serde_json::from_str(LEVEL).expect("valid level");
        Self {
            manager: WaveManager::new(level.waves),
            roster: EnemyRoster::new(),
            catalog: EnemyCatalog::builtin(),
            out: Outbox::new(),
        }
    }

    fn tick(&mut self, millis: u64) -> bool {
        let mut requests = Vec::new();
        self.manager
            .update(Duration::from_millis(millis), &mut requests);
        for SpawnRequest { enemy, wave } in requests {
            let stats = self.catalog.scaled(&enemy, wave).expect("known enemy");
            let _ = self.roster.spawn(stats, Vec2::ZERO, &mut self.out);
        }
        let living = self
            .roster
            .as_slice()
            .iter()
            .filter(|enemy| enemy.is_alive())
            .count();
        self.manager.check_wave_complete(living, &mut self.out)
    }

    fn kill_all(&mut self) {
        for enemy in self.roster.as_mut_slice() {
            enemy.die(&mut self.out);
        }
        let _ = self.roster.reap();
    }
}

#[test]
fn wave_stays_open_until_every_group_finished_spawning() {
    let mut harness = Harness::new();
    assert_eq!(
        harness.manager.start_next_wave(&mut harness.out),
        WaveStart::Started { wave: 1 }
    );

    assert!(!harness.tick(16));
    assert!(!harness.tick(1000));
    assert!(!harness.tick(1000));
    assert_eq!(harness.roster.len(), 2);

    harness.kill_all();
    assert!(!harness.tick(16), "third goblin has not spawned yet");
    assert!(!harness.tick(1000));
    assert_eq!(harness.roster.len(), 1);

    assert!(!harness.tick(16), "living goblin keeps the wave open");
    harness.kill_all();
    assert!(harness.tick(16));

    let completions: Vec<&Event> = harness
        .out
        .events
        .iter()
        .filter(|event| matches!(event, Event::WaveComplete { .. } | Event::AllWavesComplete))
        .collect();
    assert_eq!(completions, vec![&Event::WaveComplete { wave: 1 }]);
}

#[test]
fn later_waves_scale_their_enemies() {
    let mut harness = Harness::new();
    let _ = harness.manager.start_next_wave(&mut harness.out);
    for _ in 0..4 {
        let _ = harness.tick(1000);
    }
    harness.kill_all();
    assert!(harness.tick(16));

    assert_eq!(
        harness.manager.start_next_wave(&mut harness.out),
        WaveStart::Started { wave: 2 }
    );
    let _ = harness.tick(16);
    let spawned = harness.out.events.iter().rev().find_map(|event| match event {
        Event::EnemySpawned { wave, .. } => Some(*wave),
        _ => None,
    });
    assert_eq!(spawned, Some(2));

    harness.kill_all();
    let _ = harness.tick(16);
    assert!(harness.out.events.contains(&Event::AllWavesComplete));
}
