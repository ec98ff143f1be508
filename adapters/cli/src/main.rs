#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Arcane Defenders levels.

mod layout_transfer;

use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use arcane_defenders_core::{
    CellCoord, Command, Cue, CustomEnemyRecord, EnemyCatalog, Event, LevelDefinition, Outbox,
    Presentation, TowerKind,
};
use arcane_defenders_session::{levels, Session, SessionConfig};
use arcane_defenders_system_path_tracer::{grid_from_ascii, validate_map, PathTracer};
use arcane_defenders_world::query;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

use crate::layout_transfer::{LayoutTower, TowerLayout};

#[derive(Debug, Parser)]
#[command(name = "arcane-defenders", about = "Headless Arcane Defenders runner")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Trace and validate a level's map.
    Inspect(LevelArgs),
    /// Build towers on a level and print the resulting layout string.
    Layout {
        #[command(flatten)]
        level: LevelArgs,
        /// Towers written as `kind@column,row` or `kind@column,row:tier`.
        #[arg(long = "tower", required = true)]
        towers: Vec<TowerSpec>,
    },
    /// Play a level unattended and print a summary.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct LevelArgs {
    /// Level record in JSON. Defaults to the bundled Emerald Forest.
    #[arg(long, conflicts_with = "campaign")]
    level: Option<PathBuf>,
    /// Bundled campaign level, numbered from 1.
    #[arg(long)]
    campaign: Option<u32>,
    /// Custom enemy records in JSON, merged into the catalog.
    #[arg(long)]
    monsters: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    level: LevelArgs,
    /// Session configuration in TOML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Tower layout string to build before the first wave.
    #[arg(long)]
    layout: Option<String>,
    /// Simulated seconds before giving up.
    #[arg(long, default_value_t = 900)]
    seconds: u64,
    /// Length of a single frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

#[derive(Clone, Copy, Debug)]
struct TowerSpec(LayoutTower);

impl FromStr for TowerSpec {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (kind, placement) = value
            .split_once('@')
            .with_context(|| format!("tower `{value}` must look like kind@column,row"))?;
        let (cell, tier) = match placement.split_once(':') {
            Some((cell, tier)) => (
                cell,
                tier.parse()
                    .with_context(|| format!("invalid tier in tower `{value}`"))?,
            ),
            None => (placement, 0),
        };
        let (column, row) = cell
            .split_once(',')
            .with_context(|| format!("tower `{value}` is missing its row"))?;

        Ok(Self(LayoutTower {
            kind: TowerKind::from_str(kind)?,
            cell: CellCoord::new(
                column
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid column in tower `{value}`"))?,
                row.trim()
                    .parse()
                    .with_context(|| format!("invalid row in tower `{value}`"))?,
            ),
            tier,
        }))
    }
}

/// Counts cues and echoes them at trace level.
#[derive(Debug, Default)]
struct CueLog {
    seen: usize,
}

impl Presentation for CueLog {
    fn cue(&mut self, cue: &Cue) {
        self.seen += 1;
        trace!(?cue, "cue");
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    level: String,
    victory: Option<bool>,
    elapsed_ms: u128,
    waves_cleared: usize,
    total_waves: usize,
    cues: usize,
    economy: serde_json::Value,
    layout: String,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    match Cli::parse().command {
        Mode::Inspect(args) => inspect(&args),
        Mode::Layout { level, towers } => layout(&level, &towers),
        Mode::Simulate(args) => simulate(&args),
    }
}

fn load_level(args: &LevelArgs) -> Result<LevelDefinition> {
    if let Some(number) = args.campaign {
        return levels::by_number(number)
            .context("bundled level is malformed")?
            .with_context(|| format!("there is no campaign level {number}"));
    }
    match &args.level {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read level at {}", path.display()))?;
            levels::parse(&contents)
                .with_context(|| format!("failed to parse level at {}", path.display()))
        }
        None => levels::emerald_forest().context("bundled level is malformed"),
    }
}

fn load_catalog(args: &LevelArgs) -> Result<EnemyCatalog> {
    let mut catalog = EnemyCatalog::builtin();
    if let Some(path) = &args.monsters {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read monsters at {}", path.display()))?;
        let records: Vec<CustomEnemyRecord> =
            serde_json::from_str(&contents).context("failed to parse monster records")?;
        info!(count = records.len(), "registering custom enemies");
        catalog.register_custom(records)?;
    }
    Ok(catalog)
}

fn load_config(args: &SimulateArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse session config toml contents")?
        }
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn inspect(args: &LevelArgs) -> Result<()> {
    let level = load_level(args)?;
    let grid = grid_from_ascii(&level.map);
    let trace = PathTracer::new().trace(&grid);

    println!("{} ({}x{})", level.name, grid.columns(), grid.rows());
    println!("trace: {:?}", trace.outcome);
    for point in trace.route.points() {
        println!("  ({}, {})", point.x, point.y);
    }
    if !trace.route.is_walkable() && level.waypoints.len() >= 2 {
        println!("authored waypoints: {}", level.waypoints.len());
    }
    for warning in validate_map(&grid) {
        println!("warning: {warning}");
    }
    Ok(())
}

fn layout(args: &LevelArgs, towers: &[TowerSpec]) -> Result<()> {
    let level = load_level(args)?;
    let mut session = Session::new(&level, load_catalog(args)?, SessionConfig::default())?;
    let towers: Vec<LayoutTower> = towers.iter().map(|spec| spec.0).collect();
    build(&mut session, &towers);

    println!("{}", TowerLayout::capture(session.world()).encode()?);
    Ok(())
}

fn simulate(args: &SimulateArgs) -> Result<()> {
    let level = load_level(&args.level)?;
    let config = load_config(args)?;
    let mut session = Session::new(&level, load_catalog(&args.level)?, config)?;

    if let Some(encoded) = &args.layout {
        let layout = TowerLayout::decode(encoded).context("failed to decode tower layout")?;
        let grid = query::grid(session.world());
        if !layout.fits(grid.columns(), grid.rows()) {
            bail!(
                "layout was captured on a {}x{} map but {} is {}x{}",
                layout.columns,
                layout.rows,
                level.name,
                grid.columns(),
                grid.rows()
            );
        }
        build(&mut session, &layout.towers);
    }

    if args.frame_ms == 0 {
        bail!("frame length must be at least one millisecond");
    }
    let frame = Duration::from_millis(args.frame_ms);
    let frames = args.seconds.saturating_mul(1000) / args.frame_ms;
    let mut out = Outbox::new();
    let mut cues = CueLog::default();
    let mut victory = None;

    for _ in 0..frames {
        if !session.waves().is_active() {
            session.apply(Command::StartNextWave, &mut out);
        }
        session.update(frame, &mut out, &mut cues);
        for event in out.events.drain(..) {
            if let Event::GameOver { victory: won } = event {
                victory = Some(won);
            }
        }
        if session.is_over() {
            break;
        }
    }
    if victory.is_none() {
        warn!(seconds = args.seconds, "simulation ran out of time");
    }

    let summary = Summary {
        level: session.level_name().to_owned(),
        victory,
        elapsed_ms: session.elapsed().as_millis(),
        waves_cleared: session.waves().current_wave(),
        total_waves: session.waves().total_waves(),
        cues: cues.seen,
        economy: serde_json::to_value(session.economy())?,
        layout: TowerLayout::capture(session.world()).encode()?,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Places each tower and upgrades it to its tier, skipping what the purse
/// or the map refuses.
fn build(session: &mut Session, towers: &[LayoutTower]) {
    let mut out = Outbox::new();
    for tower in towers {
        session.apply(
            Command::PlaceTower {
                kind: tower.kind,
                cell: tower.cell,
            },
            &mut out,
        );
        let Some(id) = query::tower_at(session.world(), tower.cell) else {
            warn!(kind = %tower.kind, cell = ?tower.cell, "layout tower could not be built");
            continue;
        };
        for _ in 0..tower.tier {
            session.apply(Command::UpgradeTower { tower: id }, &mut out);
        }
        let level = query::tower(session.world(), id).map_or(0, |built| built.level());
        if level < tower.tier {
            warn!(kind = %tower.kind, level, tier = tower.tier, "layout tower stopped short of its tier");
        }
    }
    info!(
        towers = query::towers(session.world()).count(),
        gold = session.economy().gold(),
        "layout built"
    );
}
