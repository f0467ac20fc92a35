#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Loop Quest and plays it headlessly.

mod config;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use loop_quest_system_bootstrap::Bootstrap;
use loop_quest_world::{query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::{Session, Strategy};

const DEFAULT_TURNS: u32 = 10;
const DEFAULT_FRAME_MS: u64 = 16;
const FRAMES_PER_TURN_LIMIT: u64 = 5_000;

/// Plays Loop Quest on a procedurally generated board.
#[derive(Debug, Parser)]
#[command(name = "loop-quest", version, about)]
struct Args {
    /// Seed for board generation and every dice roll; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of rolls to play before stopping.
    #[arg(long)]
    turns: Option<u32>,
    /// TOML file overriding the default game configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter such as `info` or `loop_quest_world=debug`; falls back to `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
    /// How the autopilot picks among offered destinations.
    #[arg(long, value_enum, default_value_t = Strategy::First)]
    strategy: Strategy,
    /// Simulated frame duration in milliseconds.
    #[arg(long)]
    frame_ms: Option<u64>,
}

/// Entry point for the Loop Quest command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let file = config::load(args.config.as_deref())?;
    let turns = args.turns.or(file.autoplay.turns).unwrap_or(DEFAULT_TURNS);
    let frame_ms = args
        .frame_ms
        .or(file.autoplay.frame_ms)
        .unwrap_or(DEFAULT_FRAME_MS);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, turns, frame_ms, "starting session");

    let world = World::with_config(file.game, seed)
        .with_context(|| format!("failed to generate a board from seed {seed}"))?;
    let bootstrap = Bootstrap;
    println!("{}", bootstrap.welcome_banner(&world));
    let overview = bootstrap.overview(&world);
    println!(
        "seed {seed}: {} regions, {} bridges, {} shops, {} tiles",
        overview.census.regions,
        overview.census.bridges,
        overview.census.shops,
        overview.census.tiles
    );

    let mut session = Session::new(
        world,
        args.strategy,
        ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        Duration::from_millis(frame_ms),
    );
    let summary = session.run(turns, u64::from(turns.max(1)) * FRAMES_PER_TURN_LIMIT);

    for line in query::log_lines(session.world()) {
        println!("{line}");
    }
    let stats = summary.player.stats;
    println!(
        "after {} turns at {}: STR {} MAG {} HP {} gold {} cards {}",
        summary.turns,
        summary.player.at,
        stats.strength,
        stats.magic,
        stats.health,
        stats.gold,
        summary.player.cards.len()
    );
    Ok(())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{level}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|error| anyhow!("cannot install logging: {error}"))
}
