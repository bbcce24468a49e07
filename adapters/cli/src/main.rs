#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless arena survival session driven
//! by a scripted autopilot.

mod autopilot;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use arena_survival_core::{Command, Event, GameConfig, GamePhase, FIXED_STEP};
use arena_survival_director::{Director, NullPresentation};
use arena_survival_storage::{JsonFileStore, MemoryStore, ScoreStore};
use arena_survival_world::query;
use clap::Parser;
use tracing::info;

use crate::autopilot::Autopilot;

#[derive(Debug, Parser)]
#[command(name = "arena-survival")]
#[command(about = "Run a headless arena survival session with a scripted player")]
struct Args {
    /// TOML file overriding the default game configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random stream; overrides the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Name recorded with the final score; overrides the configuration.
    #[arg(long)]
    player: Option<String>,
    /// JSON settings file holding the high-score table.
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Stop once this many rounds have been cleared.
    #[arg(long, default_value_t = 10)]
    max_rounds: u32,
    /// Stop after this many simulated seconds.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
}

/// Entry point for the arena survival command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(player) = &args.player {
        config.player_name = player.clone();
    }

    match &args.scores {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating {}", parent.display()))?;
            }
            run(config, JsonFileStore::new(path), &args);
        }
        None => run(config, MemoryStore::new(), &args),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid configuration {}", path.display()))
}

fn run<S: ScoreStore>(config: GameConfig, store: S, args: &Args) {
    let seed = config.seed;
    let mut director = Director::new(config, NullPresentation, store);
    let autopilot = Autopilot;
    let limit = Duration::from_secs(args.max_seconds);

    let _ = director.submit(Command::StartGame);
    let mut elapsed = Duration::ZERO;
    let mut commands = Vec::new();
    while elapsed < limit && query::phase(director.world()) == GamePhase::Playing {
        autopilot.plan(director.world(), &mut commands);
        for command in commands.drain(..) {
            let _ = director.submit(command);
        }

        let events = director.advance(FIXED_STEP);
        elapsed += FIXED_STEP;
        let cleared_enough = events.iter().any(|event| {
            matches!(event, Event::RoundCleared { round } if *round >= args.max_rounds)
        });
        if cleared_enough {
            info!(rounds = args.max_rounds, "round limit reached");
            break;
        }
    }

    let round = query::round(director.world());
    if round.phase == GamePhase::Playing {
        let _ = director.submit(Command::GameOver);
    }

    println!("=== SESSION RESULTS ===");
    println!("  Seed:       {seed:#018x}");
    println!("  Round:      {}", round.round);
    println!("  Score:      {}", round.score);
    println!("  Simulated:  {:.1}s", elapsed.as_secs_f64());
    println!();
    println!("=== HIGH SCORES ===");
    if director.high_scores().is_empty() {
        println!("  (empty)");
    }
    for (rank, entry) in director.high_scores().entries().iter().enumerate() {
        println!("  {}. {:<15} {}", rank + 1, entry.name, entry.score);
    }
}
