//! Arena Duel - command line match runner
//!
//! Resolves one match from TOML inputs and prints the battle log.

use std::path::PathBuf;

use arena_duel::arena::ArenaSimulator;
use arena_duel::combatant::PlayerDigest;
use arena_duel::core::error::Result;
use arena_duel::core::MatchConfig;
use arena_duel::tables::ArenaSheets;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Resolve an arena match and print its battle log
#[derive(Parser, Debug)]
#[command(name = "arena-duel")]
#[command(about = "Resolve a deterministic arena match from TOML digests")]
struct Args {
    /// Challenger digest (TOML)
    #[arg(long)]
    challenger: PathBuf,

    /// Opponent digest (TOML)
    #[arg(long)]
    opponent: PathBuf,

    /// Skill and rune sheets (TOML)
    #[arg(long)]
    sheets: PathBuf,

    /// Match config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed; the same seed always replays the same match
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arena_duel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MatchConfig::load_from_toml(path)?,
        None => MatchConfig::default(),
    };
    let sheets = ArenaSheets::load_from_toml(&args.sheets)?;
    let challenger = PlayerDigest::load_from_toml(&args.challenger)?;
    let opponent = PlayerDigest::load_from_toml(&args.opponent)?;

    tracing::info!(
        "{} vs {} (seed {})",
        challenger.name,
        opponent.name,
        args.seed
    );

    let log = ArenaSimulator::seeded(args.seed, config)?.simulate(&challenger, &opponent, &sheets)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&log)?),
        OutputFormat::Text => {
            for event in &log.events {
                println!("{}", event);
            }
            println!("result: {:?} after {} turns", log.result, log.turn_count());
        }
    }

    Ok(())
}
