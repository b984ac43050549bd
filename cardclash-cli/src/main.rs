//! CardClash CLI - Command-line interface
//!
//! Commands:
//! - battle: Resolve one battle between two formations
//! - ghost: Assemble a ghost formation from an inventory
//! - gauntlet: Play a candidate against a pool of formations
//! - league: Round robin over a pool of formations
//! - modes: Print the preset mode configurations

mod arena_cmd;
mod battle_cmd;
mod ghost_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardclash_core::{BattleModeConfig, BATTLE_MODES};

#[derive(Parser)]
#[command(name = "cardclash")]
#[command(about = "CardClash battle resolver")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one battle between two formations
    Battle(battle_cmd::BattleArgs),
    /// Assemble a ghost formation from an inventory
    Ghost(ghost_cmd::GhostArgs),
    /// Play a candidate formation against a pool
    Gauntlet(arena_cmd::GauntletArgs),
    /// Round robin over a pool of formations
    League(arena_cmd::LeagueArgs),
    /// Print the preset mode configurations as JSON
    Modes,
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Battle(args) => battle_cmd::run(args),
        Commands::Ghost(args) => ghost_cmd::run(args, cli.seed),
        Commands::Gauntlet(args) => arena_cmd::run_gauntlet_cmd(args),
        Commands::League(args) => arena_cmd::run_league_cmd(args),
        Commands::Modes => {
            let presets: Vec<BattleModeConfig> =
                BATTLE_MODES.iter().map(|&m| BattleModeConfig::preset(m)).collect();
            println!("{}", serde_json::to_string_pretty(&presets)?);
            Ok(())
        }
    }
}
