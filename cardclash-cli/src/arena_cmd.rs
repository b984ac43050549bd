//! Arena commands - gauntlet and league over a directory of formations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_gauntlet_cmd(), run_league_cmd() - orchestration
//! - Level 2: load_pool(), report_*()
//! - Level 4: file I/O, formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use cardclash_arena::{run_gauntlet, run_league, ArenaConfig, GauntletResult, LeagueResult};
use cardclash_core::Formation;

use crate::battle_cmd::ModeArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GauntletArgs {
    /// Candidate formation JSON file
    #[arg(long, value_name = "FILE")]
    pub candidate: PathBuf,

    /// Directory of opponent formation JSON files
    #[arg(long, value_name = "DIR")]
    pub pool: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Run matches in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct LeagueArgs {
    /// Directory of entrant formation JSON files
    #[arg(long, value_name = "DIR")]
    pub pool: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Run matches in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run_gauntlet_cmd(args: GauntletArgs) -> Result<()> {
    let candidate = Formation::load(&args.candidate)
        .with_context(|| format!("Failed to load candidate: {}", args.candidate.display()))?;
    let opponents = load_pool(&args.pool)?;
    let config = ArenaConfig::default()
        .with_mode(args.mode.resolve()?)
        .with_parallel(args.parallel);

    let result = run_gauntlet(&candidate, &opponents, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_gauntlet(&candidate, &opponents, &result);
    }
    Ok(())
}

pub fn run_league_cmd(args: LeagueArgs) -> Result<()> {
    let entrants = load_pool(&args.pool)?;
    let config = ArenaConfig::default()
        .with_mode(args.mode.resolve()?)
        .with_parallel(args.parallel);

    let result = run_league(&entrants, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_league(&result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load every `*.json` formation in a directory, sorted by file name
pub fn load_pool(dir: &Path) -> Result<Vec<Formation>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read pool directory: {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut pool = Vec::with_capacity(paths.len());
    for path in paths {
        let mut formation = Formation::load(&path)?;
        if formation.name.is_empty() {
            formation.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        tracing::debug!("Loaded formation: {}", path.display());
        pool.push(formation);
    }

    if pool.is_empty() {
        tracing::warn!("No formations found in {}", dir.display());
    }
    Ok(pool)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_gauntlet(candidate: &Formation, opponents: &[Formation], result: &GauntletResult) {
    println!("\n=== Gauntlet: {} ===", candidate.name);
    println!(
        "Record: {}-{}-{} (win rate {:.1}%, score {:.1})",
        result.tally.wins,
        result.tally.losses,
        result.tally.draws,
        result.win_rate() * 100.0,
        result.score()
    );
    println!("Avg rounds: {:.1}", result.avg_rounds);

    for pairing in &result.pairings {
        println!(
            "  vs {}: {} ({}-{})",
            opponents[pairing.opponent].name, pairing.winner, pairing.player_wins, pairing.opponent_wins
        );
    }
}

fn print_league(result: &LeagueResult) {
    println!("\n=== League Standings ===");
    for (rank, standing) in result.standings.iter().enumerate() {
        println!(
            "{:>3}. {:<24} {:>5.1}  ({}-{}-{})",
            rank + 1,
            standing.name,
            standing.score,
            standing.tally.wins,
            standing.tally.losses,
            standing.tally.draws
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardclash_core::{Unit, UnitType};

    #[test]
    fn test_load_pool_sorted_and_named() {
        let dir = std::env::temp_dir().join(format!("cardclash-pool-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let unit = |id: &str| Unit::new(id, id, UnitType::Rock, 10);
        Formation::from_units("", vec![unit("b")]).save(&dir.join("beta.json")).unwrap();
        Formation::from_units("alpha", vec![unit("a")]).save(&dir.join("a.json")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let pool = load_pool(&dir).unwrap();
        let names: Vec<&str> = pool.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_pool_reports_errors() {
        let dir = std::env::temp_dir().join(format!("cardclash-bad-pool-{}", std::process::id()));
        assert!(load_pool(&dir).is_err());

        // A directory named like a formation cannot be read as one
        std::fs::create_dir_all(dir.join("broken.json")).unwrap();
        assert!(load_pool(&dir).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
