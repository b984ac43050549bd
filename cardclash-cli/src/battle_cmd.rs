//! Battle command - resolve one match between two formations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_inputs(), settle_into_profile(), settle_both_profiles(), report_result()
//! - Level 3: resolve_mode(), profile_location()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use cardclash_core::{
    apply_match, apply_result, resolve_battle, BattleMode, BattleModeConfig, Formation, JsonFileStore,
    MatchResult, OpponentKind, PlayerProfile, Winner,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BattleArgs {
    /// Player formation JSON file
    #[arg(long, value_name = "FILE")]
    pub player: PathBuf,

    /// Opponent formation JSON file
    #[arg(long, value_name = "FILE")]
    pub opponent: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Opponent is a ghost (rewards halved, no card exchange)
    #[arg(long)]
    pub ghost: bool,

    /// Settle the result into this profile JSON file
    #[arg(long, value_name = "FILE", requires = "match_id")]
    pub profile: Option<PathBuf>,

    /// Also settle the opponent's side into this profile JSON file
    #[arg(long, value_name = "FILE", requires = "profile", conflicts_with = "ghost")]
    pub opponent_profile: Option<PathBuf>,

    /// Unique id for this match, used when settling
    #[arg(long, value_name = "ID")]
    pub match_id: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Mode selection shared by every command
#[derive(Args, Clone)]
pub struct ModeArgs {
    /// Preset mode (one-card, triple-threat, standard-5, shadow-5)
    #[arg(long, default_value = "standard-5", conflicts_with = "config")]
    pub mode: String,

    /// Custom mode configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ModeArgs {
    /// Resolve the mode flags into a validated configuration
    pub fn resolve(&self) -> Result<BattleModeConfig> {
        resolve_mode(&self.mode, self.config.as_deref())
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run battle command
///
/// 1. Load formations and mode
/// 2. Resolve the battle
/// 3. Optionally settle into one or both profiles
/// 4. Report the result
pub fn run(args: BattleArgs) -> Result<()> {
    let (player, opponent, config) = load_inputs(&args)?;
    let kind = if args.ghost {
        OpponentKind::Ghost
    } else {
        OpponentKind::Live
    };

    tracing::info!(
        "Starting battle: {} vs {} ({}, {:?})",
        player.name,
        opponent.name,
        config.name,
        kind
    );

    let result = resolve_battle(&player, &opponent, &config, kind)?;

    match (&args.profile, &args.opponent_profile, &args.match_id) {
        (Some(profile), Some(opponent_profile), Some(match_id)) => {
            settle_both_profiles(profile, opponent_profile, match_id, &result, &config)?
        }
        (Some(profile), None, Some(match_id)) => settle_into_profile(profile, match_id, &result)?,
        _ => {}
    }

    report_result(&result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_inputs(args: &BattleArgs) -> Result<(Formation, Formation, BattleModeConfig)> {
    let player = Formation::load(&args.player)
        .with_context(|| format!("Failed to load player formation: {}", args.player.display()))?;
    let opponent = Formation::load(&args.opponent)
        .with_context(|| format!("Failed to load opponent formation: {}", args.opponent.display()))?;
    let config = args.mode.resolve()?;
    Ok((player, opponent, config))
}

/// Apply the result to a profile file in one load/settle/save
fn settle_into_profile(path: &Path, match_id: &str, result: &MatchResult) -> Result<()> {
    let (dir, id) = profile_location(path)?;
    let mut store = JsonFileStore::new(dir);
    let profile = apply_result(&mut store, &id, match_id, result)?;
    log_profile(&profile);
    Ok(())
}

/// Settle the player's and the opponent's profiles together
fn settle_both_profiles(
    player_path: &Path,
    opponent_path: &Path,
    match_id: &str,
    result: &MatchResult,
    config: &BattleModeConfig,
) -> Result<()> {
    let (dir, player_id) = profile_location(player_path)?;
    let (opponent_dir, opponent_id) = profile_location(opponent_path)?;
    if dir != opponent_dir {
        anyhow::bail!(
            "Profiles must share a directory: {} and {}",
            player_path.display(),
            opponent_path.display()
        );
    }

    let mut store = JsonFileStore::new(dir);
    let (player, opponent) = apply_match(&mut store, &player_id, &opponent_id, match_id, result, config)?;
    log_profile(&player);
    log_profile(&opponent);
    Ok(())
}

fn report_result(result: &MatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_text_result(result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Preset by name, or a custom config file when given
pub fn resolve_mode(name: &str, config: Option<&Path>) -> Result<BattleModeConfig> {
    if let Some(path) = config {
        return BattleModeConfig::load(path)
            .with_context(|| format!("Failed to load mode config: {}", path.display()));
    }
    let mode = BattleMode::from_name(name).with_context(|| format!("Unknown mode: {}", name))?;
    Ok(BattleModeConfig::preset(mode))
}

/// Directory and profile id of a profile file
fn profile_location(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path.parent().map(PathBuf::from).unwrap_or_default();
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Invalid profile path: {}", path.display()))?;
    Ok((dir, id.to_string()))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn log_profile(profile: &PlayerProfile) {
    tracing::info!(
        "Profile {} settled: rating={}, coins={}, record={}-{}-{}",
        profile.id,
        profile.rating,
        profile.coins,
        profile.wins,
        profile.losses,
        profile.draws
    );
}

fn headline(winner: Winner) -> &'static str {
    match winner {
        Winner::Player => "VICTORY",
        Winner::Opponent => "DEFEAT",
        Winner::Draw => "DRAW",
    }
}

/// Print result as text
fn print_text_result(result: &MatchResult) {
    println!("\n=== {} ({}-{}) ===", headline(result.winner), result.player_wins, result.opponent_wins);

    for round in &result.rounds {
        println!(
            "  Round {}: {} [{}] {} vs {} {} [{}] -> {} ({:?})",
            round.round_index + 1,
            round.player_unit.name,
            round.player_unit.unit_type,
            round.player_effective_power,
            round.opponent_effective_power,
            round.opponent_unit.name,
            round.opponent_unit.unit_type,
            round.winner,
            round.reason
        );
    }

    println!(
        "\nRewards: {} coins, {} exp, {:+} rating",
        result.rewards.coins, result.rewards.experience, result.rewards.rating_change
    );

    if let Some(exchange) = &result.card_exchange {
        for card in &exchange.cards_gained {
            println!("  Captured: {} ({})", card.name, card.id);
        }
        for card in &exchange.cards_lost {
            println!("  Forfeited: {} ({})", card.name, card.id);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
