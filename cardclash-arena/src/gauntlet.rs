//! Gauntlet - one candidate formation against a pool of opponents
//!
//! Level 2 - Phase-level implementation

use cardclash_core::{BattleError, Formation};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::ArenaConfig;
use crate::pairing::{play_pairing, PairingResult, Tally};

/// Result of a gauntlet run
#[derive(Clone, Debug, Serialize)]
pub struct GauntletResult {
    /// Aggregate record of the candidate
    pub tally: Tally,
    /// Average rounds played per match
    pub avg_rounds: f32,
    /// One pairing per opponent, in pool order
    pub pairings: Vec<PairingResult>,
}

impl GauntletResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self {
            tally: Tally::default(),
            avg_rounds: 0.0,
            pairings: Vec::new(),
        }
    }

    /// Score (wins + 0.5 * draws)
    pub fn score(&self) -> f32 {
        self.tally.score()
    }

    /// Win rate (wins / total matches)
    pub fn win_rate(&self) -> f32 {
        self.tally.win_rate()
    }
}

/// Run the candidate against every opponent (Level 2 phase)
///
/// The candidate always plays as player. Results are identical whether run
/// in parallel or sequentially; the first invalid formation aborts the run.
pub fn run_gauntlet(
    candidate: &Formation,
    opponents: &[Formation],
    config: &ArenaConfig,
) -> Result<GauntletResult, BattleError> {
    if opponents.is_empty() {
        return Ok(GauntletResult::empty());
    }

    tracing::info!(
        candidate = %candidate.name,
        opponents = opponents.len(),
        mode = %config.mode.name,
        "running gauntlet"
    );

    let pairings = play_against_opponents(candidate, opponents, config)?;
    Ok(aggregate_gauntlet(pairings))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Play candidate against all opponents; the candidate has no pool index
fn play_against_opponents(
    candidate: &Formation,
    opponents: &[Formation],
    config: &ArenaConfig,
) -> Result<Vec<PairingResult>, BattleError> {
    let play = |(j, opponent): (usize, &Formation)| {
        play_pairing((None, candidate), (j, opponent), config)
    };

    if config.parallel {
        opponents.par_iter().enumerate().map(play).collect()
    } else {
        opponents.iter().enumerate().map(play).collect()
    }
}

/// Aggregate pairing results into a gauntlet result
fn aggregate_gauntlet(pairings: Vec<PairingResult>) -> GauntletResult {
    let mut tally = Tally::default();
    let mut total_rounds = 0usize;

    for pairing in &pairings {
        tally.record(pairing.winner, true);
        total_rounds += pairing.rounds_played;
    }

    let avg_rounds = if pairings.is_empty() {
        0.0
    } else {
        total_rounds as f32 / pairings.len() as f32
    };

    GauntletResult {
        tally,
        avg_rounds,
        pairings,
    }
}
