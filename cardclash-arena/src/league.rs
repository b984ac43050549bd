//! League - round robin between formations
//!
//! Level 1 - Orchestration and Level 2 - Phases

use cardclash_core::{BattleError, Formation};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::ArenaConfig;
use crate::pairing::{play_pairing, PairingResult, Tally};

/// Standing of an entrant in the league
#[derive(Clone, Debug, Serialize)]
pub struct Standing {
    /// Index of the formation in the original slice
    pub index: usize,
    /// Name of the formation
    pub name: String,
    /// Win/loss/draw record across both seats
    pub tally: Tally,
    /// Total score (wins + 0.5 * draws)
    pub score: f32,
}

/// Result of a league
#[derive(Clone, Debug, Serialize)]
pub struct LeagueResult {
    /// Final standings sorted by score, then wins, then name
    pub standings: Vec<Standing>,
    /// Every pairing played
    pub pairings: Vec<PairingResult>,
}

impl LeagueResult {
    /// Get leader (top standing)
    pub fn leader(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Get top N performers
    pub fn top_n(&self, n: usize) -> &[Standing] {
        let n = n.min(self.standings.len());
        &self.standings[..n]
    }

    /// Get standing for a specific formation index
    pub fn standing_for(&self, index: usize) -> Option<&Standing> {
        self.standings.iter().find(|s| s.index == index)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a round-robin league (Level 1 orchestration)
///
/// Every ordered pair plays once, so each entrant meets every other entrant
/// once as player and once as opponent.
pub fn run_league(entrants: &[Formation], config: &ArenaConfig) -> Result<LeagueResult, BattleError> {
    tracing::info!(
        entrants = entrants.len(),
        mode = %config.mode.name,
        "running league"
    );

    let schedule = generate_pairings(entrants.len());
    let pairings = execute_all_pairings(entrants, &schedule, config)?;
    let standings = compute_standings(entrants, &pairings);

    if let Some(leader) = standings.first() {
        tracing::info!(leader = %leader.name, score = leader.score, "league complete");
    }

    Ok(LeagueResult {
        standings,
        pairings,
    })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Generate all ordered pairings
fn generate_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::with_capacity(n * n.saturating_sub(1));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                pairings.push((i, j));
            }
        }
    }
    pairings
}

/// Execute every scheduled pairing
fn execute_all_pairings(
    entrants: &[Formation],
    schedule: &[(usize, usize)],
    config: &ArenaConfig,
) -> Result<Vec<PairingResult>, BattleError> {
    let play = |&(i, j): &(usize, usize)| {
        play_pairing((Some(i), &entrants[i]), (j, &entrants[j]), config)
    };

    if config.parallel {
        schedule.par_iter().map(play).collect()
    } else {
        schedule.iter().map(play).collect()
    }
}

/// Compute final standings from pairing results
fn compute_standings(entrants: &[Formation], pairings: &[PairingResult]) -> Vec<Standing> {
    let mut tallies = vec![Tally::default(); entrants.len()];
    for pairing in pairings {
        if let Some(player) = pairing.player {
            tallies[player].record(pairing.winner, true);
        }
        tallies[pairing.opponent].record(pairing.winner, false);
    }

    let mut standings: Vec<Standing> = entrants
        .iter()
        .zip(tallies)
        .enumerate()
        .map(|(index, (formation, tally))| Standing {
            index,
            name: formation.name.clone(),
            tally,
            score: tally.score(),
        })
        .collect();

    // Sort by score (descending), then wins (descending), then name
    standings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.tally.wins.cmp(&a.tally.wins))
            .then_with(|| a.name.cmp(&b.name))
    });

    standings
}
