//! Pairing - one match between two formations
//!
//! Level 3 - Step-level implementation

use cardclash_core::{resolve_battle, BattleError, Formation, MatchResult, Winner};
use serde::Serialize;

use crate::config::ArenaConfig;

/// Result of one pairing, indexed into the caller's formation slices
#[derive(Clone, Debug, Serialize)]
pub struct PairingResult {
    /// Index of the formation playing as player; absent for a gauntlet candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<usize>,
    /// Index of the formation playing as opponent
    pub opponent: usize,
    pub winner: Winner,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub rounds_played: usize,
}

impl PairingResult {
    fn from_match(player: Option<usize>, opponent: usize, result: &MatchResult) -> Self {
        Self {
            player,
            opponent,
            winner: result.winner,
            player_wins: result.player_wins,
            opponent_wins: result.opponent_wins,
            rounds_played: result.rounds.len(),
        }
    }
}

/// Play one pairing
pub fn play_pairing(
    player: (Option<usize>, &Formation),
    opponent: (usize, &Formation),
    config: &ArenaConfig,
) -> Result<PairingResult, BattleError> {
    let result = resolve_battle(player.1, opponent.1, &config.mode, config.opponent_kind)?;
    Ok(PairingResult::from_match(player.0, opponent.0, &result))
}

/// Running win/loss/draw tally
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    /// Record a result from the point of view of one side
    pub fn record(&mut self, winner: Winner, as_player: bool) {
        match (winner, as_player) {
            (Winner::Draw, _) => self.draws += 1,
            (Winner::Player, true) | (Winner::Opponent, false) => self.wins += 1,
            _ => self.losses += 1,
        }
    }

    /// Total matches played
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Score (wins + 0.5 * draws)
    pub fn score(&self) -> f32 {
        self.wins as f32 + 0.5 * self.draws as f32
    }

    /// Win rate (wins / total matches)
    pub fn win_rate(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.wins as f32 / total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardclash_core::{BattleMode, Unit, UnitType};

    #[test]
    fn test_tally_empty() {
        let tally = Tally::default();
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.win_rate(), 0.0);
    }

    #[test]
    fn test_tally_record() {
        let mut tally = Tally::default();
        tally.record(Winner::Player, true);
        tally.record(Winner::Opponent, false);
        tally.record(Winner::Player, false);
        tally.record(Winner::Draw, true);

        assert_eq!(tally, Tally { wins: 2, losses: 1, draws: 1 });
        assert_eq!(tally.score(), 2.5);
        assert_eq!(tally.win_rate(), 0.5);
    }

    #[test]
    fn test_play_pairing() {
        let config = ArenaConfig::new(BattleMode::OneCard);
        let a = Formation::from_units("a", vec![Unit::new("a1", "a", UnitType::Rock, 100)]);
        let b = Formation::from_units("b", vec![Unit::new("b1", "b", UnitType::Paper, 100)]);

        let result = play_pairing((Some(0), &a), (1, &b), &config).unwrap();
        assert_eq!(result.winner, Winner::Player);
        assert_eq!((result.player, result.opponent), (Some(0), 1));
        assert_eq!(result.rounds_played, 1);
    }
}
