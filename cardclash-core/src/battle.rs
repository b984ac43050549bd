//! Battle resolution entry point

use serde::{Deserialize, Serialize};

use crate::error::BattleError;
use crate::formation::Formation;
use crate::mode::{BattleModeConfig, RewardValues};
use crate::rewards::{compute_rewards, rewards_for, CardExchange, OpponentKind};
use crate::round::{RoundResult, Winner};
use crate::sequencer::simulate_match;

/// Complete, immutable result of one match
///
/// The single output handed to presentation and persistence. Replaying the
/// rounds with delays only reads `rounds`; it never re-runs the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Winner,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub rounds: Vec<RoundResult>,
    pub rewards: RewardValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_exchange: Option<CardExchange>,
    #[serde(default)]
    pub opponent_kind: OpponentKind,
}

impl MatchResult {
    pub fn player_won(&self) -> bool {
        self.winner == Winner::Player
    }

    pub fn is_draw(&self) -> bool {
        self.winner == Winner::Draw
    }

    /// The same match from the opponent's side
    ///
    /// Rounds, scores and the card exchange are swapped, and rewards are
    /// looked up again for the flipped outcome under the same mode.
    pub fn mirrored(&self, config: &BattleModeConfig) -> Self {
        let winner = self.winner.flipped();
        Self {
            winner,
            player_wins: self.opponent_wins,
            opponent_wins: self.player_wins,
            rounds: self.rounds.iter().map(RoundResult::mirrored).collect(),
            rewards: rewards_for(winner, config, self.opponent_kind),
            card_exchange: self.card_exchange.as_ref().map(CardExchange::mirrored),
            opponent_kind: self.opponent_kind,
        }
    }
}

/// Resolve a battle between two finalized formations
///
/// Validates everything up front; either a full result or an error, never a
/// partial match.
pub fn resolve_battle(
    player: &Formation,
    opponent: &Formation,
    config: &BattleModeConfig,
    opponent_kind: OpponentKind,
) -> Result<MatchResult, BattleError> {
    let outcome = simulate_match(player, opponent, config)?;
    let summary = compute_rewards(&outcome, config, opponent_kind);

    Ok(MatchResult {
        winner: outcome.winner,
        player_wins: outcome.player_wins,
        opponent_wins: outcome.opponent_wins,
        rounds: outcome.rounds,
        rewards: summary.rewards,
        card_exchange: summary.card_exchange,
        opponent_kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::mode::BattleMode;
    use crate::round::Reason;
    use crate::unit::{Unit, UnitType};

    #[test]
    fn test_sudden_death() {
        let config = BattleModeConfig::preset(BattleMode::OneCard);
        let player = Formation::from_units("p", vec![Unit::new("p1", "Golem", UnitType::Rock, 100)]);
        let opponent = Formation::from_units("o", vec![Unit::new("o1", "Scroll", UnitType::Paper, 100)]);

        let result = resolve_battle(&player, &opponent, &config, OpponentKind::Live).unwrap();
        assert!(result.player_won());
        assert_eq!(result.rounds.len(), 1);
        assert_eq!(result.rounds[0].player_effective_power, 130);
        assert_eq!(result.rounds[0].opponent_effective_power, 100);
        assert_eq!(result.rounds[0].reason, Reason::Advantage);
        assert_eq!(result.rewards, config.reward_table.win);
        assert!(result.card_exchange.is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BattleModeConfig::preset(BattleMode::OneCard);
        config.wins_needed = 0;
        let f = Formation::from_units("p", vec![Unit::new("a", "a", UnitType::Rock, 1)]);
        let err = resolve_battle(&f, &f, &config, OpponentKind::Live).unwrap_err();
        assert!(matches!(
            err,
            BattleError::Configuration(ConfigurationError::WinsNeededMismatch { .. })
        ));
    }

    #[test]
    fn test_mirrored_swaps_sides() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = Formation::from_units(
            "p",
            (0..5).map(|i| Unit::new(format!("p{}", i), "p", UnitType::Paper, 100)).collect(),
        );
        let opponent = Formation::from_units(
            "o",
            (0..5).map(|i| Unit::new(format!("o{}", i), "o", UnitType::Scissors, 50)).collect(),
        );

        let result = resolve_battle(&player, &opponent, &config, OpponentKind::Live).unwrap();
        let mirror = result.mirrored(&config);
        assert_eq!(mirror.winner, Winner::Opponent);
        assert_eq!((mirror.player_wins, mirror.opponent_wins), (0, 3));
        assert_eq!(mirror.rewards, config.reward_table.loss);
        assert_eq!(mirror.rounds[0].player_unit.id, "o0");
        assert_eq!(mirror.rounds[0].winner, Winner::Opponent);

        let exchange = mirror.card_exchange.clone().unwrap();
        assert!(exchange.cards_gained.is_empty());
        assert_eq!(exchange.cards_lost.len(), 1);
        assert_eq!(mirror.mirrored(&config), result);
    }

    #[test]
    fn test_result_serializes() {
        let config = BattleModeConfig::preset(BattleMode::OneCard);
        let player = Formation::from_units("p", vec![Unit::new("p1", "a", UnitType::Scissors, 80)]);
        let opponent = Formation::from_units("o", vec![Unit::new("o1", "b", UnitType::Scissors, 80)]);

        let result = resolve_battle(&player, &opponent, &config, OpponentKind::Ghost).unwrap();
        assert!(result.is_draw());

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""winner":"draw""#));
        assert!(json.contains(r#""reason":"DRAW""#));
        assert!(json.contains(r#""opponent_kind":"ghost""#));

        let parsed: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
