//! Round evaluation
//!
//! Pure: one player slot against one opponent slot, no side effects. Inputs
//! are assumed validated by the formation check before the match starts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::advantage::matchup_multipliers;
use crate::formation::Slot;
use crate::mode::HiddenConvention;
use crate::multiplier::Multiplier;
use crate::unit::{Unit, UnitType};

/// Winner of a round or a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Opponent,
    Draw,
}

impl Winner {
    /// The same result seen from the other side
    pub fn flipped(self) -> Self {
        match self {
            Winner::Player => Winner::Opponent,
            Winner::Opponent => Winner::Player,
            Winner::Draw => Winner::Draw,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player => write!(f, "player"),
            Winner::Opponent => write!(f, "opponent"),
            Winner::Draw => write!(f, "draw"),
        }
    }
}

/// Why a round ended the way it did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The winner had the type advantage
    Advantage,
    /// The winner won on power alone
    Strength,
    Draw,
}

/// Outcome of a single evaluated round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_index: usize,
    pub player_unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_hidden: Option<Unit>,
    pub opponent_unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_hidden: Option<Unit>,
    pub player_effective_power: u32,
    pub opponent_effective_power: u32,
    pub winner: Winner,
    pub reason: Reason,
}

impl RoundResult {
    /// The round with player and opponent swapped
    pub fn mirrored(&self) -> Self {
        Self {
            round_index: self.round_index,
            player_unit: self.opponent_unit.clone(),
            player_hidden: self.opponent_hidden.clone(),
            opponent_unit: self.player_unit.clone(),
            opponent_hidden: self.player_hidden.clone(),
            player_effective_power: self.opponent_effective_power,
            opponent_effective_power: self.player_effective_power,
            winner: self.winner.flipped(),
            reason: self.reason,
        }
    }
}

/// Type and base power a slot fights with under a hidden-card convention
pub fn fighting_profile(slot: &Slot, convention: HiddenConvention) -> (UnitType, u32) {
    let main = &slot.main;
    let Some(hidden) = &slot.hidden else {
        return (main.unit_type, main.power);
    };

    match convention {
        HiddenConvention::Additive => (main.unit_type, main.power.saturating_add(hidden.power)),
        HiddenConvention::Replace => (hidden.unit_type, hidden.power),
        HiddenConvention::Bonus { percent } => {
            let bonus = Multiplier::percent(percent).apply(hidden.power);
            (main.unit_type, main.power.saturating_add(bonus))
        }
    }
}

/// Evaluate one round
pub fn evaluate_round(
    round_index: usize,
    player: &Slot,
    opponent: &Slot,
    convention: HiddenConvention,
) -> RoundResult {
    let (player_type, player_base) = fighting_profile(player, convention);
    let (opponent_type, opponent_base) = fighting_profile(opponent, convention);

    let (player_mult, opponent_mult) = matchup_multipliers(player_type, opponent_type);
    let player_power = player_mult.apply(player_base);
    let opponent_power = opponent_mult.apply(opponent_base);

    let (winner, reason) = if player_power > opponent_power {
        (Winner::Player, reason_for(player_mult))
    } else if opponent_power > player_power {
        (Winner::Opponent, reason_for(opponent_mult))
    } else {
        (Winner::Draw, Reason::Draw)
    };

    tracing::debug!(
        round = round_index,
        player = %player.main.id,
        opponent = %opponent.main.id,
        player_power,
        opponent_power,
        %winner,
        "round evaluated"
    );

    RoundResult {
        round_index,
        player_unit: player.main.clone(),
        player_hidden: player.hidden.clone(),
        opponent_unit: opponent.main.clone(),
        opponent_hidden: opponent.hidden.clone(),
        player_effective_power: player_power,
        opponent_effective_power: opponent_power,
        winner,
        reason,
    }
}

fn reason_for(winner_multiplier: Multiplier) -> Reason {
    if winner_multiplier.is_identity() {
        Reason::Strength
    } else {
        Reason::Advantage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, unit_type: UnitType, power: u32) -> Slot {
        Slot::new(Unit::new(id, id, unit_type, power))
    }

    #[test]
    fn test_advantage_win() {
        let result = evaluate_round(
            0,
            &slot("p", UnitType::Rock, 100),
            &slot("o", UnitType::Paper, 100),
            HiddenConvention::Additive,
        );
        assert_eq!(result.player_effective_power, 130);
        assert_eq!(result.opponent_effective_power, 100);
        assert_eq!(result.winner, Winner::Player);
        assert_eq!(result.reason, Reason::Advantage);
    }

    #[test]
    fn test_same_type_tie() {
        let result = evaluate_round(
            0,
            &slot("p", UnitType::Scissors, 80),
            &slot("o", UnitType::Scissors, 80),
            HiddenConvention::Additive,
        );
        assert_eq!(result.player_effective_power, 80);
        assert_eq!(result.opponent_effective_power, 80);
        assert_eq!(result.winner, Winner::Draw);
        assert_eq!(result.reason, Reason::Draw);
    }

    #[test]
    fn test_strength_win_same_type() {
        let result = evaluate_round(
            2,
            &slot("p", UnitType::Paper, 70),
            &slot("o", UnitType::Paper, 90),
            HiddenConvention::Additive,
        );
        assert_eq!(result.winner, Winner::Opponent);
        assert_eq!(result.reason, Reason::Strength);
        assert_eq!(result.round_index, 2);
    }

    #[test]
    fn test_strength_beats_advantage() {
        // Player has the advantage (130) but opponent is simply stronger
        let result = evaluate_round(
            0,
            &slot("p", UnitType::Scissors, 100),
            &slot("o", UnitType::Rock, 140),
            HiddenConvention::Additive,
        );
        assert_eq!(result.player_effective_power, 130);
        assert_eq!(result.winner, Winner::Opponent);
        assert_eq!(result.reason, Reason::Strength);
    }

    #[test]
    fn test_advantage_floors() {
        let result = evaluate_round(
            0,
            &slot("p", UnitType::Paper, 33),
            &slot("o", UnitType::Scissors, 10),
            HiddenConvention::Additive,
        );
        assert_eq!(result.player_effective_power, 42); // 42.9
    }

    #[test]
    fn test_hidden_conventions() {
        let player = Slot::with_hidden(
            Unit::new("m", "main", UnitType::Rock, 50),
            Unit::new("h", "hidden", UnitType::Scissors, 40),
        );

        assert_eq!(fighting_profile(&player, HiddenConvention::Additive), (UnitType::Rock, 90));
        assert_eq!(fighting_profile(&player, HiddenConvention::Replace), (UnitType::Scissors, 40));
        assert_eq!(
            fighting_profile(&player, HiddenConvention::Bonus { percent: 50 }),
            (UnitType::Rock, 70)
        );
    }

    #[test]
    fn test_replace_uses_hidden_type_for_advantage() {
        let player = Slot::with_hidden(
            Unit::new("m", "main", UnitType::Rock, 50),
            Unit::new("h", "hidden", UnitType::Paper, 100),
        );
        let opponent = slot("o", UnitType::Scissors, 100);

        // Paper vs Scissors: Paper preys on Scissors
        let result = evaluate_round(0, &player, &opponent, HiddenConvention::Replace);
        assert_eq!(result.player_effective_power, 130);
        assert_eq!(result.winner, Winner::Player);
        assert_eq!(result.player_hidden.as_ref().map(|u| u.id.as_str()), Some("h"));
    }

    #[test]
    fn test_power_monotonicity() {
        let opponent = slot("o", UnitType::Rock, 120);
        for unit_type in crate::unit::UNIT_TYPES {
            let mut previous = Winner::Opponent;
            for power in 0..300 {
                let result = evaluate_round(
                    0,
                    &slot("p", unit_type, power),
                    &opponent,
                    HiddenConvention::Additive,
                );
                let rank = |w: Winner| match w {
                    Winner::Opponent => 0,
                    Winner::Draw => 1,
                    Winner::Player => 2,
                };
                assert!(rank(result.winner) >= rank(previous), "{} at power {}", unit_type, power);
                previous = result.winner;
            }
        }
    }
}
