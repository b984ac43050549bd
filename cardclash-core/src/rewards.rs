//! Reward and card exchange calculation
//!
//! Single-sourced reward formula: pick the outcome's row of the reward table,
//! then scale it by the opponent's multiplier (x1 live, x1/2 ghost).

use serde::{Deserialize, Serialize};

use crate::mode::{BattleModeConfig, ExchangeRule, RewardValues};
use crate::multiplier::Multiplier;
use crate::round::Winner;
use crate::sequencer::MatchOutcome;
use crate::unit::Unit;

/// Reward multiplier for matches against a stand-in opponent
pub const GHOST_REWARD_MULTIPLIER: Multiplier = Multiplier::new(1, 2);

/// Whether the opponent was a live participant or a stand-in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    #[default]
    Live,
    Ghost,
}

impl OpponentKind {
    pub fn reward_multiplier(self) -> Multiplier {
        match self {
            OpponentKind::Live => Multiplier::ONE,
            OpponentKind::Ghost => GHOST_REWARD_MULTIPLIER,
        }
    }
}

/// Cards that change hands after a match, from the player's point of view
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardExchange {
    pub cards_gained: Vec<Unit>,
    pub cards_lost: Vec<Unit>,
}

impl CardExchange {
    /// The exchange from the opponent's point of view
    pub fn mirrored(&self) -> Self {
        Self {
            cards_gained: self.cards_lost.clone(),
            cards_lost: self.cards_gained.clone(),
        }
    }
}

/// Everything the calculator produces for one match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardSummary {
    pub rewards: RewardValues,
    pub card_exchange: Option<CardExchange>,
}

/// Compute rewards and card exchange for a finished match
///
/// Pure and idempotent: the same outcome, config and opponent kind always
/// yield the same summary.
pub fn compute_rewards(
    outcome: &MatchOutcome,
    config: &BattleModeConfig,
    opponent: OpponentKind,
) -> RewardSummary {
    let card_exchange = match (&config.exchange, opponent) {
        (Some(rule), OpponentKind::Live) => exchange_cards(outcome, rule),
        _ => None,
    };

    RewardSummary {
        rewards: rewards_for(outcome.winner, config, opponent),
        card_exchange,
    }
}

/// Reward row for the player side of a result, scaled by the opponent kind
pub fn rewards_for(winner: Winner, config: &BattleModeConfig, opponent: OpponentKind) -> RewardValues {
    let table = &config.reward_table;
    let base = match winner {
        Winner::Player => table.win,
        Winner::Opponent => table.loss,
        Winner::Draw => table.draw.unwrap_or(table.loss),
    };
    base.scaled(opponent.reward_multiplier())
}

/// Apply the ante rule to a decided match
fn exchange_cards(outcome: &MatchOutcome, rule: &ExchangeRule) -> Option<CardExchange> {
    let exchange = match outcome.winner {
        Winner::Player => CardExchange {
            cards_gained: select_at_stake(&outcome.opponent_stake, rule, rule.capture_on_win),
            cards_lost: Vec::new(),
        },
        Winner::Opponent => CardExchange {
            cards_gained: Vec::new(),
            cards_lost: select_at_stake(&outcome.player_stake, rule, rule.forfeit_on_loss),
        },
        Winner::Draw => return None,
    };

    if exchange.cards_gained.is_empty() && exchange.cards_lost.is_empty() {
        None
    } else {
        Some(exchange)
    }
}

/// Lowest-tier unprotected cards first, ordered by (level, power, id)
pub fn select_at_stake(pool: &[Unit], rule: &ExchangeRule, count: usize) -> Vec<Unit> {
    let mut candidates: Vec<&Unit> = pool
        .iter()
        .filter(|u| !rule.protection.is_protected(u.level))
        .collect();
    candidates.sort_by(|a, b| {
        (a.level, a.power, a.id.as_str()).cmp(&(b.level, b.power, b.id.as_str()))
    });
    candidates.into_iter().take(count).cloned().collect()
}
