//! Match sequencing
//!
//! Rounds are evaluated in formation order until one side reaches the wins
//! needed (best-of-N) or the rounds run out. Unplayed rounds are never
//! evaluated and never appear in the history.
//!
//! State machine: `Pending -> InProgress -> Complete`, one `InProgress`
//! transition per evaluated round.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, FormationOwner};
use crate::formation::Formation;
use crate::mode::BattleModeConfig;
use crate::round::{evaluate_round, RoundResult, Winner};
use crate::unit::Unit;

/// Lifecycle of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Pending,
    InProgress,
    Complete,
}

/// Termination state of a sequenced match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Winner,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub rounds: Vec<RoundResult>,
    /// Distinct units the player put at stake
    pub player_stake: Vec<Unit>,
    /// Distinct units the opponent put at stake
    pub opponent_stake: Vec<Unit>,
}

/// Step-wise match sequencer
///
/// Construction validates the configuration and both formations, so a
/// sequencer that exists can always run to completion.
#[derive(Debug)]
pub struct MatchSequencer<'a> {
    player: &'a Formation,
    opponent: &'a Formation,
    config: &'a BattleModeConfig,
    phase: MatchPhase,
    player_wins: usize,
    opponent_wins: usize,
    rounds: Vec<RoundResult>,
}

impl<'a> MatchSequencer<'a> {
    pub fn new(
        player: &'a Formation,
        opponent: &'a Formation,
        config: &'a BattleModeConfig,
    ) -> Result<Self, BattleError> {
        config.validate()?;
        player
            .validate(config)
            .map_err(|e| BattleError::formation(FormationOwner::Player, e))?;
        opponent
            .validate(config)
            .map_err(|e| BattleError::formation(FormationOwner::Opponent, e))?;

        Ok(Self {
            player,
            opponent,
            config,
            phase: MatchPhase::Pending,
            player_wins: 0,
            opponent_wins: 0,
            rounds: Vec::with_capacity(config.total_rounds),
        })
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Rounds evaluated so far
    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn score(&self) -> (usize, usize) {
        (self.player_wins, self.opponent_wins)
    }

    /// Evaluate the next round. Returns `None` once the match is complete.
    pub fn step(&mut self) -> Option<&RoundResult> {
        if self.phase == MatchPhase::Complete {
            return None;
        }

        if self.phase == MatchPhase::Pending {
            tracing::debug!(
                mode = %self.config.name,
                player = %self.player.name,
                opponent = %self.opponent.name,
                "match started"
            );
        }

        let index = self.rounds.len();
        let result = evaluate_round(
            index,
            &self.player.slots[index],
            &self.opponent.slots[index],
            self.config.hidden_convention(),
        );

        match result.winner {
            Winner::Player => self.player_wins += 1,
            Winner::Opponent => self.opponent_wins += 1,
            Winner::Draw => {}
        }
        self.rounds.push(result);

        self.phase = if self.is_decided() {
            MatchPhase::Complete
        } else {
            MatchPhase::InProgress
        };

        self.rounds.last()
    }

    fn is_decided(&self) -> bool {
        self.player_wins >= self.config.wins_needed
            || self.opponent_wins >= self.config.wins_needed
            || self.rounds.len() >= self.config.total_rounds
    }

    /// Run the remaining rounds and produce the termination state
    pub fn finish(mut self) -> MatchOutcome {
        while self.step().is_some() {}

        let winner = if self.player_wins >= self.config.wins_needed {
            Winner::Player
        } else if self.opponent_wins >= self.config.wins_needed {
            Winner::Opponent
        } else {
            Winner::Draw
        };

        tracing::debug!(
            %winner,
            player_wins = self.player_wins,
            opponent_wins = self.opponent_wins,
            rounds = self.rounds.len(),
            "match complete"
        );

        MatchOutcome {
            winner,
            player_wins: self.player_wins,
            opponent_wins: self.opponent_wins,
            rounds: self.rounds,
            player_stake: self.player.units().into_iter().cloned().collect(),
            opponent_stake: self.opponent.units().into_iter().cloned().collect(),
        }
    }
}

/// Validate and run a whole match in one call
pub fn simulate_match(
    player: &Formation,
    opponent: &Formation,
    config: &BattleModeConfig,
) -> Result<MatchOutcome, BattleError> {
    Ok(MatchSequencer::new(player, opponent, config)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormationError;
    use crate::mode::BattleMode;
    use crate::unit::UnitType;

    fn lineup(name: &str, cards: &[(UnitType, u32)]) -> Formation {
        Formation::from_units(
            name,
            cards
                .iter()
                .enumerate()
                .map(|(i, &(t, p))| Unit::new(format!("{}-{}", name, i), "card", t, p))
                .collect(),
        )
    }

    #[test]
    fn test_best_of_five_early_stop() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = lineup("p", &[(UnitType::Rock, 100); 5]);
        let opponent = lineup("o", &[(UnitType::Paper, 100); 5]);

        let outcome = simulate_match(&player, &opponent, &config).unwrap();
        assert_eq!(outcome.rounds.len(), 3);
        assert_eq!(outcome.player_wins, 3);
        assert_eq!(outcome.winner, Winner::Player);
        assert!(outcome.rounds.iter().all(|r| r.round_index < 3));
    }

    #[test]
    fn test_best_of_three_sweep() {
        let mut config = BattleModeConfig::preset(BattleMode::TripleThreat);
        config.hidden_rounds.clear();
        let player = lineup("p", &[(UnitType::Rock, 90); 3]);
        let opponent = lineup("o", &[(UnitType::Rock, 50); 3]);

        let outcome = simulate_match(&player, &opponent, &config).unwrap();
        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!((outcome.player_wins, outcome.opponent_wins), (2, 0));
        assert_eq!(outcome.winner, Winner::Player);
    }

    #[test]
    fn test_all_draws() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = lineup("p", &[(UnitType::Scissors, 80); 5]);
        let opponent = lineup("o", &[(UnitType::Scissors, 80); 5]);

        let outcome = simulate_match(&player, &opponent, &config).unwrap();
        assert_eq!(outcome.rounds.len(), 5);
        assert_eq!(outcome.winner, Winner::Draw);
    }

    #[test]
    fn test_exhausted_without_majority_is_draw() {
        // 2 wins each + 1 draw
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = lineup(
            "p",
            &[
                (UnitType::Rock, 100),
                (UnitType::Rock, 10),
                (UnitType::Rock, 100),
                (UnitType::Rock, 10),
                (UnitType::Rock, 50),
            ],
        );
        let opponent = lineup("o", &[(UnitType::Rock, 50); 5]);

        let outcome = simulate_match(&player, &opponent, &config).unwrap();
        assert_eq!(outcome.rounds.len(), 5);
        assert_eq!((outcome.player_wins, outcome.opponent_wins), (2, 2));
        assert_eq!(outcome.winner, Winner::Draw);
    }

    #[test]
    fn test_phase_transitions() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = lineup("p", &[(UnitType::Paper, 100); 5]);
        let opponent = lineup("o", &[(UnitType::Rock, 100); 5]);

        let mut seq = MatchSequencer::new(&player, &opponent, &config).unwrap();
        assert_eq!(seq.phase(), MatchPhase::Pending);

        assert!(seq.step().is_some());
        assert_eq!(seq.phase(), MatchPhase::InProgress);
        assert_eq!(seq.score(), (0, 1));

        seq.step();
        seq.step();
        assert_eq!(seq.phase(), MatchPhase::Complete);
        assert!(seq.step().is_none());
        assert_eq!(seq.rounds().len(), 3);

        let outcome = seq.finish();
        assert_eq!(outcome.winner, Winner::Opponent);
    }

    #[test]
    fn test_invalid_formation_rejected_before_play() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = lineup("p", &[(UnitType::Rock, 100); 5]);
        let opponent = lineup("o", &[(UnitType::Rock, 100); 4]);

        let err = simulate_match(&player, &opponent, &config).unwrap_err();
        assert_eq!(
            err,
            BattleError::formation(
                FormationOwner::Opponent,
                FormationError::WrongSlotCount { expected: 5, actual: 4 }
            )
        );
    }

    #[test]
    fn test_determinism() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let player = lineup(
            "p",
            &[
                (UnitType::Rock, 70),
                (UnitType::Paper, 90),
                (UnitType::Scissors, 60),
                (UnitType::Rock, 95),
                (UnitType::Paper, 40),
            ],
        );
        let opponent = lineup(
            "o",
            &[
                (UnitType::Scissors, 80),
                (UnitType::Paper, 90),
                (UnitType::Rock, 75),
                (UnitType::Paper, 60),
                (UnitType::Rock, 70),
            ],
        );

        let a = simulate_match(&player, &opponent, &config).unwrap();
        let b = simulate_match(&player, &opponent, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stakes_collected() {
        let config = BattleModeConfig::preset(BattleMode::OneCard);
        let player = lineup("p", &[(UnitType::Rock, 100)]);
        let opponent = lineup("o", &[(UnitType::Paper, 100)]);

        let outcome = simulate_match(&player, &opponent, &config).unwrap();
        assert_eq!(outcome.player_stake.len(), 1);
        assert_eq!(outcome.opponent_stake[0].id, "o-0");
    }
}
