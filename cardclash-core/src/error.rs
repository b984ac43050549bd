//! Error taxonomy for battle resolution
//!
//! Every error here is fatal for the call that produced it: the engine never
//! auto-corrects a configuration or a formation, and never returns partial
//! results.

use thiserror::Error;

use crate::unit::UnitId;

/// Invalid battle mode configuration or catalog data
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown unit type: {0:?}")]
    UnknownUnitType(String),

    #[error("total rounds must be 1, 3 or 5, got {0}")]
    InvalidRoundCount(usize),

    #[error("wins needed must be {expected} for {total_rounds} rounds, got {actual}")]
    WinsNeededMismatch {
        total_rounds: usize,
        expected: usize,
        actual: usize,
    },

    #[error("hidden round {round} is out of range for a {total_rounds}-round mode")]
    HiddenRoundOutOfRange { round: usize, total_rounds: usize },

    #[error("reward table pays more for a loss than a win ({field})")]
    LossOutpaysWin { field: &'static str },
}

/// A formation that cannot be used with the selected mode
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormationError {
    #[error("formation has {actual} slots, mode requires {expected}")]
    WrongSlotCount { expected: usize, actual: usize },

    #[error("round {round} requires a hidden card")]
    MissingHidden { round: usize },

    #[error("round {round} does not allow a hidden card")]
    UnexpectedHidden { round: usize },

    #[error("unit {unit} is assigned to round {first} and again to round {second}")]
    DuplicateUnit {
        unit: UnitId,
        first: usize,
        second: usize,
    },

    #[error("not enough cards to fill a formation: need {needed}, have {available}")]
    NotEnoughCards { needed: usize, available: usize },
}

/// Which side of a battle a formation error belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationOwner {
    Player,
    Opponent,
}

impl std::fmt::Display for FormationOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormationOwner::Player => write!(f, "player"),
            FormationOwner::Opponent => write!(f, "opponent"),
        }
    }
}

/// Anything that stops a battle from being resolved
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{owner} formation error: {source}")]
    Formation {
        owner: FormationOwner,
        #[source]
        source: FormationError,
    },
}

impl BattleError {
    pub fn formation(owner: FormationOwner, source: FormationError) -> Self {
        BattleError::Formation { owner, source }
    }
}

/// Failure to apply a match result to a stored profile
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("profile has no card {0} to forfeit")]
    MissingCard(UnitId),

    #[error("match {0} has already been settled")]
    AlreadySettled(String),

    #[error("profile {0} not found")]
    UnknownProfile(String),

    #[error("invalid profile id {0:?}")]
    InvalidProfileId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_error_names_owner() {
        let err = BattleError::formation(
            FormationOwner::Opponent,
            FormationError::MissingHidden { round: 1 },
        );
        assert_eq!(
            err.to_string(),
            "opponent formation error: round 1 requires a hidden card"
        );
    }

    #[test]
    fn test_configuration_error_converts() {
        let err: BattleError = ConfigurationError::InvalidRoundCount(4).into();
        assert!(matches!(
            err,
            BattleError::Configuration(ConfigurationError::InvalidRoundCount(4))
        ));
    }
}
