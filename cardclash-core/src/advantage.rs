//! Type-advantage table
//!
//! The three unit types form a strict cycle:
//! ROCK beats PAPER, PAPER beats SCISSORS, SCISSORS beats ROCK.
//! No type beats itself.

use crate::multiplier::Multiplier;
use crate::unit::UnitType;

/// Power multiplier for the advantaged side of a matchup (x1.3)
pub const ADVANTAGE_MULTIPLIER: Multiplier = Multiplier::new(13, 10);

/// The type each type preys on
pub fn prey_of(unit_type: UnitType) -> UnitType {
    match unit_type {
        UnitType::Rock => UnitType::Paper,
        UnitType::Paper => UnitType::Scissors,
        UnitType::Scissors => UnitType::Rock,
    }
}

/// The type that preys on the given type
pub fn predator_of(unit_type: UnitType) -> UnitType {
    match unit_type {
        UnitType::Rock => UnitType::Scissors,
        UnitType::Paper => UnitType::Rock,
        UnitType::Scissors => UnitType::Paper,
    }
}

/// True exactly when `a` is the designated predator of `b`
pub fn has_advantage(a: UnitType, b: UnitType) -> bool {
    prey_of(a) == b
}

/// Multipliers for (a, b) in an a-vs-b matchup
pub fn matchup_multipliers(a: UnitType, b: UnitType) -> (Multiplier, Multiplier) {
    if has_advantage(a, b) {
        (ADVANTAGE_MULTIPLIER, Multiplier::ONE)
    } else if has_advantage(b, a) {
        (Multiplier::ONE, ADVANTAGE_MULTIPLIER)
    } else {
        (Multiplier::ONE, Multiplier::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UNIT_TYPES;

    #[test]
    fn test_cycle() {
        assert!(has_advantage(UnitType::Rock, UnitType::Paper));
        assert!(has_advantage(UnitType::Paper, UnitType::Scissors));
        assert!(has_advantage(UnitType::Scissors, UnitType::Rock));
    }

    #[test]
    fn test_irreflexive_and_antisymmetric() {
        for &a in &UNIT_TYPES {
            assert!(!has_advantage(a, a), "{} should not beat itself", a);
            for &b in &UNIT_TYPES {
                if a != b {
                    assert!(
                        has_advantage(a, b) ^ has_advantage(b, a),
                        "exactly one of {} / {} should have advantage",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_predator_prey_inverse() {
        for &t in &UNIT_TYPES {
            assert_eq!(predator_of(prey_of(t)), t);
            assert!(has_advantage(predator_of(t), t));
        }
    }

    #[test]
    fn test_matchup_multipliers() {
        let (a, b) = matchup_multipliers(UnitType::Scissors, UnitType::Rock);
        assert_eq!(a, ADVANTAGE_MULTIPLIER);
        assert_eq!(b, Multiplier::ONE);

        let (a, b) = matchup_multipliers(UnitType::Rock, UnitType::Scissors);
        assert_eq!(a, Multiplier::ONE);
        assert_eq!(b, ADVANTAGE_MULTIPLIER);

        let (a, b) = matchup_multipliers(UnitType::Paper, UnitType::Paper);
        assert!(a.is_identity() && b.is_identity());
    }
}
