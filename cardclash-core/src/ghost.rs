//! Ghost opponent assembly
//!
//! A ghost is a stand-in for a participant who is not live. Its formation is
//! drawn from a stored card inventory with the caller's RNG, so a seeded RNG
//! reproduces the same ghost.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::FormationError;
use crate::formation::{Formation, Slot};
use crate::mode::BattleModeConfig;
use crate::unit::Unit;

/// Build a mode-conformant formation from an inventory
///
/// Main cards are drawn first, then hidden cards from what is left. When the
/// mode allows reuse as hidden and spare cards run out, a main card from a
/// different round is reused.
pub fn assemble_ghost<R: Rng + ?Sized>(
    name: &str,
    inventory: &[Unit],
    config: &BattleModeConfig,
    rng: &mut R,
) -> Result<Formation, FormationError> {
    let mut seen = FxHashSet::default();
    let mut pool: Vec<&Unit> = inventory
        .iter()
        .filter(|&u| seen.insert(u.id.as_str()))
        .collect();
    pool.shuffle(rng);

    let rounds = config.total_rounds;
    let hidden_count = config.hidden_rounds.len();
    let needed = if config.allows_reuse_as_hidden {
        rounds
    } else {
        rounds + hidden_count
    };
    if pool.len() < needed {
        return Err(FormationError::NotEnoughCards {
            needed,
            available: pool.len(),
        });
    }

    let (mains, spare) = pool.split_at(rounds);
    let mut spare = spare.iter();
    let mut slots: Vec<Slot> = mains.iter().map(|&u| Slot::new(u.clone())).collect();
    let mut reused: FxHashSet<usize> = FxHashSet::default();

    for &round in &config.hidden_rounds {
        let hidden = match spare.next() {
            Some(&unit) => unit.clone(),
            None => {
                let donor = (0..rounds)
                    .find(|&j| j != round && !reused.contains(&j))
                    .ok_or(FormationError::NotEnoughCards {
                        needed: rounds + hidden_count,
                        available: pool.len(),
                    })?;
                reused.insert(donor);
                mains[donor].clone()
            }
        };
        slots[round].hidden = Some(hidden);
    }

    let formation = Formation::new(name, slots);
    formation.validate(config)?;

    tracing::debug!(ghost = name, cards = pool.len(), "ghost assembled");
    Ok(formation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::BattleMode;
    use crate::unit::UnitType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn inventory(n: usize) -> Vec<Unit> {
        (0..n)
            .map(|i| Unit::new(format!("g{}", i), "ghost card", UnitType::Paper, 10 * i as u32))
            .collect()
    }

    #[test]
    fn test_assemble_standard() {
        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ghost = assemble_ghost("ghost", &inventory(8), &config, &mut rng).unwrap();
        assert_eq!(ghost.len(), 5);
        assert!(ghost.validate(&config).is_ok());
    }

    #[test]
    fn test_assemble_is_reproducible() {
        let config = BattleModeConfig::preset(BattleMode::TripleThreat);
        let cards = inventory(10);
        let a = assemble_ghost("g", &cards, &config, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = assemble_ghost("g", &cards, &config, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert!(a.slots[1].hidden.is_some());
    }

    #[test]
    fn test_not_enough_cards() {
        let config = BattleModeConfig::preset(BattleMode::TripleThreat);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            assemble_ghost("g", &inventory(3), &config, &mut rng),
            Err(FormationError::NotEnoughCards { needed: 4, available: 3 })
        );
    }

    #[test]
    fn test_duplicates_in_inventory_ignored() {
        let config = BattleModeConfig::preset(BattleMode::OneCard);
        let mut cards = inventory(1);
        cards.push(cards[0].clone());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(assemble_ghost("g", &cards, &config, &mut rng).is_ok());

        let config = BattleModeConfig::preset(BattleMode::Standard5);
        let mut dupes = inventory(4);
        dupes.push(dupes[0].clone());
        assert_eq!(
            assemble_ghost("g", &dupes, &config, &mut rng),
            Err(FormationError::NotEnoughCards { needed: 5, available: 4 })
        );
    }

    #[test]
    fn test_reuse_fills_hidden_rounds() {
        let config = BattleModeConfig::preset(BattleMode::Shadow5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ghost = assemble_ghost("g", &inventory(5), &config, &mut rng).unwrap();
        assert!(ghost.slots[1].hidden.is_some());
        assert!(ghost.slots[3].hidden.is_some());
        assert_eq!(ghost.units().len(), 5);
    }
}
