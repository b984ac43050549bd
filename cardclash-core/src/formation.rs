//! Formations: ordered per-round card lineups
//!
//! Validation runs once before a match. It maps every unit id to the rounds
//! it fills as main and as hidden and rejects any further assignment, so the
//! sequencer never sees a malformed formation.

use std::path::Path;

use anyhow::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::FormationError;
use crate::mode::BattleModeConfig;
use crate::unit::Unit;

/// One round's assigned card(s)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub main: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<Unit>,
}

impl Slot {
    pub fn new(main: Unit) -> Self {
        Self { main, hidden: None }
    }

    pub fn with_hidden(main: Unit, hidden: Unit) -> Self {
        Self {
            main,
            hidden: Some(hidden),
        }
    }
}

/// Role a unit plays inside a slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotRole {
    Main,
    Hidden,
}

/// Rounds a unit id has been assigned to, one per role
#[derive(Clone, Copy, Debug, Default)]
struct Assignment {
    main: Option<usize>,
    hidden: Option<usize>,
}

impl Assignment {
    fn first_round(&self) -> Option<usize> {
        match (self.main, self.hidden) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn role_round(&mut self, role: SlotRole) -> &mut Option<usize> {
        match role {
            SlotRole::Main => &mut self.main,
            SlotRole::Hidden => &mut self.hidden,
        }
    }

    /// Record `role` in `round`, or return the round it collides with
    ///
    /// Without reuse any earlier assignment collides. With reuse a unit may
    /// fill each role once, in two different rounds.
    fn assign(&mut self, round: usize, role: SlotRole, reuse: bool) -> Result<(), usize> {
        if let Some(first) = self.first_round() {
            if !reuse {
                return Err(first);
            }
            if let Some(taken) = *self.role_round(role) {
                return Err(taken);
            }
            if first == round {
                return Err(first);
            }
        }
        *self.role_round(role) = Some(round);
        Ok(())
    }
}

/// A player's full ordered lineup for a match
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    #[serde(default)]
    pub name: String,
    pub slots: Vec<Slot>,
}

impl Formation {
    pub fn new(name: impl Into<String>, slots: Vec<Slot>) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }

    /// Formation with one main card per round and no hidden cards
    pub fn from_units(name: impl Into<String>, units: Vec<Unit>) -> Self {
        Self::new(name, units.into_iter().map(Slot::new).collect())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Distinct units referenced by the formation, in first-seen order
    pub fn units(&self) -> Vec<&Unit> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut units = Vec::new();
        for slot in &self.slots {
            for unit in std::iter::once(&slot.main).chain(slot.hidden.as_ref()) {
                if seen.insert(unit.id.as_str()) {
                    units.push(unit);
                }
            }
        }
        units
    }

    /// Check the formation against a mode
    ///
    /// Rejects wrong slot counts, missing or unexpected hidden cards and any
    /// unit referenced twice. When the mode allows reuse as hidden, a unit may
    /// be `main` in one round and `hidden` in a different one, nothing more.
    pub fn validate(&self, config: &BattleModeConfig) -> Result<(), FormationError> {
        if self.slots.len() != config.total_rounds {
            return Err(FormationError::WrongSlotCount {
                expected: config.total_rounds,
                actual: self.slots.len(),
            });
        }

        for (round, slot) in self.slots.iter().enumerate() {
            match (config.is_hidden_round(round), slot.hidden.is_some()) {
                (true, false) => return Err(FormationError::MissingHidden { round }),
                (false, true) => return Err(FormationError::UnexpectedHidden { round }),
                _ => {}
            }
        }

        let mut assigned: FxHashMap<&str, Assignment> = FxHashMap::default();
        for (round, slot) in self.slots.iter().enumerate() {
            let entries = std::iter::once((&slot.main, SlotRole::Main))
                .chain(slot.hidden.as_ref().map(|h| (h, SlotRole::Hidden)));

            for (unit, role) in entries {
                assigned
                    .entry(unit.id.as_str())
                    .or_default()
                    .assign(round, role, config.allows_reuse_as_hidden)
                    .map_err(|first| FormationError::DuplicateUnit {
                        unit: unit.id.clone(),
                        first,
                        second: round,
                    })?;
            }
        }

        Ok(())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading formation {}", path.display()))?;
        let formation = serde_json::from_str(&content)
            .with_context(|| format!("parsing formation {}", path.display()))?;
        Ok(formation)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
