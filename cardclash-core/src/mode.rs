//! Battle mode configuration
//!
//! A `BattleModeConfig` is built once when a mode is selected (from a preset
//! or a JSON file), validated, and read-only afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::multiplier::Multiplier;

/// Named mode presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleMode {
    /// Sudden death: one round, one win needed
    OneCard,
    /// Tactics: best of three with a hidden card in round 2
    TripleThreat,
    /// Best of five with card ante
    #[serde(rename = "STANDARD_5")]
    Standard5,
    /// Best of five with hidden bonus cards in rounds 2 and 4
    #[serde(rename = "SHADOW_5")]
    Shadow5,
}

pub const BATTLE_MODES: [BattleMode; 4] = [
    BattleMode::OneCard,
    BattleMode::TripleThreat,
    BattleMode::Standard5,
    BattleMode::Shadow5,
];

impl BattleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BattleMode::OneCard => "one-card",
            BattleMode::TripleThreat => "triple-threat",
            BattleMode::Standard5 => "standard-5",
            BattleMode::Shadow5 => "shadow-5",
        }
    }

    /// Parse a mode name as used on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "one-card" | "sudden-death" => Some(BattleMode::OneCard),
            "triple-threat" | "tactics" => Some(BattleMode::TripleThreat),
            "standard-5" | "standard" => Some(BattleMode::Standard5),
            "shadow-5" | "shadow" => Some(BattleMode::Shadow5),
            _ => None,
        }
    }
}

impl fmt::Display for BattleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a hidden card combines with the main card of its round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HiddenConvention {
    /// Hidden power is added to main power; main type decides advantage
    Additive,
    /// Hidden card fights in place of the main card
    Replace,
    /// A percentage of hidden power is added; main type decides advantage
    Bonus { percent: u32 },
}

impl Default for HiddenConvention {
    fn default() -> Self {
        HiddenConvention::Additive
    }
}

/// Coin, experience and rating awarded for one outcome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardValues {
    pub coins: u32,
    pub experience: u32,
    pub rating_change: i32,
}

impl RewardValues {
    pub const fn new(coins: u32, experience: u32, rating_change: i32) -> Self {
        Self {
            coins,
            experience,
            rating_change,
        }
    }

    /// Scale every numeric field by the same multiplier
    pub fn scaled(&self, multiplier: Multiplier) -> Self {
        Self {
            coins: multiplier.apply(self.coins),
            experience: multiplier.apply(self.experience),
            rating_change: multiplier.apply_signed(self.rating_change),
        }
    }

    /// First field where `self` pays more than `other`, if any
    fn first_exceeding(&self, other: &RewardValues) -> Option<&'static str> {
        if self.coins > other.coins {
            Some("coins")
        } else if self.experience > other.experience {
            Some("experience")
        } else if self.rating_change > other.rating_change {
            Some("rating_change")
        } else {
            None
        }
    }
}

/// Mode-specific reward table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    pub win: RewardValues,
    pub loss: RewardValues,
    /// Draw-specific rewards; when absent a draw pays the loss rewards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw: Option<RewardValues>,
}

impl RewardTable {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(field) = self.loss.first_exceeding(&self.win) {
            return Err(ConfigurationError::LossOutpaysWin { field });
        }
        if let Some(draw) = &self.draw {
            if let Some(field) = draw.first_exceeding(&self.win) {
                return Err(ConfigurationError::LossOutpaysWin { field });
            }
        }
        Ok(())
    }
}

/// Which cards are shielded from the ante
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum ProtectionRule {
    /// Every card can change hands
    None,
    /// Cards whose level is strictly above the given level are protected
    AboveLevel(u32),
}

impl ProtectionRule {
    pub fn is_protected(&self, level: u32) -> bool {
        match *self {
            ProtectionRule::None => false,
            ProtectionRule::AboveLevel(max) => level > max,
        }
    }
}

/// Card exchange (ante) rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRule {
    /// Cards the loser forfeits
    pub forfeit_on_loss: usize,
    /// Cards the winner captures from the opponent
    pub capture_on_win: usize,
    pub protection: ProtectionRule,
}

/// Per-mode battle configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleModeConfig {
    pub name: String,
    pub total_rounds: usize,
    pub wins_needed: usize,
    /// Zero-based round indices that carry a hidden card
    #[serde(default)]
    pub hidden_rounds: BTreeSet<usize>,
    /// Whether a unit used as `main` in one round may be `hidden` in another
    #[serde(default)]
    pub allows_reuse_as_hidden: bool,
    #[serde(default)]
    pub hidden_convention: HiddenConvention,
    pub reward_table: RewardTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<ExchangeRule>,
}

/// Wins needed for a best-of-N match
pub fn wins_needed_for(total_rounds: usize) -> usize {
    (total_rounds + 1).div_ceil(2)
}

impl BattleModeConfig {
    /// Preset configuration for a named mode
    pub fn preset(mode: BattleMode) -> Self {
        match mode {
            BattleMode::OneCard => Self {
                name: mode.to_string(),
                total_rounds: 1,
                wins_needed: 1,
                hidden_rounds: BTreeSet::new(),
                allows_reuse_as_hidden: false,
                hidden_convention: HiddenConvention::Additive,
                reward_table: RewardTable {
                    win: RewardValues::new(60, 30, 20),
                    loss: RewardValues::new(10, 5, -15),
                    draw: None,
                },
                exchange: None,
            },
            BattleMode::TripleThreat => Self {
                name: mode.to_string(),
                total_rounds: 3,
                wins_needed: 2,
                hidden_rounds: BTreeSet::from([1]),
                allows_reuse_as_hidden: false,
                hidden_convention: HiddenConvention::Additive,
                reward_table: RewardTable {
                    win: RewardValues::new(80, 40, 20),
                    loss: RewardValues::new(15, 10, -12),
                    draw: None,
                },
                exchange: None,
            },
            BattleMode::Standard5 => Self {
                name: mode.to_string(),
                total_rounds: 5,
                wins_needed: 3,
                hidden_rounds: BTreeSet::new(),
                allows_reuse_as_hidden: false,
                hidden_convention: HiddenConvention::Additive,
                reward_table: RewardTable {
                    win: RewardValues::new(100, 50, 25),
                    loss: RewardValues::new(20, 10, -10),
                    draw: None,
                },
                exchange: Some(ExchangeRule {
                    forfeit_on_loss: 1,
                    capture_on_win: 1,
                    protection: ProtectionRule::AboveLevel(1),
                }),
            },
            BattleMode::Shadow5 => Self {
                name: mode.to_string(),
                total_rounds: 5,
                wins_needed: 3,
                hidden_rounds: BTreeSet::from([1, 3]),
                allows_reuse_as_hidden: true,
                hidden_convention: HiddenConvention::Bonus { percent: 50 },
                reward_table: RewardTable {
                    win: RewardValues::new(120, 60, 30),
                    loss: RewardValues::new(20, 15, -15),
                    draw: None,
                },
                exchange: None,
            },
        }
    }

    /// The hidden-card convention this mode uses
    pub fn hidden_convention(&self) -> HiddenConvention {
        self.hidden_convention
    }

    pub fn is_hidden_round(&self, round: usize) -> bool {
        self.hidden_rounds.contains(&round)
    }

    /// Check every invariant of the configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !matches!(self.total_rounds, 1 | 3 | 5) {
            return Err(ConfigurationError::InvalidRoundCount(self.total_rounds));
        }

        let expected = wins_needed_for(self.total_rounds);
        if self.wins_needed != expected {
            return Err(ConfigurationError::WinsNeededMismatch {
                total_rounds: self.total_rounds,
                expected,
                actual: self.wins_needed,
            });
        }

        if let Some(&round) = self.hidden_rounds.iter().find(|&&r| r >= self.total_rounds) {
            return Err(ConfigurationError::HiddenRoundOutOfRange {
                round,
                total_rounds: self.total_rounds,
            });
        }

        self.reward_table.validate()
    }

    /// Load and validate a configuration from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading mode config {}", path.display()))?;
        let config: BattleModeConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing mode config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for BattleModeConfig {
    fn default() -> Self {
        Self::preset(BattleMode::Standard5)
    }
}
