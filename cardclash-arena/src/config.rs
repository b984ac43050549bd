//! Configuration types for batch play
//!
//! Level 4 - Utilities and configuration

use cardclash_core::{BattleMode, BattleModeConfig, OpponentKind};

/// Configuration for a gauntlet or a league
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Battle mode every match is played in
    pub mode: BattleModeConfig,
    /// Live or ghost opponents (affects rewards only)
    pub opponent_kind: OpponentKind,
    /// Whether to run matches in parallel
    pub parallel: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            mode: BattleModeConfig::default(),
            opponent_kind: OpponentKind::Live,
            parallel: true,
        }
    }
}

impl ArenaConfig {
    /// Create config for a preset mode
    pub fn new(mode: BattleMode) -> Self {
        Self {
            mode: BattleModeConfig::preset(mode),
            ..Default::default()
        }
    }

    /// Use a custom mode configuration
    pub fn with_mode(mut self, mode: BattleModeConfig) -> Self {
        self.mode = mode;
        self
    }

    /// Set parallel execution
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Treat opponents as ghosts
    pub fn with_opponent_kind(mut self, kind: OpponentKind) -> Self {
        self.opponent_kind = kind;
        self
    }
}
