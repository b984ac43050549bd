//! CardClash Core - Battle resolution engine
//!
//! This crate provides the deterministic rules for card battles:
//! - Type-advantage cycle and power multipliers
//! - Round evaluation (main + optional hidden card per side)
//! - Best-of-N match sequencing with early termination
//! - Rewards, ghost scaling and card ante
//! - Settlement of results into stored player profiles
//!
//! The engine is synchronous and pure: it reads formations and a mode
//! config, and returns a finished `MatchResult`. Applying that result to
//! stored state is the caller's job (see `ledger`).

pub mod advantage;
pub mod battle;
pub mod error;
pub mod formation;
pub mod ghost;
pub mod ledger;
pub mod mode;
pub mod multiplier;
pub mod rewards;
pub mod round;
pub mod sequencer;
pub mod unit;

// Re-exports for convenient access
pub use advantage::{has_advantage, predator_of, prey_of, ADVANTAGE_MULTIPLIER};
pub use battle::{resolve_battle, MatchResult};
pub use error::{BattleError, ConfigurationError, FormationError, FormationOwner, SettlementError};
pub use formation::{Formation, Slot};
pub use ghost::assemble_ghost;
pub use ledger::{
    apply_match, apply_result, settle, JsonFileStore, MatchRecord, MemoryStore, PlayerProfile,
    ProfileStore,
};
pub use mode::{
    BattleMode, BattleModeConfig, ExchangeRule, HiddenConvention, ProtectionRule, RewardTable,
    RewardValues, BATTLE_MODES,
};
pub use multiplier::Multiplier;
pub use rewards::{
    compute_rewards, rewards_for, CardExchange, OpponentKind, RewardSummary,
    GHOST_REWARD_MULTIPLIER,
};
pub use round::{evaluate_round, Reason, RoundResult, Winner};
pub use sequencer::{simulate_match, MatchOutcome, MatchPhase, MatchSequencer};
pub use unit::{Unit, UnitId, UnitType, UNIT_TYPES};
