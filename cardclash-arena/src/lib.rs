//! CardClash Arena - Batch evaluation of formations
//!
//! This crate plays many independent battles:
//! - Gauntlet: one candidate against a pool of opponents
//! - League: round robin between formations with standings
//!
//! Every match is a single synchronous engine call; batches can run on
//! rayon's thread pool with identical results.
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_league (orchestration)
//! - Level 2: run_gauntlet (phases)
//! - Level 3: play_pairing (steps)
//! - Level 4: configuration

mod config;
mod gauntlet;
mod league;
mod pairing;

pub use config::ArenaConfig;
pub use gauntlet::{run_gauntlet, GauntletResult};
pub use league::{run_league, LeagueResult, Standing};
pub use pairing::{play_pairing, PairingResult, Tally};
