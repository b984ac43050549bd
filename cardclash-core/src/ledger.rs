//! Settlement of match results into player profiles
//!
//! The engine never touches stored state. Callers hand a `MatchResult` to
//! `settle`, which builds a new profile with rewards, counters, rating,
//! inventory changes and a history record applied together, or fails without
//! changing anything. `ProfileStore` is the persistence port. A live match is
//! settled for both participants with `apply_match`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::MatchResult;
use crate::error::SettlementError;
use crate::mode::{BattleModeConfig, RewardValues};
use crate::rewards::OpponentKind;
use crate::round::Winner;
use crate::unit::{Unit, UnitId};

/// Lowest rating a profile can fall to
pub const MIN_RATING: u32 = 0;

/// Rating assigned to new profiles
pub const STARTING_RATING: u32 = 1000;

/// Persisted summary of one settled match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub winner: Winner,
    pub player_wins: usize,
    pub opponent_wins: usize,
    pub rewards: RewardValues,
    pub opponent_kind: OpponentKind,
    #[serde(default)]
    pub cards_gained: Vec<UnitId>,
    #[serde(default)]
    pub cards_lost: Vec<UnitId>,
}

/// Stored player state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: String,
    pub rating: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub coins: u64,
    pub experience: u64,
    #[serde(default)]
    pub inventory: Vec<Unit>,
    #[serde(default)]
    pub history: Vec<MatchRecord>,
}

impl PlayerProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rating: STARTING_RATING,
            wins: 0,
            losses: 0,
            draws: 0,
            coins: 0,
            experience: 0,
            inventory: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn with_inventory(mut self, inventory: Vec<Unit>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn has_settled(&self, match_id: &str) -> bool {
        self.history.iter().any(|r| r.match_id == match_id)
    }

    pub fn add_card(&mut self, unit: Unit) {
        self.inventory.push(unit);
    }

    pub fn remove_card(&mut self, id: &str) -> Result<Unit, SettlementError> {
        let pos = self
            .inventory
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| SettlementError::MissingCard(id.to_string()))?;
        Ok(self.inventory.remove(pos))
    }

    pub fn update_rating(&mut self, change: i32) {
        let rating = i64::from(self.rating) + i64::from(change);
        self.rating = rating.clamp(i64::from(MIN_RATING), i64::from(u32::MAX)) as u32;
    }

    pub fn update_win_loss(&mut self, winner: Winner) {
        match winner {
            Winner::Player => self.wins += 1,
            Winner::Opponent => self.losses += 1,
            Winner::Draw => self.draws += 1,
        }
    }
}

/// Apply a match result to a profile as one unit of work
///
/// Returns the updated profile; the input is left untouched. Settling the same
/// `match_id` twice is rejected.
pub fn settle(
    profile: &PlayerProfile,
    match_id: &str,
    result: &MatchResult,
) -> Result<PlayerProfile, SettlementError> {
    if profile.has_settled(match_id) {
        return Err(SettlementError::AlreadySettled(match_id.to_string()));
    }

    let mut next = profile.clone();
    next.coins += u64::from(result.rewards.coins);
    next.experience += u64::from(result.rewards.experience);
    next.update_rating(result.rewards.rating_change);
    next.update_win_loss(result.winner);

    let mut cards_gained = Vec::new();
    let mut cards_lost = Vec::new();
    if let Some(exchange) = &result.card_exchange {
        for unit in &exchange.cards_lost {
            next.remove_card(&unit.id)?;
            cards_lost.push(unit.id.clone());
        }
        for unit in &exchange.cards_gained {
            next.add_card(unit.clone());
            cards_gained.push(unit.id.clone());
        }
    }

    next.history.push(MatchRecord {
        match_id: match_id.to_string(),
        winner: result.winner,
        player_wins: result.player_wins,
        opponent_wins: result.opponent_wins,
        rewards: result.rewards,
        opponent_kind: result.opponent_kind,
        cards_gained,
        cards_lost,
    });

    Ok(next)
}

/// Persistence port for player profiles
pub trait ProfileStore {
    fn load(&self, id: &str) -> anyhow::Result<PlayerProfile>;
    fn save(&mut self, profile: &PlayerProfile) -> anyhow::Result<()>;
}

/// Load, settle and save in one step; the store only sees a complete profile
pub fn apply_result<S: ProfileStore + ?Sized>(
    store: &mut S,
    profile_id: &str,
    match_id: &str,
    result: &MatchResult,
) -> anyhow::Result<PlayerProfile> {
    let profile = store.load(profile_id)?;
    let settled = settle(&profile, match_id, result)?;
    store.save(&settled)?;

    tracing::info!(
        profile = profile_id,
        match_id,
        winner = %result.winner,
        rating = settled.rating,
        "match settled"
    );
    Ok(settled)
}

/// Settle a live match into both participants' profiles
///
/// The opponent receives the mirrored result. Both profiles are settled
/// before either is saved, so a settlement error on one side leaves both
/// stored profiles untouched.
pub fn apply_match<S: ProfileStore + ?Sized>(
    store: &mut S,
    player_id: &str,
    opponent_id: &str,
    match_id: &str,
    result: &MatchResult,
    config: &BattleModeConfig,
) -> anyhow::Result<(PlayerProfile, PlayerProfile)> {
    if player_id == opponent_id {
        anyhow::bail!("profile {} cannot play against itself", player_id);
    }

    let player = settle(&store.load(player_id)?, match_id, result)?;
    let opponent = settle(&store.load(opponent_id)?, match_id, &result.mirrored(config))?;
    store.save(&player)?;
    store.save(&opponent)?;

    tracing::info!(
        player = player_id,
        opponent = opponent_id,
        match_id,
        winner = %result.winner,
        "match settled for both sides"
    );
    Ok((player, opponent))
}

/// In-process profile store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    profiles: FxHashMap<String, PlayerProfile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, profile: PlayerProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self, id: &str) -> anyhow::Result<PlayerProfile> {
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| SettlementError::UnknownProfile(id.to_string()).into())
    }

    fn save(&mut self, profile: &PlayerProfile) -> anyhow::Result<()> {
        self.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}

/// One JSON file per profile in a directory
///
/// Saves go through a temporary file and a rename, so an interrupted save
/// leaves the previous profile in place.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for a profile id; ids that are not a plain file name are rejected
    fn path_for(&self, id: &str) -> Result<PathBuf, SettlementError> {
        let plain = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(|c: char| c == '/' || c == '\\' || std::path::is_separator(c));
        if !plain {
            return Err(SettlementError::InvalidProfileId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self, id: &str) -> anyhow::Result<PlayerProfile> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(SettlementError::UnknownProfile(id.to_string()).into());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading profile {}", path.display()))?;
        let profile = serde_json::from_str(&content)
            .with_context(|| format!("parsing profile {}", path.display()))?;
        Ok(profile)
    }

    fn save(&mut self, profile: &PlayerProfile) -> anyhow::Result<()> {
        let path = self.path_for(&profile.id)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(profile)?)?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("writing profile {}", path.display()))?;
        Ok(())
    }
}
