//! Unit (card instance) definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Stable card identifier supplied by the catalog
pub type UnitId = String;

/// Level assumed for cards that do not carry one
pub const DEFAULT_LEVEL: u32 = 1;

/// The three unit categories of the type-advantage cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    #[serde(alias = "ROCK_TYPE")]
    Rock,
    #[serde(alias = "PAPER_TYPE")]
    Paper,
    #[serde(alias = "SCISSORS_TYPE")]
    Scissors,
}

/// All unit types, in cycle order
pub const UNIT_TYPES: [UnitType; 3] = [UnitType::Rock, UnitType::Paper, UnitType::Scissors];

impl UnitType {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitType::Rock => "ROCK",
            UnitType::Paper => "PAPER",
            UnitType::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitType {
    type Err = ConfigurationError;

    /// Parse a catalog type name. Unknown names are an error, never a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROCK" | "ROCK_TYPE" => Ok(UnitType::Rock),
            "PAPER" | "PAPER_TYPE" => Ok(UnitType::Paper),
            "SCISSORS" | "SCISSORS_TYPE" => Ok(UnitType::Scissors),
            _ => Err(ConfigurationError::UnknownUnitType(s.to_string())),
        }
    }
}

/// A single card instance as used in battle
///
/// `unit_type` and `power` are required when deserializing; `level` only
/// matters to card-exchange protection and defaults to 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub power: u32,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    DEFAULT_LEVEL
}

impl Unit {
    pub fn new(id: impl Into<UnitId>, name: impl Into<String>, unit_type: UnitType, power: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_type,
            power,
            level: DEFAULT_LEVEL,
        }
    }

    /// Set card level
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}
