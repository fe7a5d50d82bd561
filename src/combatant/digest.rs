//! Player digests - the stat snapshot a combatant is built from

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Already-derived combat stats of a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub speed: Decimal,
    /// Critical hit chance in percent
    #[serde(default)]
    pub crit: u32,
}

/// An equipped skill and its activation chance in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSlot {
    pub skill_id: u32,
    pub chance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneSlot {
    pub rune_id: u32,
    pub level: u32,
}

/// Immutable stat snapshot of one player, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDigest {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub stats: StatBlock,
    #[serde(default)]
    pub skills: Vec<SkillSlot>,
    #[serde(default)]
    pub runes: Vec<RuneSlot>,
}

fn default_level() -> u32 {
    1
}

impl PlayerDigest {
    pub fn new(name: impl Into<String>, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            level: default_level(),
            stats,
            skills: Vec::new(),
            runes: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill_id: u32, chance: u32) -> Self {
        self.skills.push(SkillSlot { skill_id, chance });
        self
    }

    pub fn with_rune(mut self, rune_id: u32, level: u32) -> Self {
        self.runes.push(RuneSlot { rune_id, level });
        self
    }

    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
