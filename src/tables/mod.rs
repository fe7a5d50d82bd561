//! Read-only reference tables consulted while building combatants and
//! during the readiness decay pass

pub mod rune;
pub mod skill;

use std::path::Path;

use serde::Deserialize;

pub use rune::{RuneOptionRow, RuneOptionSheet};
pub use skill::{SkillRow, SkillSheet};

use crate::core::error::Result;

/// Bundle of every table a match needs
#[derive(Debug, Clone, Default)]
pub struct ArenaSheets {
    pub skills: SkillSheet,
    pub runes: RuneOptionSheet,
}

/// TOML representation of a sheets file
#[derive(Debug, Deserialize)]
struct TomlSheets {
    #[serde(default)]
    skills: Vec<SkillRow>,
    #[serde(default)]
    runes: Vec<RuneOptionRow>,
}

impl ArenaSheets {
    pub fn new(skills: SkillSheet, runes: RuneOptionSheet) -> Self {
        Self { skills, runes }
    }

    /// Load sheets from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse sheets from a TOML string with `[[skills]]` and `[[runes]]` arrays
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: TomlSheets = toml::from_str(content)?;
        Ok(Self {
            skills: SkillSheet::from_rows(data.skills)?,
            runes: RuneOptionSheet::from_rows(data.runes)?,
        })
    }
}
