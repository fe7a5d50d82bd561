//! Rune option reference table

use ahash::AHashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Effect of one rune at one level
///
/// Stat bonuses are flat and additive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneOptionRow {
    pub rune_id: u32,
    pub level: u32,
    #[serde(default)]
    pub hp: i64,
    #[serde(default)]
    pub attack: i64,
    #[serde(default)]
    pub defense: i64,
    #[serde(default)]
    pub speed: Decimal,
    /// Skill granted by the rune, if any
    #[serde(default)]
    pub skill_id: Option<u32>,
    /// Activation chance of the granted skill, in percent
    #[serde(default)]
    pub skill_chance: u32,
    /// Extra percent added to speed buffs
    #[serde(default)]
    pub buff_extra: i64,
}

#[derive(Debug, Clone, Default)]
pub struct RuneOptionSheet {
    rows: AHashMap<(u32, u32), RuneOptionRow>,
}

impl RuneOptionSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<RuneOptionRow>) -> Result<Self, ConfigError> {
        let mut sheet = Self::new();
        for row in rows {
            sheet.add(row)?;
        }
        Ok(sheet)
    }

    pub fn add(&mut self, row: RuneOptionRow) -> Result<(), ConfigError> {
        let key = (row.rune_id, row.level);
        if self.rows.contains_key(&key) {
            return Err(ConfigError::DuplicateRow(format!(
                "rune {} level {}",
                row.rune_id, row.level
            )));
        }
        self.rows.insert(key, row);
        Ok(())
    }

    pub fn get(&self, rune_id: u32, level: u32) -> Option<&RuneOptionRow> {
        self.rows.get(&(rune_id, level))
    }

    pub fn try_get(&self, rune_id: u32, level: u32) -> Result<&RuneOptionRow, ConfigError> {
        self.get(rune_id, level)
            .ok_or(ConfigError::UnknownRune { rune_id, level })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
