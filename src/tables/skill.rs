//! Skill reference table

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::types::SkillCategory;

/// One row of the skill sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRow {
    pub id: u32,
    pub name: String,
    pub category: SkillCategory,
    /// Percent of attack for attacks and heals, percent of speed for speed buffs
    pub power: i64,
    /// Own actions the skill stays unavailable after use
    #[serde(default)]
    pub cooldown: u32,
    /// Own actions a buff lasts
    #[serde(default)]
    pub duration: u32,
}

/// Skill sheet, kept in file order
#[derive(Debug, Clone, Default)]
pub struct SkillSheet {
    rows: Vec<SkillRow>,
    by_id: AHashMap<u32, usize>,
    categories: BTreeSet<SkillCategory>,
}

impl SkillSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from rows, rejecting duplicate ids
    pub fn from_rows(rows: Vec<SkillRow>) -> Result<Self, ConfigError> {
        let mut sheet = Self::new();
        for row in rows {
            sheet.add(row)?;
        }
        Ok(sheet)
    }

    pub fn add(&mut self, row: SkillRow) -> Result<(), ConfigError> {
        if self.by_id.contains_key(&row.id) {
            return Err(ConfigError::DuplicateRow(format!("skill {}", row.id)));
        }
        self.by_id.insert(row.id, self.rows.len());
        self.categories.insert(row.category);
        self.rows.push(row);
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&SkillRow> {
        self.by_id.get(&id).map(|&idx| &self.rows[idx])
    }

    pub fn try_get(&self, id: u32) -> Result<&SkillRow, ConfigError> {
        self.get(id).ok_or(ConfigError::UnknownSkill { skill_id: id })
    }

    /// First normal attack row; every combatant falls back to it
    pub fn basic_attack(&self) -> Option<&SkillRow> {
        self.rows
            .iter()
            .find(|row| row.category == SkillCategory::NormalAttack)
    }

    /// Categories that appear in at least one row
    pub fn known_categories(&self) -> &BTreeSet<SkillCategory> {
        &self.categories
    }

    /// Did a combatant's last action use a notable (non-basic) skill?
    ///
    /// Only categories the sheet knows about count.
    pub fn uses_notable_skill(&self, used: &[SkillCategory]) -> bool {
        used.iter()
            .filter(|category| self.categories.contains(category))
            .any(|category| !category.is_basic())
    }

    pub fn all(&self) -> &[SkillRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
