use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::types::{Side, SkillCategory};

/// Value copy of a combatant at the moment an event was logged
///
/// Owns all of its data, so later changes to the live combatant never
/// reach an event that was already recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub side: Side,
    pub name: String,
    pub level: u32,
    pub health: i64,
    pub max_health: i64,
    pub speed: Decimal,
    pub used_skills: Vec<SkillCategory>,
}

impl CombatantSnapshot {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}
