//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Which side of the match a combatant fights for
///
/// Results are always reported from the challenger's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Challenger,
    Opponent,
}

impl Side {
    pub fn is_opponent(&self) -> bool {
        matches!(self, Side::Opponent)
    }

    pub fn other(&self) -> Self {
        match self {
            Side::Challenger => Side::Opponent,
            Side::Opponent => Side::Challenger,
        }
    }
}

/// Identity of a combatant within one match
///
/// Dense index into the match's combatant list; also the scheduler key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub usize);

impl CombatantId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Skill categories known to the reference skill table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    /// Plain basic attack; the only category that does not slow readiness decay
    NormalAttack,
    DoubleAttack,
    BlowAttack,
    Heal,
    SpeedBuff,
}

impl SkillCategory {
    pub fn is_basic(&self) -> bool {
        matches!(self, SkillCategory::NormalAttack)
    }

    /// Does this category deal damage to a foe?
    pub fn is_attack(&self) -> bool {
        matches!(
            self,
            SkillCategory::NormalAttack | SkillCategory::DoubleAttack | SkillCategory::BlowAttack
        )
    }
}

/// Final result of a match, from the challenger's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArenaResult {
    Win,
    Lose,
}
