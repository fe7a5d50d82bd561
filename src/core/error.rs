use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::types::{CombatantId, Side};

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Combatant failed to resolve its turn: {0}")]
    Tick(#[from] TickError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Match ended without a result at turn {turn}")]
    Unresolved { turn: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected inputs, raised before the main loop starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{side:?} speed must be positive, got {speed}")]
    NonPositiveSpeed { side: Side, speed: Decimal },

    #[error("{side:?} speed {speed} is too small to schedule")]
    SpeedOutOfRange { side: Side, speed: Decimal },

    #[error("{side:?} health must be positive, got {health}")]
    NonPositiveHealth { side: Side, health: i64 },

    #[error("{side:?} {stat} is out of range: {value}")]
    InvalidStat {
        side: Side,
        stat: &'static str,
        value: i64,
    },

    #[error("{side:?} {stat} overflowed while applying modifiers")]
    StatOverflow { side: Side, stat: &'static str },

    #[error("Skill {skill_id} is not in the skill sheet")]
    UnknownSkill { skill_id: u32 },

    #[error("Rune {rune_id} level {level} is not in the rune option sheet")]
    UnknownRune { rune_id: u32, level: u32 },

    #[error("Skill sheet has no normal attack row")]
    MissingBasicAttack,

    #[error("Duplicate table row: {0}")]
    DuplicateRow(String),

    #[error("Invalid match config: {0}")]
    InvalidMatchConfig(String),
}

/// Failure of a combatant's per-turn action resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    #[error("No living foe to target")]
    NoTarget,

    #[error("Speed dropped to {0}; readiness needs a positive speed")]
    InvalidSpeed(Decimal),

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Scripted failure: {0}")]
    Script(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Combatant {0} is already queued")]
    AlreadyQueued(CombatantId),

    #[error("Combatant {0} is not queued")]
    NotQueued(CombatantId),

    #[error("Priority for {id} must be non-negative, got {priority}")]
    NegativePriority { id: CombatantId, priority: Decimal },

    #[error("Queue is full")]
    Full,
}

pub type Result<T> = std::result::Result<T, ArenaError>;
