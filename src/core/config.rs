//! Match configuration with documented constants
//!
//! All tuning numbers of the match engine are collected here. Nothing in the
//! engine reads a hidden global; every match is driven by one `MatchConfig`.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, Result};

/// Readiness units a combatant must "wait" before acting, divided by speed
pub const BASE_READINESS: Decimal = Decimal::ONE_HUNDRED;

/// Turn counter value past which the match times out
pub const TURN_CAP: u32 = 200;

/// Decay multiplier for waiting combatants whose last action was a basic attack
pub const NORMAL_DECAY: Decimal = Decimal::from_parts(6, 0, 0, false, 1);

/// Decay multiplier for waiting combatants whose last action used a notable skill
pub const SKILL_DECAY: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Multiplier applied to digest health when building a combatant
pub const HEALTH_MODIFIER: i64 = 2;

/// Configuration for one arena match
///
/// These values define game balance. Changing any of them changes the outcome
/// of previously recorded matches, so replays must use the original config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Numerator of the readiness priority (`base_readiness / speed`)
    ///
    /// Lower priority acts sooner, so faster combatants act more often.
    pub base_readiness: Decimal,

    /// Last turn that may be played
    ///
    /// When the turn counter exceeds this value the challenger loses.
    /// A timeout is never a draw.
    pub turn_cap: u32,

    /// Per-iteration multiplier for waiting combatants after a basic attack
    pub normal_decay: Decimal,

    /// Per-iteration multiplier for waiting combatants after a notable skill
    ///
    /// Larger than `normal_decay`: using a skill delays the next action.
    pub skill_decay: Decimal,

    /// Health scaling applied to every digest
    pub health_modifier: i64,

    /// Fold rune extra values into speed buffs before they are applied
    ///
    /// Legacy matches were resolved with this off, where the extra value
    /// never reached the buff.
    pub extra_buff_before_get_buffs: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            base_readiness: BASE_READINESS,
            turn_cap: TURN_CAP,
            normal_decay: NORMAL_DECAY,
            skill_decay: SKILL_DECAY,
            health_modifier: HEALTH_MODIFIER,
            extra_buff_before_get_buffs: false,
        }
    }
}

impl MatchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.base_readiness <= Decimal::ZERO {
            return Err(ConfigError::InvalidMatchConfig(format!(
                "base_readiness ({}) must be positive",
                self.base_readiness
            )));
        }

        if self.turn_cap == 0 {
            return Err(ConfigError::InvalidMatchConfig(
                "turn_cap must be at least 1".into(),
            ));
        }

        for (name, value) in [
            ("normal_decay", self.normal_decay),
            ("skill_decay", self.skill_decay),
        ] {
            if value <= Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigError::InvalidMatchConfig(format!(
                    "{} ({}) must be in (0, 1]",
                    name, value
                )));
            }
        }

        if self.health_modifier <= 0 {
            return Err(ConfigError::InvalidMatchConfig(format!(
                "health_modifier ({}) must be positive",
                self.health_modifier
            )));
        }

        Ok(())
    }

    /// Decay multiplier for a waiting combatant
    pub fn decay_multiplier(&self, used_notable_skill: bool) -> Decimal {
        if used_notable_skill {
            self.skill_decay
        } else {
            self.normal_decay
        }
    }

    /// Readiness priority for a combatant moving at `speed`
    ///
    /// `None` when the speed is not positive or so small that the priority
    /// would overflow.
    pub fn readiness_for(&self, speed: Decimal) -> Option<Decimal> {
        if speed <= Decimal::ZERO {
            return None;
        }
        self.base_readiness.checked_div(speed)
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    ///
    /// Missing keys fall back to defaults. Decimals should be quoted
    /// (`normal_decay = "0.6"`) to stay exact.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
