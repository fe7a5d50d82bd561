pub mod config;
pub mod error;
pub mod types;

pub use config::MatchConfig;
pub use error::{ArenaError, ConfigError, Result, SchedulerError, TickError};
pub use types::{ArenaResult, CombatantId, Side, SkillCategory};
