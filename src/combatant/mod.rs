//! Combatants - the two sides of an arena match
//!
//! The match engine never does combat math itself. It only sees the
//! [`Combatant`] capability: speed, health, side, the skill categories of
//! the last action, one opaque `tick`, and a value-copy `snapshot`.
//!
//! Archetypes:
//! - [`ArenaCharacter`]: built from a player digest and the reference tables
//! - [`ScriptedFighter`]: fixed behaviour, never draws randomness

pub mod character;
pub mod digest;
pub mod scripted;
pub mod snapshot;

use rand::RngCore;
use rust_decimal::Decimal;

pub use character::ArenaCharacter;
pub use digest::{PlayerDigest, RuneSlot, SkillSlot, StatBlock};
pub use scripted::ScriptedFighter;
pub use snapshot::CombatantSnapshot;

use crate::core::error::TickError;
use crate::core::types::{Side, SkillCategory};

/// One side of a match, as seen by the match engine
pub trait Combatant {
    fn side(&self) -> Side;

    /// Current speed, including buffs; always positive for a valid combatant
    fn speed(&self) -> Decimal;

    fn health(&self) -> i64;

    fn is_dead(&self) -> bool {
        self.health() <= 0
    }

    /// Categories used by the most recent `tick`, overwritten on every tick
    fn used_skill_categories(&self) -> &[SkillCategory];

    /// Resolve one action
    ///
    /// `foes` holds every other living combatant on the opposing side, in
    /// match order. All randomness must come from `rng`, in a fixed order.
    fn tick(&mut self, foes: &mut [&mut Self], rng: &mut dyn RngCore) -> Result<(), TickError>;

    /// Immutable copy of the current state for the battle log
    fn snapshot(&self) -> CombatantSnapshot;
}
