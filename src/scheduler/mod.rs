//! Readiness scheduling
//!
//! Each waiting combatant holds a readiness priority: the time left before it
//! acts. The lowest priority acts next. Between loop iterations every
//! undefeated combatant has exactly one queued entry.
//!
//! Two implementations share one contract:
//! - [`PairQueue`] for the standard one-on-one match
//! - [`ReadinessHeap`] for any number of combatants
//!
//! Equal priorities resolve by insertion order. Updating a priority keeps the
//! entry's original insertion order.

pub mod heap;
pub mod pair;

use rust_decimal::Decimal;

pub use heap::ReadinessHeap;
pub use pair::PairQueue;

use crate::core::error::SchedulerError;
use crate::core::types::CombatantId;

/// Mutable-priority queue keyed by combatant identity
pub trait ReadinessQueue {
    /// Queue a combatant; priority must be non-negative
    fn insert(&mut self, id: CombatantId, priority: Decimal) -> Result<(), SchedulerError>;

    /// Remove and return the combatant with the smallest priority
    fn pop_min(&mut self) -> Option<CombatantId>;

    /// Rewrite the priority of a combatant that is still queued
    fn update_priority(&mut self, id: CombatantId, priority: Decimal)
        -> Result<(), SchedulerError>;

    /// Visit every queued entry, replacing its priority with the closure's result
    fn for_each_remaining<F>(&mut self, f: F) -> Result<(), SchedulerError>
    where
        F: FnMut(CombatantId, Decimal) -> Decimal;

    fn priority_of(&self, id: CombatantId) -> Option<Decimal>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: CombatantId) -> bool {
        self.priority_of(id).is_some()
    }
}

/// A queued combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub id: CombatantId,
    pub priority: Decimal,
    /// Insertion sequence, breaks priority ties
    pub seq: u64,
}

impl Entry {
    /// Does this entry act before `other`?
    pub fn precedes(&self, other: &Entry) -> bool {
        (self.priority, self.seq) < (other.priority, other.seq)
    }
}

pub(crate) fn check_priority(id: CombatantId, priority: Decimal) -> Result<(), SchedulerError> {
    if priority < Decimal::ZERO {
        return Err(SchedulerError::NegativePriority { id, priority });
    }
    Ok(())
}
