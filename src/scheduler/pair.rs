//! Two-slot readiness queue for one-on-one matches

use rust_decimal::Decimal;

use super::{check_priority, Entry, ReadinessQueue};
use crate::core::error::SchedulerError;
use crate::core::types::CombatantId;

/// Holds at most two entries and picks the minimum by direct comparison
#[derive(Debug, Clone, Default)]
pub struct PairQueue {
    slots: [Option<Entry>; 2],
    next_seq: u64,
}

impl PairQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_of(&self, id: CombatantId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.map(|e| e.id) == Some(id))
    }
}

impl ReadinessQueue for PairQueue {
    fn insert(&mut self, id: CombatantId, priority: Decimal) -> Result<(), SchedulerError> {
        check_priority(id, priority)?;
        if self.slot_of(id).is_some() {
            return Err(SchedulerError::AlreadyQueued(id));
        }
        let free = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(SchedulerError::Full)?;

        self.slots[free] = Some(Entry {
            id,
            priority,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        Ok(())
    }

    fn pop_min(&mut self) -> Option<CombatantId> {
        let idx = match (&self.slots[0], &self.slots[1]) {
            (Some(a), Some(b)) => {
                if b.precedes(a) {
                    1
                } else {
                    0
                }
            }
            (Some(_), None) => 0,
            (None, Some(_)) => 1,
            (None, None) => return None,
        };
        self.slots[idx].take().map(|e| e.id)
    }

    fn update_priority(
        &mut self,
        id: CombatantId,
        priority: Decimal,
    ) -> Result<(), SchedulerError> {
        check_priority(id, priority)?;
        let idx = self.slot_of(id).ok_or(SchedulerError::NotQueued(id))?;
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.priority = priority;
        }
        Ok(())
    }

    fn for_each_remaining<F>(&mut self, mut f: F) -> Result<(), SchedulerError>
    where
        F: FnMut(CombatantId, Decimal) -> Decimal,
    {
        for entry in self.slots.iter_mut().flatten() {
            let priority = f(entry.id, entry.priority);
            check_priority(entry.id, priority)?;
            entry.priority = priority;
        }
        Ok(())
    }

    fn priority_of(&self, id: CombatantId) -> Option<Decimal> {
        self.slots
            .iter()
            .flatten()
            .find(|e| e.id == id)
            .map(|e| e.priority)
    }

    fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_min_orders_by_priority() {
        let mut queue = PairQueue::new();
        queue.insert(CombatantId(0), Decimal::from(20)).unwrap();
        queue.insert(CombatantId(1), Decimal::from(10)).unwrap();

        assert_eq!(queue.pop_min(), Some(CombatantId(1)));
        assert_eq!(queue.pop_min(), Some(CombatantId(0)));
        assert_eq!(queue.pop_min(), None);
    }

    #[test]
    fn test_ties_resolve_by_insertion_order() {
        let mut queue = PairQueue::new();
        queue.insert(CombatantId(1), Decimal::from(10)).unwrap();
        queue.insert(CombatantId(0), Decimal::from(10)).unwrap();

        assert_eq!(queue.pop_min(), Some(CombatantId(1)));
    }

    #[test]
    fn test_third_insert_is_full() {
        let mut queue = PairQueue::new();
        queue.insert(CombatantId(0), Decimal::ONE).unwrap();
        queue.insert(CombatantId(1), Decimal::ONE).unwrap();
        assert_eq!(
            queue.insert(CombatantId(2), Decimal::ONE),
            Err(SchedulerError::Full)
        );
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut queue = PairQueue::new();
        queue.insert(CombatantId(0), Decimal::ONE).unwrap();
        assert_eq!(
            queue.insert(CombatantId(0), Decimal::TWO),
            Err(SchedulerError::AlreadyQueued(CombatantId(0)))
        );
    }

    #[test]
    fn test_update_priority_requires_presence() {
        let mut queue = PairQueue::new();
        queue.insert(CombatantId(0), Decimal::from(20)).unwrap();
        queue.insert(CombatantId(1), Decimal::from(10)).unwrap();

        queue.update_priority(CombatantId(0), Decimal::from(5)).unwrap();
        assert_eq!(queue.priority_of(CombatantId(0)), Some(Decimal::from(5)));
        assert_eq!(queue.pop_min(), Some(CombatantId(0)));

        assert_eq!(
            queue.update_priority(CombatantId(0), Decimal::ONE),
            Err(SchedulerError::NotQueued(CombatantId(0)))
        );
    }

    #[test]
    fn test_for_each_remaining_scales_priorities() {
        let mut queue = PairQueue::new();
        queue.insert(CombatantId(0), Decimal::from(10)).unwrap();
        queue.insert(CombatantId(1), Decimal::from(20)).unwrap();
        queue.pop_min();

        queue
            .for_each_remaining(|_, p| p * Decimal::new(6, 1))
            .unwrap();
        assert_eq!(queue.priority_of(CombatantId(1)), Some(Decimal::from(12)));
        assert_eq!(queue.len(), 1);
    }
}
