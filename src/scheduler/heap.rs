//! Indexed binary min-heap for matches with any number of combatants

use ahash::AHashMap;
use rust_decimal::Decimal;

use super::{check_priority, Entry, ReadinessQueue};
use crate::core::error::SchedulerError;
use crate::core::types::CombatantId;

/// Binary heap with an identity -> slot index for in-place priority changes
#[derive(Debug, Clone, Default)]
pub struct ReadinessHeap {
    entries: Vec<Entry>,
    slots: AHashMap<CombatantId, usize>,
    next_seq: u64,
}

impl ReadinessHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: AHashMap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].id, a);
        self.slots.insert(self.entries[b].id, b);
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.entries[idx].precedes(&self.entries[parent]) {
                self.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len && self.entries[left].precedes(&self.entries[smallest]) {
                smallest = left;
            }
            if right < len && self.entries[right].precedes(&self.entries[smallest]) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    /// Restore heap order after arbitrary priority changes
    fn rebuild(&mut self) {
        for idx in (0..self.entries.len() / 2).rev() {
            self.sift_down(idx);
        }
    }
}

impl ReadinessQueue for ReadinessHeap {
    fn insert(&mut self, id: CombatantId, priority: Decimal) -> Result<(), SchedulerError> {
        check_priority(id, priority)?;
        if self.slots.contains_key(&id) {
            return Err(SchedulerError::AlreadyQueued(id));
        }

        let idx = self.entries.len();
        self.entries.push(Entry {
            id,
            priority,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.slots.insert(id, idx);
        self.sift_up(idx);
        Ok(())
    }

    fn pop_min(&mut self) -> Option<CombatantId> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let min = self.entries.pop()?;
        self.slots.remove(&min.id);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(min.id)
    }

    fn update_priority(
        &mut self,
        id: CombatantId,
        priority: Decimal,
    ) -> Result<(), SchedulerError> {
        check_priority(id, priority)?;
        let idx = *self.slots.get(&id).ok_or(SchedulerError::NotQueued(id))?;

        let previous = self.entries[idx].priority;
        self.entries[idx].priority = priority;
        if priority < previous {
            self.sift_up(idx);
        } else {
            self.sift_down(idx);
        }
        Ok(())
    }

    fn for_each_remaining<F>(&mut self, mut f: F) -> Result<(), SchedulerError>
    where
        F: FnMut(CombatantId, Decimal) -> Decimal,
    {
        let mut result = Ok(());
        for entry in self.entries.iter_mut() {
            let priority = f(entry.id, entry.priority);
            if let Err(e) = check_priority(entry.id, priority) {
                result = Err(e);
                break;
            }
            entry.priority = priority;
        }
        self.rebuild();
        result
    }

    fn priority_of(&self, id: CombatantId) -> Option<Decimal> {
        self.slots.get(&id).map(|&idx| self.entries[idx].priority)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
