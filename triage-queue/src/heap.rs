//! Binary max-heap with an id → slot index.
//!
//! Layout is the usual implicit tree: root at slot 0, children of `i` at
//! `2i + 1` and `2i + 2`, parent of `i` at `(i - 1) / 2`.
//!
//! `entries` is the only owner of patient data. `positions` is derived from
//! it and is rewritten in exactly two places: when a new patient is appended,
//! and inside [`IndexedPriorityHeap::exchange`]. The sift procedures reorder
//! entries only through `exchange`, so the two stores cannot drift apart.

use std::collections::HashMap;
use triage_types::{Admission, Patient, PatientId, Priority, Result};

/// Which branch an admission took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admitted {
    /// The id was not queued; a new entry was added.
    Inserted,
    /// The id was already queued; its priority and label were overwritten.
    Updated,
}

/// Priority queue of patients supporting in-place updates by id.
///
/// Every operation is O(log n) or better. Mutating calls take `&mut self`;
/// sharing one heap across threads needs an outer lock around every call.
#[derive(Debug, Clone, Default)]
pub struct IndexedPriorityHeap {
    /// Implicit binary tree, most urgent patient at slot 0.
    entries: Vec<Patient>,
    /// Current slot of every queued id.
    positions: HashMap<PatientId, usize>,
}

impl IndexedPriorityHeap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty heap with room for `capacity` patients.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of queued patients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no patient is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a patient with this id is queued.
    #[must_use]
    pub fn contains(&self, id: &PatientId) -> bool {
        self.positions.contains_key(id)
    }

    /// Returns a copy of the patient with this id, if queued.
    #[must_use]
    pub fn get(&self, id: &PatientId) -> Option<Patient> {
        self.positions.get(id).map(|&slot| self.entries[slot].clone())
    }

    /// Returns a copy of the most urgent patient, or `None` when empty.
    #[must_use]
    pub fn peek(&self) -> Option<Patient> {
        self.entries.first().cloned()
    }

    /// Adds a patient, or updates the one already queued under `id`.
    ///
    /// The priority is validated first; on error the heap is left exactly
    /// as it was.
    pub fn insert_or_update(
        &mut self,
        id: PatientId,
        priority: i64,
        label: impl Into<String>,
    ) -> Result<()> {
        let priority = Priority::new(priority)?;
        self.place(id, priority, label.into());
        Ok(())
    }

    /// Applies an already validated admission.
    pub fn admit(&mut self, admission: Admission) -> Admitted {
        let Admission {
            id,
            priority,
            label,
        } = admission;
        self.place(id, priority, label)
    }

    fn place(&mut self, id: PatientId, priority: Priority, label: String) -> Admitted {
        if let Some(&slot) = self.positions.get(&id) {
            let entry = &mut self.entries[slot];
            entry.priority = priority;
            entry.label = label;
            // At most one of the two passes moves the entry; the other is a no-op.
            let slot = self.sift_up(slot);
            self.sift_down(slot);
            return Admitted::Updated;
        }

        let slot = self.entries.len();
        self.entries.push(Patient {
            id,
            priority,
            label,
        });
        self.positions.insert(id, slot);
        self.sift_up(slot);
        Admitted::Inserted
    }

    /// True if the entry at slot `a` ranks strictly above the one at `b`.
    fn outranks(&self, a: usize, b: usize) -> bool {
        outranks(&self.entries[a], &self.entries[b])
    }

    /// Swaps two slots and re-points both ids at their new slots.
    fn exchange(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.positions.insert(self.entries[a].id, a);
        self.positions.insert(self.entries[b].id, b);
    }

    /// Moves the entry at `slot` toward the root. Returns its final slot.
    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.outranks(slot, parent) {
                break;
            }
            self.exchange(slot, parent);
            slot = parent;
        }
        slot
    }

    /// Moves the entry at `slot` toward the leaves. Returns its final slot.
    fn sift_down(&mut self, mut slot: usize) -> usize {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;

            if left < len && self.outranks(left, best) {
                best = left;
            }
            if right < len && self.outranks(right, best) {
                best = right;
            }
            if best == slot {
                return slot;
            }
            self.exchange(slot, best);
            slot = best;
        }
    }
}

/// Ranking rule: higher priority first, then smaller id.
fn outranks(a: &Patient, b: &Patient) -> bool {
    a.priority > b.priority || (a.priority == b.priority && a.id < b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: i64) -> PatientId {
        PatientId::from_i64(n)
    }

    fn assert_invariants(heap: &IndexedPriorityHeap) {
        for slot in 1..heap.entries.len() {
            let parent = (slot - 1) / 2;
            assert!(
                !heap.outranks(slot, parent),
                "slot {slot} ({}) outranks parent {parent} ({})",
                heap.entries[slot],
                heap.entries[parent]
            );
        }
        assert_eq!(heap.positions.len(), heap.entries.len());
        for (slot, entry) in heap.entries.iter().enumerate() {
            assert_eq!(heap.positions.get(&entry.id), Some(&slot), "stale index for {}", entry.id);
        }
    }

    #[test]
    fn outranks_prefers_priority_then_smaller_id() {
        let p = |n| Priority::new(n).unwrap();
        let high = Patient::new(id(200), p(8), "");
        let low = Patient::new(id(1), p(7), "");
        let tie_small = Patient::new(id(50), p(8), "");

        assert!(outranks(&high, &low));
        assert!(!outranks(&low, &high));
        assert!(outranks(&tie_small, &high));
        assert!(!outranks(&high, &tie_small));
        assert!(!outranks(&high, &high));
    }

    #[test]
    fn exchange_keeps_index_in_step() {
        let mut heap = IndexedPriorityHeap::new();
        heap.insert_or_update(id(1), 5, "a").unwrap();
        heap.insert_or_update(id(2), 4, "b").unwrap();
        heap.insert_or_update(id(3), 3, "c").unwrap();

        heap.exchange(0, 2);
        assert_eq!(heap.entries[0].id, id(3));
        assert_eq!(heap.entries[2].id, id(1));
        assert_eq!(heap.positions[&id(3)], 0);
        assert_eq!(heap.positions[&id(1)], 2);
        assert_eq!(heap.positions[&id(2)], 1);
    }

    #[test]
    fn sift_up_returns_final_slot() {
        let mut heap = IndexedPriorityHeap::new();
        for (n, prio) in [(1, 9), (2, 8), (3, 7), (4, 6)] {
            heap.insert_or_update(id(n), prio, "").unwrap();
        }
        // Slot 3 is a leaf under slot 1; raise it above everything.
        heap.entries[3].priority = Priority::new(10).unwrap();
        assert_eq!(heap.sift_up(3), 0);
        assert_eq!(heap.entries[0].id, id(4));
        assert_invariants(&heap);
    }

    #[test]
    fn sift_down_on_leaf_is_noop() {
        let mut heap = IndexedPriorityHeap::new();
        heap.insert_or_update(id(1), 9, "").unwrap();
        heap.insert_or_update(id(2), 1, "").unwrap();
        assert_eq!(heap.sift_down(1), 1);
        assert_invariants(&heap);
    }

    #[test]
    fn lowering_root_sinks_it_to_a_leaf() {
        let mut heap = IndexedPriorityHeap::new();
        for n in 1..=7 {
            heap.insert_or_update(id(n), 5, "").unwrap();
        }
        assert_eq!(heap.peek().unwrap().id, id(1));

        heap.insert_or_update(id(1), 1, "").unwrap();
        let slot = heap.positions[&id(1)];
        assert!(2 * slot + 1 >= heap.len(), "id 1 should end on a leaf, got slot {slot}");
        assert_invariants(&heap);
    }

    #[test]
    fn rejected_update_leaves_storage_untouched() {
        let mut heap = IndexedPriorityHeap::new();
        heap.insert_or_update(id(10), 4, "x").unwrap();
        heap.insert_or_update(id(11), 6, "y").unwrap();
        let entries = heap.entries.clone();
        let positions = heap.positions.clone();

        assert!(heap.insert_or_update(id(10), 0, "changed").is_err());
        assert!(heap.insert_or_update(id(12), 11, "new").is_err());

        assert_eq!(heap.entries, entries);
        assert_eq!(heap.positions, positions);
    }

    proptest! {
        #[test]
        fn invariants_hold_after_every_call(
            ops in prop::collection::vec((0i64..24, 1i64..=10, "[a-z]{0,6}"), 1..200)
        ) {
            let mut heap = IndexedPriorityHeap::new();
            for (n, prio, label) in ops {
                heap.insert_or_update(id(n), prio, label).unwrap();
                assert_invariants(&heap);
            }
        }

        #[test]
        fn invalid_priorities_never_mutate(
            seed in prop::collection::vec((0i64..16, 1i64..=10), 0..40),
            target in 0i64..16,
            bad in prop_oneof![i64::MIN..1, 11i64..i64::MAX],
        ) {
            let mut heap = IndexedPriorityHeap::new();
            for (n, prio) in seed {
                heap.insert_or_update(id(n), prio, "").unwrap();
            }
            let entries = heap.entries.clone();
            let positions = heap.positions.clone();

            prop_assert!(heap.insert_or_update(id(target), bad, "bad").is_err());
            prop_assert_eq!(&heap.entries, &entries);
            prop_assert_eq!(&heap.positions, &positions);
        }
    }
}
