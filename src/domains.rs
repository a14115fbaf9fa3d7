//! Per-slot candidate sets with trail-based rollback.
//!
//! Every change to a domain is recorded on a trail. A `Checkpoint` is a position on that trail,
//! and restoring it undoes the recorded changes in reverse order, so backtracking costs time
//! proportional to the work being undone rather than to the size of the grid.

use std::fmt::{Debug, Formatter};

use bit_set::BitSet;

use crate::{SlotId, WordId};

/// One recorded domain change.
#[derive(Debug, Clone, Copy)]
enum TrailEntry {
    Removed(SlotId, WordId),
    Inserted(SlotId, WordId),
}

/// An opaque handle to a past state of a `DomainStore`. Checkpoints nest: restoring one
/// invalidates any checkpoint taken after it, but the same checkpoint can be restored any number
/// of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    trail_len: usize,
    id: u64,
    depth: usize,
}

/// Owns the current domain of every slot.
#[derive(Clone)]
pub struct DomainStore {
    domains: Vec<BitSet>,

    /// Cached `domains[slot_id].len()`, since bit sets count by scanning.
    counts: Vec<usize>,

    trail: Vec<TrailEntry>,

    /// Ids of the checkpoints that can still be restored, oldest first. A checkpoint's `depth` is
    /// its index here.
    live_checkpoints: Vec<u64>,
    next_checkpoint_id: u64,
}

impl Debug for DomainStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainStore")
            .field("counts", &self.counts)
            .field("trail", &(["(", &self.trail.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl DomainStore {
    /// Create a store where every one of `slot_count` slots starts with all `word_count` words.
    pub fn new(slot_count: usize, word_count: usize) -> DomainStore {
        let full: BitSet = (0..word_count).collect();

        DomainStore {
            domains: (0..slot_count).map(|_| full.clone()).collect(),
            counts: vec![word_count; slot_count],
            trail: vec![],
            live_checkpoints: vec![],
            next_checkpoint_id: 0,
        }
    }

    pub fn get(&self, slot_id: SlotId) -> &BitSet {
        &self.domains[slot_id]
    }

    /// Number of candidates remaining for the slot.
    pub fn len(&self, slot_id: SlotId) -> usize {
        self.counts[slot_id]
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.counts[slot_id] == 0
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.domains[slot_id].contains(word_id)
    }

    /// Remove a word from a slot's domain, returning whether it was present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        if !self.domains[slot_id].remove(word_id) {
            return false;
        }
        self.counts[slot_id] -= 1;
        self.trail.push(TrailEntry::Removed(slot_id, word_id));
        true
    }

    /// Replace a slot's domain wholesale. Only the difference is recorded on the trail.
    pub fn replace(&mut self, slot_id: SlotId, new_domain: BitSet) {
        let removed: Vec<WordId> = self.domains[slot_id].difference(&new_domain).collect();
        let inserted: Vec<WordId> = new_domain.difference(&self.domains[slot_id]).collect();

        for word_id in removed {
            self.trail.push(TrailEntry::Removed(slot_id, word_id));
        }
        for word_id in inserted {
            self.trail.push(TrailEntry::Inserted(slot_id, word_id));
        }

        self.counts[slot_id] = new_domain.len();
        self.domains[slot_id] = new_domain;
    }

    pub fn snapshot(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            trail_len: self.trail.len(),
            id: self.next_checkpoint_id,
            depth: self.live_checkpoints.len(),
        };
        self.next_checkpoint_id += 1;
        self.live_checkpoints.push(checkpoint.id);
        checkpoint
    }

    /// Can `checkpoint` still be restored? Restoring a checkpoint invalidates every checkpoint
    /// taken after it.
    pub fn is_live(&self, checkpoint: Checkpoint) -> bool {
        self.live_checkpoints.get(checkpoint.depth) == Some(&checkpoint.id)
    }

    /// Undo every change made since `checkpoint` was taken.
    ///
    /// Panics if `checkpoint` was invalidated by restoring an earlier one, since the trail no
    /// longer leads back to the state it was taken in.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        assert!(
            self.is_live(checkpoint),
            "Restoring a checkpoint invalidated by an earlier restore"
        );
        self.live_checkpoints.truncate(checkpoint.depth + 1);

        while self.trail.len() > checkpoint.trail_len {
            match self.trail.pop() {
                Some(TrailEntry::Removed(slot_id, word_id)) => {
                    self.domains[slot_id].insert(word_id);
                    self.counts[slot_id] += 1;
                }
                Some(TrailEntry::Inserted(slot_id, word_id)) => {
                    self.domains[slot_id].remove(word_id);
                    self.counts[slot_id] -= 1;
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bit_set::BitSet;

    use crate::domains::DomainStore;

    fn domain_of(store: &DomainStore, slot_id: usize) -> Vec<usize> {
        store.get(slot_id).iter().collect()
    }

    #[test]
    fn test_new_store_starts_full() {
        let store = DomainStore::new(2, 4);

        assert_eq!(domain_of(&store, 0), vec![0, 1, 2, 3]);
        assert_eq!(domain_of(&store, 1), vec![0, 1, 2, 3]);
        assert_eq!(store.len(1), 4);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut store = DomainStore::new(1, 3);

        assert!(store.remove(0, 1));
        assert!(!store.remove(0, 1));
        assert!(!store.contains(0, 1));
        assert_eq!(domain_of(&store, 0), vec![0, 2]);
        assert_eq!(store.len(0), 2);
    }

    #[test]
    fn test_restore_is_exact_after_mixed_mutation() {
        let mut store = DomainStore::new(3, 5);
        store.remove(2, 4);
        let before: Vec<Vec<usize>> = (0..3).map(|slot_id| domain_of(&store, slot_id)).collect();

        let checkpoint = store.snapshot();
        store.remove(0, 0);
        store.remove(0, 3);
        store.replace(1, BitSet::from_iter([2]));
        store.replace(2, BitSet::from_iter([0, 4]));
        store.restore(checkpoint);

        let after: Vec<Vec<usize>> = (0..3).map(|slot_id| domain_of(&store, slot_id)).collect();
        assert_eq!(before, after);
        assert_eq!(store.len(0), 5);
        assert_eq!(store.len(1), 5);
        assert_eq!(store.len(2), 4);
    }

    #[test]
    fn test_checkpoint_can_be_restored_repeatedly() {
        let mut store = DomainStore::new(1, 4);
        let checkpoint = store.snapshot();

        store.remove(0, 0);
        store.restore(checkpoint);
        store.remove(0, 1);
        store.remove(0, 2);
        store.restore(checkpoint);

        assert_eq!(domain_of(&store, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_nested_checkpoints_unwind_in_order() {
        let mut store = DomainStore::new(1, 4);
        let outer = store.snapshot();
        store.remove(0, 0);
        let inner = store.snapshot();
        store.remove(0, 1);

        store.restore(inner);
        assert_eq!(domain_of(&store, 0), vec![1, 2, 3]);

        store.restore(outer);
        assert_eq!(domain_of(&store, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restoring_earlier_checkpoint_invalidates_later_ones() {
        let mut store = DomainStore::new(1, 4);
        let outer = store.snapshot();
        store.remove(0, 0);
        let inner = store.snapshot();

        store.restore(outer);
        store.remove(0, 3);

        assert!(store.is_live(outer));
        assert!(!store.is_live(inner));
        assert_eq!(domain_of(&store, 0), vec![0, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "invalidated by an earlier restore")]
    fn test_restoring_stale_checkpoint_panics() {
        let mut store = DomainStore::new(1, 4);
        let outer = store.snapshot();
        store.remove(0, 0);
        let inner = store.snapshot();

        // The trail ends up as long as it was when `inner` was taken, but holds different changes.
        store.restore(outer);
        store.remove(0, 3);
        store.restore(inner);
    }
}
