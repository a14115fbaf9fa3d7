//! Node consistency and a crossword-specific AC-3.
//!
//! A grid is arc-consistent when every word left in a slot's domain has, at each crossing, at
//! least one word in the crossing slot's domain with the same letter in the shared cell.

use std::collections::{HashSet, VecDeque};

use bit_set::BitSet;

use crate::domains::DomainStore;
use crate::word_list::Vocabulary;
use crate::{Puzzle, SlotId, WordId};

/// An ordered pair of slots `(x, y)`: "x must stay consistent with y".
pub type SlotArc = (SlotId, SlotId);

/// Remove every word whose length doesn't match its slot. Running this more than once has no
/// further effect.
pub fn enforce_node_consistency<P: Puzzle + ?Sized>(
    puzzle: &P,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
) {
    for (slot_id, slot) in puzzle.slots().iter().enumerate() {
        let mismatched: Vec<WordId> = domains
            .get(slot_id)
            .iter()
            .filter(|&word_id| vocabulary.word(word_id).len() != slot.length)
            .collect();

        for word_id in mismatched {
            domains.remove(slot_id, word_id);
        }
    }
}

/// Every overlapping ordered pair in the puzzle, in slot order.
pub fn all_arcs<P: Puzzle + ?Sized>(puzzle: &P) -> Vec<SlotArc> {
    (0..puzzle.slots().len())
        .flat_map(|slot_id| {
            puzzle.neighbors(slot_id).iter().map(move |&neighbor_id| (slot_id, neighbor_id))
        })
        .collect()
}

/// FIFO worklist of arcs that ignores arcs already waiting in the queue.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<SlotArc>,
    queued: HashSet<SlotArc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
    where
        Items: IntoIterator<Item = SlotArc>,
    {
        let mut queue = ConsistencyQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<SlotArc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: SlotArc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Make `slot_id` arc-consistent with `other_slot_id` by removing every option whose letter in
/// the shared cell doesn't appear in that cell for any of the other slot's options. Returns
/// whether anything was removed; slots that don't cross are left alone.
pub fn revise<P: Puzzle + ?Sized>(
    puzzle: &P,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
    slot_id: SlotId,
    other_slot_id: SlotId,
) -> bool {
    let Some((cell_idx, other_cell_idx)) = puzzle.overlap(slot_id, other_slot_id) else {
        return false;
    };

    // Which glyphs can the crossing slot still put in the shared cell?
    let supported_glyphs: BitSet = domains
        .get(other_slot_id)
        .iter()
        .map(|word_id| vocabulary.glyph(word_id, other_cell_idx))
        .collect();

    let unsupported: Vec<WordId> = domains
        .get(slot_id)
        .iter()
        .filter(|&word_id| !supported_glyphs.contains(vocabulary.glyph(word_id, cell_idx)))
        .collect();

    for &word_id in &unsupported {
        domains.remove(slot_id, word_id);
    }

    !unsupported.is_empty()
}

/// Run AC-3 until no more eliminations are possible. With `initial_arcs` of `None` every arc in
/// the puzzle is checked; otherwise only the given arcs and whatever they lead to.
///
/// Returns false as soon as any slot's domain is wiped out, leaving the store partially pruned;
/// callers restore a checkpoint in that case.
pub fn propagate<P: Puzzle + ?Sized>(
    puzzle: &P,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
    initial_arcs: Option<&[SlotArc]>,
) -> bool {
    let mut queue = match initial_arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(arcs.iter().cloned()),
        None => ConsistencyQueue::with_initial_queue(all_arcs(puzzle)),
    };

    while let Some((slot_id, other_slot_id)) = queue.pop_front() {
        if !revise(puzzle, vocabulary, domains, slot_id, other_slot_id) {
            continue;
        }

        if domains.is_empty(slot_id) {
            return false;
        }

        // The slot lost options, so its other crossings may have lost their support.
        for &neighbor_id in puzzle.neighbors(slot_id) {
            if neighbor_id != other_slot_id {
                queue.enqueue((neighbor_id, slot_id));
            }
        }
    }

    true
}
