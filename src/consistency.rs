use std::collections::HashSet;
use std::hash::Hash;

use crate::word_list::Vocabulary;
use crate::{Assignment, Puzzle, WordId};

/// Check a partial or complete fill, given as one optional letter sequence per slot id: no word
/// used twice, every word the length of its slot, and every pair of filled crossing slots agreeing
/// on the shared cell.
fn entries_consistent<P, T>(puzzle: &P, entries: &[Option<&[T]>]) -> bool
where
    P: Puzzle + ?Sized,
    T: Eq + Hash,
{
    let slots = puzzle.slots();
    let mut seen: HashSet<&[T]> = HashSet::with_capacity(entries.len());

    for (slot_id, entry) in entries.iter().enumerate() {
        let Some(letters) = *entry else {
            continue;
        };

        if letters.len() != slots[slot_id].length || !seen.insert(letters) {
            return false;
        }

        for &neighbor_id in puzzle.neighbors(slot_id) {
            // Each pair only needs checking once.
            if neighbor_id < slot_id {
                continue;
            }
            let Some(neighbor_letters) = entries.get(neighbor_id).copied().flatten() else {
                continue;
            };
            let Some((cell_idx, other_cell_idx)) = puzzle.overlap(slot_id, neighbor_id) else {
                continue;
            };

            match (letters.get(cell_idx), neighbor_letters.get(other_cell_idx)) {
                (Some(letter), Some(other_letter)) if letter == other_letter => {}
                _ => return false,
            }
        }
    }

    true
}

/// Consistency check used during search, where `choices` is indexed by slot id.
pub fn is_consistent<P: Puzzle + ?Sized>(
    puzzle: &P,
    vocabulary: &Vocabulary,
    choices: &[Option<WordId>],
) -> bool {
    let entries: Vec<Option<&[usize]>> = choices
        .iter()
        .map(|choice| choice.map(|word_id| vocabulary.word(word_id).glyphs.as_slice()))
        .collect();

    entries_consistent(puzzle, &entries)
}

/// Validate an assignment produced by the solver (or anyone else) against the puzzle. Slots that
/// aren't part of the puzzle make the assignment invalid.
pub fn check_assignment<P: Puzzle + ?Sized>(puzzle: &P, assignment: &Assignment) -> bool {
    let mut letters_by_slot: Vec<Option<Vec<char>>> = vec![None; puzzle.slots().len()];

    for (slot, word) in assignment {
        match puzzle.slot_id(slot) {
            Some(slot_id) => letters_by_slot[slot_id] = Some(word.chars().collect()),
            None => return false,
        }
    }

    let entries: Vec<Option<&[char]>> =
        letters_by_slot.iter().map(|letters| letters.as_deref()).collect();

    entries_consistent(puzzle, &entries)
}
