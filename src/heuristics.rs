//! Variable and value ordering for the backtracking search.

use std::cmp::Reverse;

use crate::domains::DomainStore;
use crate::word_list::Vocabulary;
use crate::{Puzzle, SlotId, WordId};

/// Choose the next slot to fill: fewest remaining options first (MRV), then the slot crossing the
/// most others, then the earliest slot in reading order. Returns `None` once every slot has a
/// choice.
pub fn select_unassigned<P: Puzzle + ?Sized>(
    puzzle: &P,
    domains: &DomainStore,
    choices: &[Option<WordId>],
) -> Option<SlotId> {
    (0..puzzle.slots().len())
        .filter(|&slot_id| choices[slot_id].is_none())
        .min_by_key(|&slot_id| {
            (domains.len(slot_id), Reverse(puzzle.neighbors(slot_id).len()), slot_id)
        })
}

/// Number of options in the crossing slot carrying each glyph in the shared cell, along with the
/// cell index in our own slot and the crossing slot's total option count.
struct CrossingTally {
    cell_idx: usize,
    option_count: usize,
    glyph_counts: Vec<usize>,
}

/// Order the slot's current options least-constraining first: for each word, count how many
/// options it would rule out across the unfilled crossing slots, and sort ascending by that count
/// with ties left in word id order.
pub fn order_values<P: Puzzle + ?Sized>(
    puzzle: &P,
    vocabulary: &Vocabulary,
    domains: &DomainStore,
    slot_id: SlotId,
    choices: &[Option<WordId>],
) -> Vec<WordId> {
    let tallies: Vec<CrossingTally> = puzzle
        .neighbors(slot_id)
        .iter()
        .filter(|&&neighbor_id| choices[neighbor_id].is_none())
        .filter_map(|&neighbor_id| {
            let (cell_idx, other_cell_idx) = puzzle.overlap(slot_id, neighbor_id)?;

            let mut glyph_counts = vec![0; vocabulary.glyphs.len()];
            for word_id in domains.get(neighbor_id).iter() {
                glyph_counts[vocabulary.glyph(word_id, other_cell_idx)] += 1;
            }

            Some(CrossingTally { cell_idx, option_count: domains.len(neighbor_id), glyph_counts })
        })
        .collect();

    let mut options: Vec<WordId> = domains.get(slot_id).iter().collect();

    options.sort_by_cached_key(|&word_id| {
        let ruled_out: usize = tallies
            .iter()
            .map(|tally| {
                tally.option_count - tally.glyph_counts[vocabulary.glyph(word_id, tally.cell_idx)]
            })
            .sum();

        (ruled_out, word_id)
    });

    options
}

#[cfg(test)]
mod tests {
    use crate::arc_consistency::enforce_node_consistency;
    use crate::domains::DomainStore;
    use crate::grid_config::{generate_grid_config, GridConfig, GridEntry};
    use crate::heuristics::{order_values, select_unassigned};
    use crate::word_list::Vocabulary;
    use crate::Direction::{Across, Down};
    use crate::Puzzle;

    fn setup(list: &[&str], entries: &[GridEntry]) -> (GridConfig, Vocabulary, DomainStore) {
        let words: Vec<String> = list.iter().map(|w| w.to_string()).collect();
        let config = generate_grid_config(&words, entries).unwrap();
        let vocabulary = Vocabulary::new(config.words());
        let mut domains = DomainStore::new(config.slots().len(), vocabulary.len());
        enforce_node_consistency(&config, &vocabulary, &mut domains);
        (config, vocabulary, domains)
    }

    /// Three across slots and one down slot crossing all of them:
    ///
    /// AAA
    /// BBBB
    /// CCC
    ///
    /// with the down slot running through column 0.
    fn comb() -> Vec<GridEntry> {
        vec![
            GridEntry { loc: (0, 0), len: 3, dir: Across },
            GridEntry { loc: (0, 1), len: 4, dir: Across },
            GridEntry { loc: (0, 2), len: 3, dir: Across },
            GridEntry { loc: (0, 0), len: 3, dir: Down },
        ]
    }

    #[test]
    fn test_select_unassigned_prefers_fewest_options() {
        let (config, _, domains) = setup(&["cat", "dog", "cow", "bird"], &comb());

        // Slot order: (0,0) across, (0,0) down, (0,1) across, (0,2) across. The length-4 slot is
        // the only one with a single option.
        assert_eq!(select_unassigned(&config, &domains, &[None; 4]), Some(2));
    }

    #[test]
    fn test_select_unassigned_breaks_ties_by_degree_then_order() {
        let (config, _, domains) = setup(&["cat", "dog", "cow", "bird", "bark", "bone"], &comb());

        // Every length-3 slot has three options; the down slot crosses three others.
        let mut choices = [None; 4];
        choices[2] = Some(3);
        assert_eq!(select_unassigned(&config, &domains, &choices), Some(1));

        choices[1] = Some(0);
        assert_eq!(select_unassigned(&config, &domains, &choices), Some(0));

        choices[0] = Some(1);
        choices[3] = Some(2);
        assert_eq!(select_unassigned(&config, &domains, &choices), None);
    }

    #[test]
    fn test_order_values_least_constraining_first() {
        // The down slot starts at the across slot's last cell.
        let (config, vocabulary, domains) = setup(&["dot", "cat", "pal", "tea", "tab", "lip"], &[
            GridEntry { loc: (0, 0), len: 3, dir: Across },
            GridEntry { loc: (2, 0), len: 3, dir: Down },
        ]);

        // Down options start with d, c, p, t, t, l. Ending in "t" leaves two of the six, ending in
        // "l" or "p" leaves one, ending in "a" or "b" leaves none.
        let ordered: Vec<&str> = order_values(&config, &vocabulary, &domains, 0, &[None, None])
            .into_iter()
            .map(|word_id| vocabulary.word(word_id).string.as_str())
            .collect();

        assert_eq!(ordered, vec!["dot", "cat", "pal", "lip", "tea", "tab"]);
    }

    #[test]
    fn test_order_values_ignores_filled_crossings() {
        let (config, vocabulary, domains) = setup(&["dot", "cat", "pal", "tea", "tab", "lip"], &[
            GridEntry { loc: (0, 0), len: 3, dir: Across },
            GridEntry { loc: (2, 0), len: 3, dir: Down },
        ]);

        let ordered = order_values(&config, &vocabulary, &domains, 0, &[None, Some(3)]);

        assert_eq!(ordered, vec![0, 1, 2, 3, 4, 5]);
    }
}
