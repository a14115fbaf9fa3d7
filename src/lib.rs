use std::cmp::Ordering;
use std::collections::BTreeMap;

pub mod arc_consistency;
pub mod backtracking_search;
pub mod consistency;
pub mod domains;
pub mod errors;
pub mod grid_config;
pub mod heuristics;
pub mod logging;
pub mod word_list;

pub use backtracking_search::{
    find_fill, solve, FillFailure, FillSuccess, SolverOptions, Statistics,
};
pub use consistency::check_assignment;
pub use grid_config::{
    generate_grid_config, generate_grid_config_from_template_string, render_grid, GridConfig,
    GridEntry,
};

/// The expected maximum length for a single slot. Per-slot crossing lists are stored inline up to
/// this size.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given letter, based on its index in the vocabulary's `glyphs` field.
pub type GlyphId = usize;

/// An identifier for a given slot, based on its index in `Puzzle::slots`.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the vocabulary's `words` field.
pub type WordId = usize;

/// Zero-indexed x and y coords for a cell in the grid, where y = 0 in the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// A straight run of cells that needs one word. Two slots with the same anchor, direction and
/// length are the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn new(start_cell: GridCoord, direction: Direction, length: usize) -> Slot {
        Slot { start_cell, direction, length }
    }

    /// Coords of the cell at `cell_idx` within this slot.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.start_cell.0 + cell_idx, self.start_cell.1),
            Direction::Down => (self.start_cell.0, self.start_cell.1 + cell_idx),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |cell_idx| self.cell(cell_idx))
    }
}

// Row-major by anchor, so that slot ids (and therefore every tie-break in the search) follow
// reading order.
impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start_cell.1, self.start_cell.0, self.direction, self.length).cmp(&(
            other.start_cell.1,
            other.start_cell.0,
            other.direction,
            other.length,
        ))
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A complete or partial fill, mapping each slot to the word chosen for it.
pub type Assignment = BTreeMap<Slot, String>;

/// The static description of a puzzle that the solver consumes: the slots to fill, how they
/// cross, and the vocabulary every slot starts out with.
///
/// Implementations must keep `neighbors` and `overlap` in agreement: `b` is in `neighbors(a)` iff
/// `overlap(a, b)` is `Some`, and `overlap(a, b) == Some((i, j))` iff `overlap(b, a) ==
/// Some((j, i))`.
pub trait Puzzle {
    /// Every slot in the puzzle, in a fixed order. A `SlotId` is an index into this slice.
    fn slots(&self) -> &[Slot];

    /// Slots sharing a cell with the given slot.
    fn neighbors(&self, slot_id: SlotId) -> &[SlotId];

    /// The shared cell of two slots as `(offset into slot_id, offset into other_slot_id)`.
    fn overlap(&self, slot_id: SlotId, other_slot_id: SlotId) -> Option<(usize, usize)>;

    /// The initial vocabulary used to seed every slot's domain.
    fn words(&self) -> &[String];

    /// Look up the id of a slot by value.
    fn slot_id(&self, slot: &Slot) -> Option<SlotId> {
        self.slots().iter().position(|candidate| candidate == slot)
    }
}

#[cfg(test)]
mod tests {
    use crate::Direction::{Across, Down};
    use crate::Slot;

    #[test]
    fn test_slots_order_by_reading_position() {
        let mut slots = vec![
            Slot::new((0, 1), Across, 3),
            Slot::new((2, 0), Down, 3),
            Slot::new((0, 0), Down, 2),
            Slot::new((0, 0), Across, 3),
        ];
        slots.sort();

        assert_eq!(
            slots,
            vec![
                Slot::new((0, 0), Across, 3),
                Slot::new((0, 0), Down, 2),
                Slot::new((2, 0), Down, 3),
                Slot::new((0, 1), Across, 3),
            ]
        );
    }

    #[test]
    fn test_cell_coords_follow_direction() {
        let across: Vec<_> = Slot::new((1, 2), Across, 3).cell_coords().collect();
        let down: Vec<_> = Slot::new((1, 2), Down, 3).cell_coords().collect();

        assert_eq!(across, vec![(1, 2), (2, 2), (3, 2)]);
        assert_eq!(down, vec![(1, 2), (1, 3), (1, 4)]);
    }
}
