//! The static puzzle model: which slots exist, where they cross, and what words are available.

use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

use smallvec::{smallvec, SmallVec};

use crate::errors::GridConfigError;
use crate::{Assignment, Direction, GridCoord, Puzzle, Slot, SlotId, MAX_SLOT_LENGTH};

/// A crossing between one slot and another, referencing the other slot's id and the location of
/// the intersection within each slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub cell_idx: usize,
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// An across or down entry in the input to `generate_grid_config`.
#[derive(Debug, Clone)]
pub struct GridEntry {
    pub loc: GridCoord,
    pub len: usize,
    pub dir: Direction,
}

/// A struct representing the aspects of a grid that are static during filling.
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    open_cells: HashSet<GridCoord>,
    slots: Vec<Slot>,
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,
    neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>>,
    words: Vec<String>,
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slots", &self.slots)
            .field("crossings", &self.crossings)
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl GridConfig {
    /// Is the given cell part of the grid (as opposed to a block)?
    pub fn is_open(&self, loc: GridCoord) -> bool {
        self.open_cells.contains(&loc)
    }
}

impl Puzzle for GridConfig {
    fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        &self.neighbors[slot_id]
    }

    fn overlap(&self, slot_id: SlotId, other_slot_id: SlotId) -> Option<(usize, usize)> {
        self.crossings[slot_id]
            .iter()
            .find(|crossing| crossing.other_slot_id == other_slot_id)
            .map(|crossing| (crossing.cell_idx, crossing.other_slot_cell))
    }

    fn words(&self) -> &[String] {
        &self.words
    }
}

/// Shared implementation of the two constructors. `open_cells` may include cells that don't
/// belong to any slot.
fn build_grid_config(
    words: &[String],
    entries: &[GridEntry],
    mut open_cells: HashSet<GridCoord>,
) -> Result<GridConfig, GridConfigError> {
    if let Some(index) = entries.iter().position(|entry| entry.len == 0) {
        return Err(GridConfigError::ZeroLengthEntry { index });
    }

    let mut slots: Vec<Slot> =
        entries.iter().map(|entry| Slot::new(entry.loc, entry.dir, entry.len)).collect();
    slots.sort();
    slots.dedup();

    // Build a map from cell location to the slots passing through it, which we can then use to
    // calculate crossings.
    let mut cell_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();

    for (slot_id, slot) in slots.iter().enumerate() {
        for (cell_idx, loc) in slot.cell_coords().enumerate() {
            open_cells.insert(loc);

            let cell_entries = cell_by_loc.entry(loc).or_insert_with(|| smallvec![]);
            if let Some(&(other_slot_id, _)) = cell_entries.first() {
                if cell_entries.len() > 1 {
                    return Err(GridConfigError::MultipleCrossings { cell: loc });
                }
                if slots[other_slot_id].direction == slot.direction {
                    return Err(GridConfigError::ParallelOverlap {
                        first: other_slot_id,
                        second: slot_id,
                    });
                }
            }
            cell_entries.push((slot_id, cell_idx));
        }
    }

    let crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> = slots
        .iter()
        .enumerate()
        .map(|(slot_id, slot)| {
            slot.cell_coords()
                .enumerate()
                .filter_map(|(cell_idx, loc)| {
                    cell_by_loc[&loc]
                        .iter()
                        .find(|&&(other_slot_id, _)| other_slot_id != slot_id)
                        .map(|&(other_slot_id, other_slot_cell)| Crossing {
                            cell_idx,
                            other_slot_id,
                            other_slot_cell,
                        })
                })
                .collect()
        })
        .collect();

    let neighbors = crossings
        .iter()
        .map(|slot_crossings| {
            slot_crossings.iter().map(|crossing| crossing.other_slot_id).collect()
        })
        .collect();

    let width = open_cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
    let height = open_cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);

    Ok(GridConfig {
        width,
        height,
        open_cells,
        slots,
        crossings,
        neighbors,
        words: words.to_vec(),
    })
}

/// Generate a GridConfig representing a grid with the specified entries.
pub fn generate_grid_config(
    words: &[String],
    entries: &[GridEntry],
) -> Result<GridConfig, GridConfigError> {
    build_grid_config(words, entries, HashSet::new())
}

/// Generate a grid config from a string template, with `#` representing blocks and `_` or `.`
/// representing open cells. Every horizontal or vertical run of two or more open cells is a slot.
pub fn generate_grid_config_from_template_string(
    words: &[String],
    template: &str,
) -> Result<GridConfig, GridConfigError> {
    let template: Vec<Vec<char>> = template
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().collect())
        .collect();

    let Some(first_row) = template.first() else {
        return Err(GridConfigError::EmptyTemplate);
    };
    let width = first_row.len();

    let mut open_cells: HashSet<GridCoord> = HashSet::new();
    for (y, row) in template.iter().enumerate() {
        if row.len() != width {
            return Err(GridConfigError::RaggedTemplate {
                row: y,
                expected: width,
                found: row.len(),
            });
        }

        for (x, &ch) in row.iter().enumerate() {
            match ch {
                '#' => {}
                '_' | '.' => {
                    open_cells.insert((x, y));
                }
                _ => return Err(GridConfigError::InvalidTemplateChar { ch, x, y }),
            }
        }
    }

    // Walk each line of cells, emitting an entry for every run of open cells longer than one.
    fn build_entries(
        open_cells: &HashSet<GridCoord>,
        lines: usize,
        line_length: usize,
        dir: Direction,
        entries: &mut Vec<GridEntry>,
    ) {
        let loc_for = |line: usize, offset: usize| match dir {
            Direction::Across => (offset, line),
            Direction::Down => (line, offset),
        };

        for line in 0..lines {
            let mut run_start: Option<usize> = None;

            for offset in 0..=line_length {
                let open = offset < line_length && open_cells.contains(&loc_for(line, offset));

                match (open, run_start) {
                    (true, None) => run_start = Some(offset),
                    (false, Some(start)) => {
                        if offset - start > 1 {
                            entries.push(GridEntry {
                                loc: loc_for(line, start),
                                len: offset - start,
                                dir,
                            });
                        }
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
    }

    let height = template.len();
    let mut entries: Vec<GridEntry> = vec![];
    build_entries(&open_cells, height, width, Direction::Across, &mut entries);
    build_entries(&open_cells, width, height, Direction::Down, &mut entries);

    let mut config = build_grid_config(words, &entries, open_cells)?;
    config.width = width;
    config.height = height;

    Ok(config)
}

/// Turn the given grid config and assignment into a rendered string: `#` for blocks, letters for
/// filled cells, `.` for open cells nothing was placed in.
pub fn render_grid(config: &GridConfig, assignment: &Assignment) -> String {
    let mut grid: Vec<Vec<char>> = (0..config.height)
        .map(|y| {
            (0..config.width).map(|x| if config.is_open((x, y)) { '.' } else { '#' }).collect()
        })
        .collect();

    for (slot, word) in assignment {
        for ((x, y), ch) in slot.cell_coords().zip(word.chars()) {
            if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = ch;
            }
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect::<String>()).collect::<Vec<_>>().join("\n")
}
