//! Grid filling by backtracking search with maintained arc consistency.
//!
//! After node consistency and a full AC-3 pass, we repeatedly pick the most constrained unfilled
//! slot, try its options least-constraining first, and after each tentative choice shrink the
//! slot's domain to that word and propagate to its crossings. A failed branch is undone by
//! restoring the domain store to the checkpoint taken when the slot was picked.

use bit_set::BitSet;
use instant::{Duration, Instant};
use log::{debug, error, info, trace};

use crate::arc_consistency::{enforce_node_consistency, propagate, SlotArc};
use crate::consistency::{check_assignment, is_consistent};
use crate::domains::{Checkpoint, DomainStore};
use crate::heuristics::{order_values, select_unassigned};
use crate::word_list::Vocabulary;
use crate::{Assignment, Puzzle, SlotId, WordId};

/// Limits on how long a fill attempt may run. The default is unlimited.
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    pub time_limit: Option<Duration>,
    pub state_limit: Option<u64>,
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// Why a fill attempt didn't produce an assignment. Neither case is an error in the puzzle.
#[derive(Debug)]
pub enum FillFailure {
    /// Every possibility was ruled out.
    Unsolvable { statistics: Statistics },

    /// The time or state limit from `SolverOptions` ran out first.
    BudgetExhausted { statistics: Statistics },
}

impl FillFailure {
    pub fn statistics(&self) -> &Statistics {
        match self {
            FillFailure::Unsolvable { statistics } => statistics,
            FillFailure::BudgetExhausted { statistics } => statistics,
        }
    }
}

/// One level of the search: the slot being filled, the domain state from before we touched it,
/// and the options still to try.
#[derive(Debug)]
struct Frame {
    slot_id: SlotId,
    checkpoint: Checkpoint,
    options: Vec<WordId>,
    next_option: usize,
}

fn budget_exhausted(options: &SolverOptions, statistics: &Statistics, start: Instant) -> bool {
    options.time_limit.is_some_and(|limit| start.elapsed() >= limit)
        || options.state_limit.is_some_and(|limit| statistics.states >= limit)
}

/// Fill every slot of the puzzle, or return `None` if that's impossible.
pub fn solve<P: Puzzle + ?Sized>(puzzle: &P) -> Option<Assignment> {
    find_fill(puzzle, &SolverOptions::default()).ok().map(|success| success.assignment)
}

/// Search for a valid fill for the given puzzle within the given limits.
pub fn find_fill<P: Puzzle + ?Sized>(
    puzzle: &P,
    options: &SolverOptions,
) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();
    let mut statistics = Statistics::default();

    let slot_count = puzzle.slots().len();
    let vocabulary = Vocabulary::new(puzzle.words());
    let mut domains = DomainStore::new(slot_count, vocabulary.len());

    info!("Filling {} slots from {} words", slot_count, vocabulary.len());

    // Establish node and arc consistency up front. If either leaves a slot with nothing to
    // choose from there's no point searching.
    enforce_node_consistency(puzzle, &vocabulary, &mut domains);
    debug!(
        "Node consistency left {} options across all slots",
        (0..slot_count).map(|slot_id| domains.len(slot_id)).sum::<usize>()
    );

    let arc_consistent = propagate(puzzle, &vocabulary, &mut domains, None);
    if !arc_consistent || (0..slot_count).any(|slot_id| domains.is_empty(slot_id)) {
        debug!("Initial consistency pass emptied a slot");
        statistics.duration = start.elapsed();
        info!("No fill exists ({:?})", statistics);
        return Err(FillFailure::Unsolvable { statistics });
    }
    debug!(
        "Arc consistency left {} options across all slots",
        (0..slot_count).map(|slot_id| domains.len(slot_id)).sum::<usize>()
    );

    let mut choices: Vec<Option<WordId>> = vec![None; slot_count];
    let mut frames: Vec<Frame> = Vec::with_capacity(slot_count);

    // Choose whichever slot is most constrained until all slots are filled.
    'slot_selection: loop {
        let Some(slot_id) = select_unassigned(puzzle, &domains, &choices) else {
            break;
        };

        // Only give up while there's still something left to fill.
        if budget_exhausted(options, &statistics, start) {
            statistics.duration = start.elapsed();
            debug!("Search budget exhausted at depth {}", frames.len());
            info!("Gave up ({:?})", statistics);
            return Err(FillFailure::BudgetExhausted { statistics });
        }

        statistics.states += 1;
        trace!(
            "State {}: filling {:?} with {} options at depth {}",
            statistics.states,
            puzzle.slots()[slot_id],
            domains.len(slot_id),
            frames.len(),
        );

        frames.push(Frame {
            slot_id,
            checkpoint: domains.snapshot(),
            options: order_values(puzzle, &vocabulary, &domains, slot_id, &choices),
            next_option: 0,
        });

        // Try the next option for the innermost slot, backing out of any slot whose options are
        // exhausted.
        while let Some(frame) = frames.last_mut() {
            while let Some(&word_id) = frame.options.get(frame.next_option) {
                frame.next_option += 1;

                // Undo whatever the previous option did.
                domains.restore(frame.checkpoint);
                choices[frame.slot_id] = Some(word_id);

                if !is_consistent(puzzle, &vocabulary, &choices) {
                    continue;
                }

                // Commit the slot to this word and see what that implies for its crossings.
                domains.replace(frame.slot_id, BitSet::from_iter([word_id]));
                let arcs: Vec<SlotArc> = puzzle
                    .neighbors(frame.slot_id)
                    .iter()
                    .map(|&neighbor_id| (neighbor_id, frame.slot_id))
                    .collect();

                if propagate(puzzle, &vocabulary, &mut domains, Some(&arcs)) {
                    continue 'slot_selection;
                }
            }

            domains.restore(frame.checkpoint);
            choices[frame.slot_id] = None;
            frames.pop();
            statistics.backtracks += 1;
        }

        statistics.duration = start.elapsed();
        info!("No fill exists ({:?})", statistics);
        return Err(FillFailure::Unsolvable { statistics });
    }

    let assignment: Assignment = puzzle
        .slots()
        .iter()
        .zip(&choices)
        .filter_map(|(&slot, choice)| {
            choice.map(|word_id| (slot, vocabulary.word(word_id).string.clone()))
        })
        .collect();

    statistics.duration = start.elapsed();

    if !check_assignment(puzzle, &assignment) {
        error!("Search produced an invalid fill: {:?}", assignment);
        return Err(FillFailure::Unsolvable { statistics });
    }

    info!("Found a fill ({:?})", statistics);

    Ok(FillSuccess { statistics, assignment })
}
