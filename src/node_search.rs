//! Best-first search over whole board configurations.
//!
//! Only run once the board has been reduced to its small residual, where the
//! number of reachable configurations is tiny. Priority is depth plus the
//! board heuristic; ties go to the configuration discovered first, and a
//! configuration is never queued twice.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::{Result, SolveError};
use crate::puzzle::{BoardKey, Move, Puzzle};
use crate::solver::SearchStats;

struct Candidate {
    priority: usize,
    order: usize,
    depth: usize,
    puzzle: Puzzle,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

type Explored = FxHashMap<BoardKey, Option<(Move, BoardKey)>>;

/// Searches for a move sequence taking `root` to the solved board, sliding
/// the blank through active cells only.
///
/// With `budget` set, gives up with [`SolveError::BudgetExceeded`] once that
/// many configurations have been expanded.
pub fn solve_residual(
    root: &Puzzle,
    budget: Option<usize>,
    stats: &mut SearchStats,
) -> Result<Vec<Move>> {
    let mut frontier = BinaryHeap::new();
    let mut explored = Explored::default();
    let mut order = 0;
    let mut expansions = 0;

    explored.insert(root.key(), None);
    frontier.push(Candidate {
        priority: 0,
        order,
        depth: 0,
        puzzle: root.clone(),
    });

    while let Some(Candidate { depth, puzzle, .. }) = frontier.pop() {
        if puzzle.is_solved() {
            let moves = reconstruct(&explored, puzzle.key());
            debug!(
                "residual solved in {} moves after {} expansions ({} configurations seen)",
                moves.len(),
                expansions,
                explored.len()
            );
            return Ok(moves);
        }
        if let Some(limit) = budget {
            if expansions >= limit {
                return Err(SolveError::BudgetExceeded { budget: limit });
            }
        }
        expansions += 1;
        stats.node_expansions += 1;

        let blank = puzzle.blank();
        let key = puzzle.key();
        for (step, cell) in puzzle.steps(blank) {
            let child = puzzle.swapped(blank, cell);
            let child_key = child.key();
            if explored.contains_key(&child_key) {
                continue;
            }
            explored.insert(child_key, Some((step, key.clone())));

            order += 1;
            frontier.push(Candidate {
                priority: depth + 1 + child.heuristic(),
                order,
                depth: depth + 1,
                puzzle: child,
            });
        }
    }

    Err(SolveError::ResidualSearchExhausted { expansions })
}

fn reconstruct(explored: &Explored, goal: BoardKey) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut key = goal;
    while let Some(Some((step, parent))) = explored.get(&key) {
        moves.push(*step);
        key = parent.clone();
    }
    moves.reverse();
    moves
}
