//! Routing the blank to a target cell around one protected tile.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;
use rustc_hash::FxHashMap;

use crate::error::{Result, SolveError};
use crate::puzzle::{distance, Cell, Move, Puzzle};
use crate::solver::SearchStats;

/// Priority used by the blank pathfinder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileSearch {
    /// Rank cells by distance to the target only. Always finds a path when
    /// one exists, but not necessarily a shortest one.
    #[default]
    Greedy,
    /// Rank cells by walked steps plus distance to the target (A*).
    Shortest,
}

/// Blank walk: each entry is the step taken and the cell it lands on.
pub type BlankPath = Vec<(Move, Cell)>;

type Explored = FxHashMap<Cell, (usize, Option<(Move, Cell)>)>;

#[derive(Debug, PartialEq, Eq)]
struct Candidate {
    priority: usize,
    order: usize,
    depth: usize,
    cell: Cell,
}

// BinaryHeap is a max-heap: lower priority first, then earlier insertion.
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

/// Finds a walk of the blank from `blank` to `target` through active cells,
/// never entering the cell that holds `protected`.
pub fn find_blank_path(
    puzzle: &Puzzle,
    blank: Cell,
    target: Cell,
    protected: u32,
    mode: TileSearch,
    stats: &mut SearchStats,
) -> Result<BlankPath> {
    stats.tile_searches += 1;

    let mut frontier = BinaryHeap::new();
    let mut explored = Explored::default();
    let mut order = 0;

    explored.insert(blank, (0, None));
    frontier.push(Candidate {
        priority: 0,
        order,
        depth: 0,
        cell: blank,
    });

    while let Some(Candidate { depth, cell, .. }) = frontier.pop() {
        if cell == target {
            let path = reconstruct(&explored, target);
            trace!(
                "blank path {:?} -> {:?} around {}: {} steps",
                blank,
                target,
                protected,
                path.len()
            );
            return Ok(path);
        }
        // superseded by a shorter walk to the same cell
        if explored.get(&cell).is_some_and(|&(known, _)| known < depth) {
            continue;
        }
        stats.tile_expansions += 1;

        for (step, next) in puzzle.steps(cell) {
            if puzzle.value_at(next) == protected {
                continue;
            }
            let next_depth = depth + 1;
            match (mode, explored.get(&next)) {
                (TileSearch::Greedy, Some(_)) => continue,
                (TileSearch::Shortest, Some(&(known, _))) if known <= next_depth => continue,
                _ => {}
            }

            explored.insert(next, (next_depth, Some((step, cell))));
            order += 1;
            let priority = match mode {
                TileSearch::Greedy => distance(next, target),
                TileSearch::Shortest => next_depth + distance(next, target),
            };
            frontier.push(Candidate {
                priority,
                order,
                depth: next_depth,
                cell: next,
            });
        }
    }

    Err(SolveError::PathfindingExhausted {
        from: blank,
        to: target,
        protected,
    })
}

fn reconstruct(explored: &Explored, target: Cell) -> BlankPath {
    let mut path = Vec::new();
    let mut cell = target;
    while let Some(&(_, Some((step, previous)))) = explored.get(&cell) {
        path.push((step, cell));
        cell = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn assert_walk(puzzle: &Puzzle, blank: Cell, target: Cell, path: &BlankPath) {
        let mut at = blank;
        for &(step, cell) in path {
            assert_eq!(puzzle.neighbour(at, step), Some(cell), "step {step} from {at:?}");
            assert!(puzzle.is_active(cell));
            at = cell;
        }
        assert_eq!(at, target);
    }

    fn bfs_distance(puzzle: &Puzzle, from: Cell, to: Cell, protected: u32) -> Option<usize> {
        let mut seen = FxHashMap::default();
        let mut queue = VecDeque::from([(from, 0)]);
        seen.insert(from, ());
        while let Some((cell, d)) = queue.pop_front() {
            if cell == to {
                return Some(d);
            }
            for (_, next) in puzzle.steps(cell) {
                if puzzle.value_at(next) != protected && seen.insert(next, ()).is_none() {
                    queue.push_back((next, d + 1));
                }
            }
        }
        None
    }

    #[test]
    fn test_open_board_walk_is_shortest() {
        let puzzle = Puzzle::new(3);
        let mut stats = SearchStats::default();
        let path =
            find_blank_path(&puzzle, (2, 2), (0, 0), 0, TileSearch::Greedy, &mut stats).unwrap();
        assert_walk(&puzzle, (2, 2), (0, 0), &path);
        assert_eq!(path.len(), 4);
        assert_eq!(stats.tile_searches, 1);
        assert!(stats.tile_expansions >= 4);
    }

    #[test]
    fn test_blank_already_at_target() {
        let puzzle = Puzzle::new(3);
        let mut stats = SearchStats::default();
        let path =
            find_blank_path(&puzzle, (2, 2), (2, 2), 5, TileSearch::Greedy, &mut stats).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_walk_routes_around_protected_tile() {
        let puzzle = Puzzle::new(3);
        let protected = puzzle.value_at((1, 1));
        for mode in [TileSearch::Greedy, TileSearch::Shortest] {
            let mut stats = SearchStats::default();
            let path = find_blank_path(&puzzle, (1, 0), (1, 2), protected, mode, &mut stats)
                .unwrap();
            assert_walk(&puzzle, (1, 0), (1, 2), &path);
            assert!(path.iter().all(|&(_, cell)| cell != (1, 1)));
            assert_eq!(path.len(), 4);
        }
    }

    #[test]
    fn test_inactive_cells_are_walls() {
        let mut puzzle = Puzzle::new(3);
        puzzle.deactivate((0, 1));
        puzzle.deactivate((1, 1));
        puzzle.deactivate((2, 1));
        let protected = puzzle.value_at((1, 0));
        let mut stats = SearchStats::default();
        let result =
            find_blank_path(&puzzle, (2, 2), (0, 0), protected, TileSearch::Greedy, &mut stats);
        assert_eq!(
            result,
            Err(SolveError::PathfindingExhausted {
                from: (2, 2),
                to: (0, 0),
                protected,
            })
        );
    }

    #[test]
    fn test_shortest_mode_matches_breadth_first_distance() {
        // a wall with a single gap at the far end forces a detour
        let mut puzzle = Puzzle::new(5);
        for row in 0..4 {
            puzzle.deactivate((row, 2));
        }
        let (blank, target) = ((0, 0), (0, 4));
        let protected = puzzle.value_at((4, 0));
        let expected = bfs_distance(&puzzle, blank, target, protected).unwrap();

        let mut stats = SearchStats::default();
        let shortest =
            find_blank_path(&puzzle, blank, target, protected, TileSearch::Shortest, &mut stats)
                .unwrap();
        assert_walk(&puzzle, blank, target, &shortest);
        assert_eq!(shortest.len(), expected);

        let greedy =
            find_blank_path(&puzzle, blank, target, protected, TileSearch::Greedy, &mut stats)
                .unwrap();
        assert_walk(&puzzle, blank, target, &greedy);
        assert!(greedy.len() >= shortest.len());
    }
}
