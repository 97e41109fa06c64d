//! Entry point tying the reduction and the residual search together.

use log::debug;

use crate::error::{Result, SolveError};
use crate::node_search::solve_residual;
use crate::puzzle::{Move, Puzzle};
use crate::reduce::{Reducer, Reduction};
use crate::render::Snapshot;
use crate::tile_search::TileSearch;

/// Work counters for one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub tile_searches: usize,
    pub tile_expansions: usize,
    pub node_expansions: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub tile_search: TileSearch,
    /// Upper bound on configurations expanded by the residual search.
    pub max_expansions: Option<usize>,
}

/// One committed slide: its direction, the tile that moved, and the board
/// right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub step: Move,
    pub tile: u32,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub initial: Snapshot,
    pub moves: Vec<MoveRecord>,
    pub reduction: Reduction,
    pub stats: SearchStats,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|record| record.step)
    }
}

/// Slides the blank of the working board and logs the result.
pub(crate) fn record_move(puzzle: &mut Puzzle, log: &mut Vec<MoveRecord>, step: Move) -> Result<()> {
    let from = puzzle.blank();
    let tile = puzzle
        .apply_move(step)
        .ok_or(SolveError::IllegalMove { step, from })?;
    log.push(MoveRecord {
        step,
        tile,
        snapshot: puzzle.snapshot(),
    });
    Ok(())
}

#[derive(Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    stats: SearchStats,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
        }
    }

    /// Counters from the most recent solve, including failed ones.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn solve(&mut self, rows: &[Vec<u32>]) -> Result<Solution> {
        self.solve_puzzle(Puzzle::from_rows(rows)?)
    }

    /// Checks parity, reduces the board to its residual, then searches the
    /// residual. Unsolvable boards are rejected before any search runs.
    pub fn solve_puzzle(&mut self, mut puzzle: Puzzle) -> Result<Solution> {
        self.stats = SearchStats::default();
        if !puzzle.is_solvable() {
            debug!("rejecting board with {} inversions", puzzle.inversions());
            return Err(SolveError::Unsolvable);
        }

        let initial = puzzle.snapshot();
        let mut moves = Vec::new();
        let reduction =
            Reducer::new(&mut puzzle, &mut moves, &mut self.stats, self.config.tile_search)
                .reduce()?;
        let reduced = moves.len();

        for step in solve_residual(&puzzle, self.config.max_expansions, &mut self.stats)? {
            record_move(&mut puzzle, &mut moves, step)?;
        }
        debug!(
            "solved width {} in {} moves ({} from reduction, {} from residual search)",
            puzzle.size(),
            moves.len(),
            reduced,
            moves.len() - reduced
        );

        Ok(Solution {
            initial,
            moves,
            reduction,
            stats: self.stats,
        })
    }
}

/// Solves a board with the default configuration.
pub fn solve(rows: &[Vec<u32>]) -> Result<Solution> {
    Solver::default().solve(rows)
}
