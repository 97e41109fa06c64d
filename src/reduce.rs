//! Divide and conquer: fix the outer rows and columns one line at a time with
//! blank walks only, until a 2x3 block remains in the bottom-right corner.

use std::fmt;

use log::{debug, trace};

use crate::error::{Result, SolveError};
use crate::puzzle::{distance, Cell, Move, Puzzle};
use crate::solver::{record_move, MoveRecord, SearchStats};
use crate::tile_search::{find_blank_path, TileSearch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

/// The `index`-th row or column, solved from position `index` outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub axis: Axis,
    pub index: usize,
}

impl Line {
    pub fn row(index: usize) -> Self {
        Self {
            axis: Axis::Row,
            index,
        }
    }

    pub fn column(index: usize) -> Self {
        Self {
            axis: Axis::Column,
            index,
        }
    }

    /// Cell `along` the line, `across` lines in from the top or left edge.
    fn at(&self, along: usize, across: usize) -> Cell {
        match self.axis {
            Axis::Row => (across, along),
            Axis::Column => (along, across),
        }
    }

    /// First position still open: a column starts below the row solved
    /// just before it.
    fn first(&self) -> usize {
        match self.axis {
            Axis::Row => self.index,
            Axis::Column => self.index + 1,
        }
    }

    /// Cells this line fixes on a board of the given width.
    pub fn cells(&self, width: usize) -> Vec<Cell> {
        (self.first()..width)
            .map(|along| self.at(along, self.index))
            .collect()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Axis::Row => write!(f, "row {}", self.index),
            Axis::Column => write!(f, "column {}", self.index),
        }
    }
}

/// A finished line and the length of the move log when it was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub line: Line,
    pub log_end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reduction {
    pub passes: Vec<Pass>,
}

/// Owns the working board for the duration of the reduction and appends every
/// committed move to the shared log.
pub struct Reducer<'a> {
    puzzle: &'a mut Puzzle,
    log: &'a mut Vec<MoveRecord>,
    stats: &'a mut SearchStats,
    tile_search: TileSearch,
}

impl<'a> Reducer<'a> {
    pub fn new(
        puzzle: &'a mut Puzzle,
        log: &'a mut Vec<MoveRecord>,
        stats: &'a mut SearchStats,
        tile_search: TileSearch,
    ) -> Self {
        Self {
            puzzle,
            log,
            stats,
            tile_search,
        }
    }

    /// Solves rows and columns alternately, outside in, leaving only the
    /// bottom-right 2x3 block active. Boards of width 2 are left untouched.
    pub fn reduce(&mut self) -> Result<Reduction> {
        let width = self.puzzle.size();
        let mut reduction = Reduction::default();
        if width < 3 {
            return Ok(reduction);
        }

        for i in 0..width - 2 {
            let mut lines = vec![Line::row(i)];
            if i + 3 < width {
                lines.push(Line::column(i));
            }
            for line in lines {
                self.solve_line(line)?;
                debug!("{line} done after {} moves", self.log.len());
                reduction.passes.push(Pass {
                    line,
                    log_end: self.log.len(),
                });
            }
        }

        Ok(reduction)
    }

    /// Places every tile of `line` and freezes its cells.
    ///
    /// The last two tiles cannot be pushed in one after the other without
    /// trapping one of them, so unless they already sit right the last tile
    /// is parked on a scratch cell, the second-to-last goes into the corner,
    /// the last one below (or beside) it, and both rotate into place.
    pub fn solve_line(&mut self, line: Line) -> Result<()> {
        let width = self.puzzle.size();
        let i = line.index;

        for along in line.first()..width - 2 {
            let cell = line.at(along, i);
            self.place_tile(self.puzzle.goal_value(cell), cell)?;
        }

        let penultimate = line.at(width - 2, i);
        let corner = line.at(width - 1, i);
        let second_last = self.puzzle.goal_value(penultimate);
        let last = self.puzzle.goal_value(corner);

        if self.puzzle.value_at(penultimate) != second_last || self.puzzle.value_at(corner) != last
        {
            let anchor = line.at(width - 1, i + 1);
            let scratch = if i + 3 < width {
                line.at(width - 2, i + 2)
            } else {
                line.at(width - 1, i + 2)
            };
            trace!("{line}: rotating {second_last} and {last} in via {scratch:?}");

            self.place_tile(last, scratch)?;
            self.puzzle.activate(scratch);
            self.place_tile(second_last, corner)?;
            self.place_tile(last, anchor)?;

            self.puzzle.activate(corner);
            self.place_tile(second_last, penultimate)?;
            self.puzzle.activate(anchor);
            self.place_tile(last, corner)?;
        }

        self.puzzle.deactivate(corner);
        self.puzzle.deactivate(penultimate);
        Ok(())
    }

    /// Walks `value` to `goal` one cell at a time, then freezes `goal`.
    ///
    /// Each round picks the active neighbour of the tile closest to `goal`,
    /// routes the blank there without disturbing the tile, and swaps.
    pub fn place_tile(&mut self, value: u32, goal: Cell) -> Result<()> {
        trace!("placing {value} at {goal:?}");
        while self.puzzle.value_at(goal) != value {
            let tile = self
                .puzzle
                .locate(value)
                .ok_or(SolveError::MissingTile(value))?;
            let (outward, neighbour) = self
                .puzzle
                .steps(tile)
                .min_by_key(|&(_, cell)| distance(cell, goal))
                .ok_or(SolveError::PathfindingExhausted {
                    from: tile,
                    to: goal,
                    protected: value,
                })?;

            let blank = self.puzzle.blank();
            let path = find_blank_path(
                self.puzzle,
                blank,
                neighbour,
                value,
                self.tile_search,
                self.stats,
            )?;
            for (step, _) in path {
                self.commit(step)?;
            }

            // the blank steps back onto the tile, sliding it one cell closer
            self.commit(outward.opposite())?;
        }

        self.puzzle.deactivate(goal);
        Ok(())
    }

    fn commit(&mut self, step: Move) -> Result<()> {
        record_move(self.puzzle, self.log, step)
    }
}
