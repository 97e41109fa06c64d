use std::fmt;

use crate::error::{Result, SolveError};
use crate::render::Snapshot;

/// A `(row, column)` position on the board.
pub type Cell = (usize, usize);

/// Flattened row-major tile values. Two boards with the same tiles share a key
/// whatever their active masks look like.
pub type BoardKey = Box<[u32]>;

/// A step of the blank. Names follow the tile that slides into the blank: on
/// `Up` the blank swaps with the cell below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Scan order used wherever ties between directions must be broken.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            Move::Up => '\u{2B9D}',
            Move::Down => '\u{2B9F}',
            Move::Left => '\u{2B9C}',
            Move::Right => '\u{2B9E}',
        }
    }

    /// The step that takes the blank from `from` to the adjacent cell `to`.
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|step| offset_cell(from, *step) == Some(to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Grid (Manhattan) distance between two cells.
pub fn distance(a: Cell, b: Cell) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

fn offset_cell((row, col): Cell, step: Move) -> Option<Cell> {
    let (dx, dy) = step.as_offset();
    Some((row.checked_add_signed(dx)?, col.checked_add_signed(dy)?))
}

/// An NxN board with one blank (`0`) and a mask of cells that may still move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    size: usize,
    tiles: Vec<u32>,
    active: Vec<bool>,
    x_pos: usize,
    y_pos: usize,
}

impl Puzzle {
    /// The solved board of the given width, every cell active.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        let tiles = (0..cells).map(|i| ((i + 1) % cells) as u32).collect();

        Self {
            size,
            tiles,
            active: vec![true; cells],
            x_pos: size - 1,
            y_pos: size - 1,
        }
    }

    /// Builds a board from rows, rejecting anything that is not a square
    /// permutation of `0..width²`.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self> {
        let size = rows.len();
        if size < 2 {
            return Err(SolveError::InvalidBoard(format!(
                "width must be at least 2, got {size}"
            )));
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(SolveError::InvalidBoard(format!(
                "row {row} has {} values, expected {size}",
                bad.len()
            )));
        }

        let tiles: Vec<u32> = rows.iter().flatten().copied().collect();
        let mut seen = vec![false; tiles.len()];
        for &value in &tiles {
            match seen.get_mut(value as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(SolveError::InvalidBoard(format!("tile {value} appears twice")))
                }
                None => {
                    return Err(SolveError::InvalidBoard(format!(
                        "tile {value} is out of range for width {size}"
                    )))
                }
            }
        }

        let blank = tiles
            .iter()
            .position(|&v| v == 0)
            .ok_or_else(|| SolveError::InvalidBoard("no blank".to_string()))?;

        Ok(Self {
            size,
            tiles,
            active: vec![true; size * size],
            x_pos: blank / size,
            y_pos: blank % size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn blank(&self) -> Cell {
        (self.x_pos, self.y_pos)
    }

    fn index(&self, (row, col): Cell) -> usize {
        row * self.size + col
    }

    pub fn value_at(&self, cell: Cell) -> u32 {
        self.tiles[self.index(cell)]
    }

    pub fn locate(&self, value: u32) -> Option<Cell> {
        self.tiles
            .iter()
            .position(|&v| v == value)
            .map(|i| (i / self.size, i % self.size))
    }

    /// The value the solved board holds at `cell`.
    pub fn goal_value(&self, cell: Cell) -> u32 {
        let cells = self.size * self.size;
        ((self.index(cell) + 1) % cells) as u32
    }

    /// Where `value` sits on the solved board.
    pub fn goal_cell(&self, value: u32) -> Cell {
        let i = if value == 0 {
            self.size * self.size - 1
        } else {
            value as usize - 1
        };
        (i / self.size, i % self.size)
    }

    /// The in-bounds neighbour of `cell` in direction `step`, ignoring the mask.
    pub fn neighbour(&self, cell: Cell, step: Move) -> Option<Cell> {
        offset_cell(cell, step).filter(|&(r, c)| r < self.size && c < self.size)
    }

    /// Adjacent cells that are in bounds and active, tagged with the step
    /// that brings the blank there.
    pub fn steps(&self, cell: Cell) -> impl Iterator<Item = (Move, Cell)> + '_ {
        Move::ALL.into_iter().filter_map(move |step| {
            self.neighbour(cell, step)
                .filter(|&next| self.is_active(next))
                .map(|next| (step, next))
        })
    }

    pub fn is_active(&self, cell: Cell) -> bool {
        self.active[self.index(cell)]
    }

    pub fn deactivate(&mut self, cell: Cell) {
        let i = self.index(cell);
        self.active[i] = false;
    }

    pub fn activate(&mut self, cell: Cell) {
        let i = self.index(cell);
        self.active[i] = true;
    }

    pub fn active_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.tiles.len())
            .filter(|&i| self.active[i])
            .map(|i| (i / self.size, i % self.size))
    }

    /// Exchanges the contents of two cells in place.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        let (i, j) = (self.index(a), self.index(b));
        self.tiles.swap(i, j);
        if self.tiles[i] == 0 {
            (self.x_pos, self.y_pos) = a;
        } else if self.tiles[j] == 0 {
            (self.x_pos, self.y_pos) = b;
        }
    }

    /// A copy of this board with two cells exchanged.
    pub fn swapped(&self, a: Cell, b: Cell) -> Self {
        let mut next = self.clone();
        next.swap(a, b);
        next
    }

    /// Slides the blank one step, regardless of the mask. Returns the tile
    /// that took the blank's place, or `None` when the step leaves the board.
    pub fn apply_move(&mut self, movement: Move) -> Option<u32> {
        let blank = self.blank();
        let next = self.neighbour(blank, movement)?;
        self.swap(blank, next);
        Some(self.value_at(blank))
    }

    pub fn is_solved(&self) -> bool {
        let cells = self.tiles.len();
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, &v)| v as usize == (i + 1) % cells)
    }

    pub fn inversions(&self) -> usize {
        Self::count_inversions(&self.tiles)
    }

    pub fn is_solvable(&self) -> bool {
        Self::is_solvable_flat(&self.tiles, self.size, self.x_pos)
    }

    /// Parity test on a flattened board. `empty_row` counts from the top.
    pub fn is_solvable_flat(flattened: &[u32], size: usize, empty_row: usize) -> bool {
        let inversions = Self::count_inversions(flattened);

        if size % 2 == 1 {
            // Odd-sized puzzle: solvable if inversions count is even
            inversions % 2 == 0
        } else {
            // Even-sized puzzle: solvable if (inversions + empty row index) is odd
            (inversions + empty_row) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[u32]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    /// Hamming plus Manhattan distance, both taken over active cells only.
    pub fn heuristic(&self) -> usize {
        self.hamming_distance() + self.manhattan_distance()
    }

    pub fn hamming_distance(&self) -> usize {
        self.active_cells()
            .filter(|&cell| {
                let value = self.value_at(cell);
                value != 0 && value != self.goal_value(cell)
            })
            .count()
    }

    pub fn manhattan_distance(&self) -> usize {
        self.active_cells()
            .filter(|&cell| self.value_at(cell) != 0)
            .map(|cell| distance(cell, self.goal_cell(self.value_at(cell))))
            .sum()
    }

    pub fn key(&self) -> BoardKey {
        self.tiles.clone().into_boxed_slice()
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.tiles.chunks(self.size).map(<[u32]>::to_vec).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.size, self.key())
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u32]]) -> Puzzle {
        let rows: Vec<Vec<u32>> = rows.iter().map(|r| r.to_vec()).collect();
        Puzzle::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_new_is_canonical_goal() {
        let puzzle = Puzzle::new(3);
        assert_eq!(puzzle.rows(), vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]);
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.blank(), (2, 2));
        assert_eq!(puzzle.heuristic(), 0);
    }

    #[test]
    fn test_from_rows_rejects_malformed_boards() {
        let duplicate = vec![vec![1, 1], vec![2, 0]];
        assert!(matches!(
            Puzzle::from_rows(&duplicate),
            Err(SolveError::InvalidBoard(_))
        ));

        let ragged = vec![vec![1, 2, 3], vec![0, 4]];
        assert!(matches!(
            Puzzle::from_rows(&ragged),
            Err(SolveError::InvalidBoard(_))
        ));

        let out_of_range = vec![vec![1, 9], vec![2, 0]];
        assert!(matches!(
            Puzzle::from_rows(&out_of_range),
            Err(SolveError::InvalidBoard(_))
        ));

        assert!(Puzzle::from_rows(&[vec![0]]).is_err());
    }

    #[test]
    fn test_goal_positions() {
        let puzzle = Puzzle::new(4);
        assert_eq!(puzzle.goal_value((0, 0)), 1);
        assert_eq!(puzzle.goal_value((3, 3)), 0);
        assert_eq!(puzzle.goal_cell(7), (1, 2));
        assert_eq!(puzzle.goal_cell(0), (3, 3));
    }

    #[test]
    fn test_move_between_matches_offsets() {
        assert_eq!(Move::between((1, 1), (2, 1)), Some(Move::Up));
        assert_eq!(Move::between((1, 1), (0, 1)), Some(Move::Down));
        assert_eq!(Move::between((1, 1), (1, 2)), Some(Move::Left));
        assert_eq!(Move::between((1, 1), (1, 0)), Some(Move::Right));
        assert_eq!(Move::between((1, 1), (2, 2)), None);
        for step in Move::ALL {
            assert_eq!(step.opposite().opposite(), step);
        }
    }

    #[test]
    fn test_steps_respect_bounds_and_mask() {
        let mut puzzle = Puzzle::new(3);
        let all: Vec<_> = puzzle.steps((0, 0)).collect();
        assert_eq!(all, vec![(Move::Up, (1, 0)), (Move::Left, (0, 1))]);

        puzzle.deactivate((1, 0));
        let masked: Vec<_> = puzzle.steps((0, 0)).collect();
        assert_eq!(masked, vec![(Move::Left, (0, 1))]);

        puzzle.activate((1, 0));
        assert_eq!(puzzle.steps((0, 0)).count(), 2);
    }

    #[test]
    fn test_swapped_leaves_original_untouched() {
        let puzzle = Puzzle::new(3);
        let child = puzzle.swapped((2, 2), (2, 1));
        assert_eq!(puzzle.value_at((2, 1)), 8);
        assert_eq!(child.value_at((2, 2)), 8);
        assert_eq!(child.blank(), (2, 1));
        assert_eq!(puzzle.blank(), (2, 2));
    }

    #[test]
    fn test_apply_move_reports_displaced_tile() {
        let mut puzzle = Puzzle::new(3);
        assert_eq!(puzzle.apply_move(Move::Up), None);
        assert_eq!(puzzle.apply_move(Move::Down), Some(6));
        assert_eq!(puzzle.blank(), (1, 2));
        assert_eq!(puzzle.apply_move(Move::Up), Some(6));
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_key_ignores_active_mask() {
        let puzzle = Puzzle::new(3);
        let mut masked = puzzle.clone();
        masked.deactivate((0, 0));
        assert_eq!(puzzle.key(), masked.key());
        assert_ne!(puzzle, masked);
    }

    #[test]
    fn test_odd_width_parity() {
        let solvable = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        assert_eq!(solvable.inversions(), 0);
        assert!(solvable.is_solvable());

        let swapped = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(swapped.inversions(), 1);
        assert!(!swapped.is_solvable());
    }

    #[test]
    fn test_even_width_parity_uses_blank_row() {
        // blank on the bottom row: zero inversions, row 3 from the top
        let goal = Puzzle::new(4);
        assert_eq!(goal.inversions(), 0);
        assert!(goal.is_solvable());

        // 12 slides down past 13, 14 and 15; counting the blank row from the
        // bottom with the same odd rule would call this unsolvable
        let mut raised = Puzzle::new(4);
        raised.apply_move(Move::Down);
        assert_eq!(raised.blank(), (2, 3));
        assert_eq!(raised.inversions(), 3);
        assert!(raised.is_solvable());

        let transposed = board(&[
            &[2, 1, 3, 4],
            &[5, 6, 7, 8],
            &[9, 10, 11, 12],
            &[13, 14, 15, 0],
        ]);
        assert_eq!(transposed.inversions(), 1);
        assert!(!transposed.is_solvable());

        let small = board(&[&[1, 2], &[0, 3]]);
        assert!(small.is_solvable());
        let small_swapped = board(&[&[2, 1], &[0, 3]]);
        assert!(!small_swapped.is_solvable());
    }

    #[test]
    fn test_heuristic_counts_active_cells_only() {
        let mut puzzle = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        assert_eq!(puzzle.hamming_distance(), 2);
        assert_eq!(puzzle.manhattan_distance(), 2);
        assert_eq!(puzzle.heuristic(), 4);

        puzzle.deactivate((1, 2));
        assert_eq!(puzzle.hamming_distance(), 1);
        assert_eq!(puzzle.manhattan_distance(), 1);
    }
}
