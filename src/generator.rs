//! Random boards for demos, benchmarks and tests.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::puzzle::Puzzle;

/// Shuffles the tiles of a `width`-wide board, with no regard for parity.
pub fn random_tiles<R: Rng + ?Sized>(width: usize, rng: &mut R) -> Vec<Vec<u32>> {
    let mut flattened: Vec<u32> = (0..(width * width) as u32).collect();
    flattened.shuffle(rng);
    flattened.chunks(width).map(<[u32]>::to_vec).collect()
}

/// A uniformly shuffled board that may or may not be solvable.
pub fn random_board<R: Rng + ?Sized>(width: usize, rng: &mut R) -> Puzzle {
    let mut puzzle = Puzzle::new(width);
    puzzle.shuffle(rng);
    puzzle
}

/// A shuffled board that passes the parity check.
pub fn solvable_board<R: Rng + ?Sized>(width: usize, rng: &mut R) -> Puzzle {
    let mut puzzle = Puzzle::new(width);
    loop {
        puzzle.shuffle(rng);
        if puzzle.is_solvable() {
            return puzzle;
        }
    }
}

impl Puzzle {
    /// Replaces the tiles with a fresh permutation; the mask is reset.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let rows = random_tiles(self.size(), rng);
        // a shuffled permutation of 0..width² always forms a valid board
        if let Ok(shuffled) = Puzzle::from_rows(&rows) {
            *self = shuffled;
        }
    }
}
