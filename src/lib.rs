//! Solver for NxN sliding tile puzzles.
//!
//! Boards are reduced line by line with single-tile blank walks until only a
//! 2x3 block is left in the bottom-right corner, which is then finished by a
//! best-first search over whole configurations. The result is a legal move
//! log, not necessarily a shortest one.

pub mod error;
pub mod generator;
pub mod input;
pub mod node_search;
pub mod puzzle;
pub mod reduce;
pub mod render;
pub mod solver;
pub mod tile_search;

pub use error::{Result, SolveError};
pub use puzzle::{Cell, Move, Puzzle};
pub use render::{format_solution, Snapshot};
pub use solver::{solve, MoveRecord, SearchStats, Solution, Solver, SolverConfig};
pub use tile_search::TileSearch;
