use thiserror::Error;

use crate::puzzle::{Cell, Move};

pub type Result<T> = std::result::Result<T, SolveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("the puzzle is unsolvable")]
    Unsolvable,

    #[error("no blank path from {from:?} to {to:?} around tile {protected}")]
    PathfindingExhausted {
        from: Cell,
        to: Cell,
        protected: u32,
    },

    #[error("residual search exhausted after {expansions} expansions")]
    ResidualSearchExhausted { expansions: usize },

    #[error("residual search exceeded its budget of {budget} expansions")]
    BudgetExceeded { budget: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("tile {0} is not on the board")]
    MissingTile(u32),

    #[error("move {step} from {from:?} leaves the board")]
    IllegalMove { step: Move, from: Cell },
}

impl SolveError {
    /// Internal errors indicate a broken precondition inside the engine rather
    /// than a property of the caller's board.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            Self::Unsolvable | Self::InvalidBoard(_) | Self::BudgetExceeded { .. }
        )
    }
}
