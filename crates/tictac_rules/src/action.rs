//! First-class move types.
//!
//! Moves are domain events, not side effects. They carry absolute
//! coordinates: 0-2 on a standard board, 0-8 on an ultimate board.

use super::Player;
use serde::{Deserialize, Serialize};

/// A player placing their mark at an absolute `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// Absolute row.
    pub row: usize,
    /// Absolute column.
    pub col: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, row: usize, col: usize) -> Self {
        Self { player, row, col }
    }

    /// Micro-board index (0-8) this move targets on an ultimate board.
    pub fn micro_board(&self) -> usize {
        (self.row / 3) * 3 + self.col / 3
    }

    /// Cell index (0-8) of this move within its own micro-board.
    pub fn local_cell(&self) -> usize {
        (self.row % 3) * 3 + self.col % 3
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.player, self.row, self.col)
    }
}

/// Reason a move was rejected by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum MoveError {
    /// Coordinates fall outside the board.
    #[display("Coordinates ({}, {}) are outside the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Cell ({}, {}) is already occupied", row, col)]
    SquareOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target micro-board is not one of the active boards.
    #[display("Micro-board {} is not active", _0)]
    InactiveMicroBoard(usize),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}
