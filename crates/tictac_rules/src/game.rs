//! One `apply_move` capability over both variants.

use crate::standard::apply_standard_move;
use crate::ultimate::{UltimateBoard, apply_ultimate_move};
use crate::{Board, GameMode, GameStatus, Move, MoveError, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Board state for either variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GameBoard {
    /// Classic 3x3 board.
    Standard(Board),
    /// 3x3 grid of micro-boards.
    Ultimate(UltimateBoard),
}

impl GameBoard {
    /// Creates an empty board for the given mode.
    pub fn new(mode: GameMode) -> Self {
        match mode {
            GameMode::Standard => GameBoard::Standard(Board::new()),
            GameMode::Ultimate => GameBoard::Ultimate(UltimateBoard::new()),
        }
    }

    /// The mode this board is played under.
    pub fn mode(&self) -> GameMode {
        match self {
            GameBoard::Standard(_) => GameMode::Standard,
            GameBoard::Ultimate(_) => GameMode::Ultimate,
        }
    }

    /// Validates and applies a move, returning the new board and outcome.
    ///
    /// # Errors
    ///
    /// Returns the variant's [`MoveError`]; `self` is left untouched.
    #[instrument(skip(self), fields(mode = %self.mode()))]
    pub fn apply_move(&self, mv: Move) -> Result<(GameBoard, GameStatus), MoveError> {
        match self {
            GameBoard::Standard(board) => {
                apply_standard_move(board, mv).map(|(b, s)| (GameBoard::Standard(b), s))
            }
            GameBoard::Ultimate(board) => {
                apply_ultimate_move(board, mv).map(|(b, s)| (GameBoard::Ultimate(b), s))
            }
        }
    }

    /// Overall outcome of the position.
    pub fn status(&self) -> GameStatus {
        match self {
            GameBoard::Standard(board) => crate::rules::evaluate(board.squares()),
            GameBoard::Ultimate(board) => board.status(),
        }
    }

    /// Every currently legal `(row, col)` in absolute coordinates.
    pub fn legal_cells(&self) -> Vec<(usize, usize)> {
        match self {
            GameBoard::Standard(board) => {
                if self.status().is_over() {
                    Vec::new()
                } else {
                    board
                        .empty_positions()
                        .map(|pos: Position| (pos.row(), pos.col()))
                        .collect()
                }
            }
            GameBoard::Ultimate(board) => board.legal_cells(),
        }
    }
}
