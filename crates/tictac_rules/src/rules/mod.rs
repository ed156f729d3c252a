//! Game rules for tic-tac-toe.
//!
//! Pure functions over a 3x3 grid of squares. The same detectors serve a
//! standard board, each ultimate micro-board, and the ultimate macro-board.

mod draw;
mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, winning_cells};

use crate::{GameStatus, Square};

/// Evaluates a grid: won, drawn (full without a line), or still open.
pub fn evaluate(grid: &[Square; 9]) -> GameStatus {
    if let Some(winner) = check_winner(grid) {
        GameStatus::Won(winner)
    } else if is_full(grid) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}
