//! Move application for the classic 3x3 variant.

use crate::rules;
use crate::{Board, GameStatus, Move, MoveError, Position, Square};
use tracing::instrument;

/// Applies a move to a standard board, returning the new board and its outcome.
///
/// The input board is never modified; a rejected move leaves the caller's
/// state exactly as it was.
///
/// # Errors
///
/// - [`MoveError::GameOver`] if the board is already decided.
/// - [`MoveError::OutOfBounds`] if the coordinates leave the 3x3 grid.
/// - [`MoveError::SquareOccupied`] if the target cell is taken.
#[instrument(skip(board), fields(player = %mv.player, row = mv.row, col = mv.col))]
pub fn apply_standard_move(board: &Board, mv: Move) -> Result<(Board, GameStatus), MoveError> {
    if rules::evaluate(board.squares()).is_over() {
        return Err(MoveError::GameOver);
    }

    let pos = Position::from_row_col(mv.row, mv.col).ok_or(MoveError::OutOfBounds {
        row: mv.row,
        col: mv.col,
    })?;

    if !board.is_empty(pos) {
        return Err(MoveError::SquareOccupied {
            row: mv.row,
            col: mv.col,
        });
    }

    let mut next = board.clone();
    next.set(pos, Square::Occupied(mv.player));
    let status = rules::evaluate(next.squares());
    Ok((next, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn play(moves: &[(usize, usize)]) -> (Board, GameStatus) {
        let mut board = Board::new();
        let mut status = GameStatus::InProgress;
        let mut player = Player::X;
        for &(row, col) in moves {
            (board, status) = apply_standard_move(&board, Move::new(player, row, col)).unwrap();
            player = player.opponent();
        }
        (board, status)
    }

    #[test]
    fn test_top_row_win() {
        let (_, status) = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(status, GameStatus::Won(Player::X));
    }

    #[test]
    fn test_full_board_draw() {
        let (board, status) = play(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (2, 0),
            (1, 2),
            (2, 2),
            (2, 1),
        ]);
        assert_eq!(status, GameStatus::Draw);
        assert!(board.empty_positions().next().is_none());
    }

    #[test]
    fn test_occupied_square_rejected_without_change() {
        let (board, _) = play(&[(1, 1)]);
        let err = apply_standard_move(&board, Move::new(Player::O, 1, 1)).unwrap_err();
        assert_eq!(err, MoveError::SquareOccupied { row: 1, col: 1 });
        assert_eq!(board.get(Position::Center), Square::Occupied(Player::X));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let err = apply_standard_move(&Board::new(), Move::new(Player::X, 3, 0)).unwrap_err();
        assert_eq!(err, MoveError::OutOfBounds { row: 3, col: 0 });
    }

    #[test]
    fn test_decided_board_rejects_moves() {
        let (board, _) = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let err = apply_standard_move(&board, Move::new(Player::O, 2, 2)).unwrap_err();
        assert_eq!(err, MoveError::GameOver);
    }
}
