//! Ultimate tic-tac-toe: a 3x3 grid of 3x3 micro-boards.
//!
//! Each move is played in one of the active micro-boards. The cell's
//! position inside its micro-board names the micro-board the opponent must
//! play in next. If that micro-board is already decided the opponent gets a
//! free move in any open micro-board.

use crate::rules;
use crate::{Board, GameStatus, Move, MoveError, Player, Position, Square};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Outcome of a single micro-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicroStatus {
    /// Still playable.
    Open,
    /// Won by a player.
    Won(Player),
    /// Full without a line.
    Drawn,
}

impl MicroStatus {
    /// Projects the status onto a macro-board square.
    pub fn as_square(self) -> Square {
        match self {
            MicroStatus::Won(player) => Square::Occupied(player),
            MicroStatus::Open | MicroStatus::Drawn => Square::Empty,
        }
    }
}

/// One of the nine micro-boards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MicroBoard {
    board: Board,
    status: MicroStatus,
}

impl MicroBoard {
    fn new() -> Self {
        Self {
            board: Board::new(),
            status: MicroStatus::Open,
        }
    }

    /// Cells of this micro-board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Decided state of this micro-board.
    pub fn status(&self) -> MicroStatus {
        self.status
    }

    /// Returns true while moves may still be played here.
    pub fn is_open(&self) -> bool {
        self.status == MicroStatus::Open
    }
}

/// Full ultimate board: nine micro-boards plus the active set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UltimateBoard {
    boards: [MicroBoard; 9],
    active: BTreeSet<usize>,
}

impl UltimateBoard {
    /// Creates an empty board; the first move may go anywhere.
    pub fn new() -> Self {
        Self {
            boards: std::array::from_fn(|_| MicroBoard::new()),
            active: (0..9).collect(),
        }
    }

    /// The nine micro-boards in row-major order.
    pub fn micro_boards(&self) -> &[MicroBoard; 9] {
        &self.boards
    }

    /// Micro-board indices the player to move may play in.
    pub fn active_micro_boards(&self) -> &BTreeSet<usize> {
        &self.active
    }

    /// Macro-board projection: won micro-boards as occupied squares.
    pub fn macro_squares(&self) -> [Square; 9] {
        self.boards.each_ref().map(|micro| micro.status.as_square())
    }

    /// Overall outcome of the match.
    ///
    /// The macro-board is won on a line of won micro-boards and drawn once
    /// every micro-board is decided without such a line.
    pub fn status(&self) -> GameStatus {
        if let Some(winner) = rules::check_winner(&self.macro_squares()) {
            GameStatus::Won(winner)
        } else if self.boards.iter().all(|micro| !micro.is_open()) {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        }
    }

    /// Square at absolute coordinates (0-8, 0-8).
    pub fn cell(&self, row: usize, col: usize) -> Option<Square> {
        if row >= 9 || col >= 9 {
            return None;
        }
        let mv = Move::new(Player::X, row, col);
        let local = Position::from_index(mv.local_cell())?;
        Some(self.boards[mv.micro_board()].board.get(local))
    }

    /// All squares as a 9x9 row-major matrix of optional symbols.
    pub fn rows(&self) -> [[Option<Player>; 9]; 9] {
        let mut rows = [[None; 9]; 9];
        for (row, cells) in rows.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.cell(row, col).and_then(Square::player);
            }
        }
        rows
    }

    /// Every currently legal `(row, col)`, ordered by micro-board then cell.
    pub fn legal_cells(&self) -> Vec<(usize, usize)> {
        if self.status().is_over() {
            return Vec::new();
        }
        self.active
            .iter()
            .flat_map(|&micro| {
                self.boards[micro].board.empty_positions().map(move |pos| {
                    (
                        (micro / 3) * 3 + pos.row(),
                        (micro % 3) * 3 + pos.col(),
                    )
                })
            })
            .collect()
    }
}

impl Default for UltimateBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a move to an ultimate board, returning the new board and outcome.
///
/// After the mark is placed the micro-board and macro-board are re-evaluated
/// and the active set is recomputed from the cell's local position.
///
/// # Errors
///
/// - [`MoveError::GameOver`] if the macro-board is already decided.
/// - [`MoveError::OutOfBounds`] if the coordinates leave the 9x9 grid.
/// - [`MoveError::InactiveMicroBoard`] if the target micro-board is not active.
/// - [`MoveError::SquareOccupied`] if the target cell is taken.
#[instrument(skip(board), fields(player = %mv.player, row = mv.row, col = mv.col))]
pub fn apply_ultimate_move(
    board: &UltimateBoard,
    mv: Move,
) -> Result<(UltimateBoard, GameStatus), MoveError> {
    if board.status().is_over() {
        return Err(MoveError::GameOver);
    }
    if mv.row >= 9 || mv.col >= 9 {
        return Err(MoveError::OutOfBounds {
            row: mv.row,
            col: mv.col,
        });
    }

    let micro = mv.micro_board();
    if !board.active.contains(&micro) {
        return Err(MoveError::InactiveMicroBoard(micro));
    }

    let local = Position::from_index(mv.local_cell()).ok_or(MoveError::OutOfBounds {
        row: mv.row,
        col: mv.col,
    })?;
    if !board.boards[micro].board.is_empty(local) {
        return Err(MoveError::SquareOccupied {
            row: mv.row,
            col: mv.col,
        });
    }

    let mut next = board.clone();
    let target = &mut next.boards[micro];
    target.board.set(local, Square::Occupied(mv.player));
    if target.status == MicroStatus::Open {
        target.status = match rules::evaluate(target.board.squares()) {
            GameStatus::Won(winner) => MicroStatus::Won(winner),
            GameStatus::Draw => MicroStatus::Drawn,
            GameStatus::InProgress => MicroStatus::Open,
        };
    }

    let status = next.status();
    next.active = next_active_micro_boards(&next, local.to_index());
    debug!(micro, forced = local.to_index(), active = ?next.active, "Recomputed active micro-boards");

    Ok((next, status))
}

/// The forced-move rule with its free-move escape.
fn next_active_micro_boards(board: &UltimateBoard, target: usize) -> BTreeSet<usize> {
    if board.boards[target].is_open() {
        BTreeSet::from([target])
    } else {
        (0..9).filter(|&idx| board.boards[idx].is_open()).collect()
    }
}
