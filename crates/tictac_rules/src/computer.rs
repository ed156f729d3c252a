//! Computer opponent.
//!
//! Standard mode searches the whole game tree with negamax, so the computer
//! never loses and takes the quickest win available. Ultimate mode scores
//! each legal cell with a local heuristic and refuses any move that hands
//! the opponent an immediate match win while a safe alternative exists.

use crate::rules::{self, winning_cells};
use crate::ultimate::{MicroStatus, UltimateBoard, apply_ultimate_move};
use crate::{Board, GameBoard, GameStatus, Move, Player, Position, Square};
use tracing::{debug, instrument};

const WIN_SCORE: i32 = 10;

const MICRO_WIN: i32 = 100;
const MICRO_BLOCK: i32 = 50;
const CENTER: i32 = 3;
const CORNER: i32 = 2;
const FREE_MOVE_GIFT: i32 = 20;
const THREAT_GIFT: i32 = 40;
const MATCH_GIFT: i32 = 10_000;

/// Deterministic move selector for both variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputerPlayer;

impl ComputerPlayer {
    /// Creates a computer player.
    pub fn new() -> Self {
        Self
    }

    /// Chooses one legal `(row, col)` for `player`.
    ///
    /// Returns `None` only when no legal move exists, which callers treat as
    /// an invariant violation: a finished game is never handed to the computer.
    #[instrument(skip(self, board), fields(mode = %board.mode(), player = %player))]
    pub fn choose_move(&self, board: &GameBoard, player: Player) -> Option<(usize, usize)> {
        let choice = match board {
            GameBoard::Standard(board) => self.choose_standard(board, player),
            GameBoard::Ultimate(board) => self.choose_ultimate(board, player),
        };
        debug!(?choice, "Computer chose move");
        choice
    }

    /// Full negamax search; ties go to the first cell in row-major order.
    fn choose_standard(&self, board: &Board, player: Player) -> Option<(usize, usize)> {
        if rules::evaluate(board.squares()).is_over() {
            return None;
        }

        let mut best: Option<(Position, i32)> = None;
        for pos in board.empty_positions() {
            let score = score_placement(board, pos, player, 0);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }
        best.map(|(pos, _)| (pos.row(), pos.col()))
    }

    fn choose_ultimate(&self, board: &UltimateBoard, player: Player) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), i32)> = None;
        for (row, col) in board.legal_cells() {
            let mv = Move::new(player, row, col);
            let Ok((next, status)) = apply_ultimate_move(board, mv) else {
                continue;
            };
            if status == GameStatus::Won(player) {
                return Some((row, col));
            }

            let score = score_ultimate(board, &next, mv);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some(((row, col), score));
            }
        }
        best.map(|(cell, _)| cell)
    }
}

/// Score of `player` marking `pos`, from `player`'s point of view.
///
/// Faster wins score higher and slower losses score less badly.
fn score_placement(board: &Board, pos: Position, player: Player, depth: i32) -> i32 {
    let mut next = board.clone();
    next.set(pos, Square::Occupied(player));
    match rules::evaluate(next.squares()) {
        GameStatus::Won(_) => WIN_SCORE - depth,
        GameStatus::Draw => 0,
        GameStatus::InProgress => -negamax(&next, player.opponent(), depth + 1),
    }
}

fn negamax(board: &Board, to_move: Player, depth: i32) -> i32 {
    board
        .empty_positions()
        .map(|pos| score_placement(board, pos, to_move, depth))
        .max()
        .unwrap_or(0)
}

fn score_ultimate(before: &UltimateBoard, after: &UltimateBoard, mv: Move) -> i32 {
    let opponent = mv.player.opponent();
    let micro = mv.micro_board();
    let local = mv.local_cell();
    let mut score = 0;

    if after.micro_boards()[micro].status() == MicroStatus::Won(mv.player) {
        score += MICRO_WIN;
    } else if winning_cells(before.micro_boards()[micro].board().squares(), opponent)
        .contains(&local)
    {
        score += MICRO_BLOCK;
    }

    match Position::from_index(local) {
        Some(Position::Center) => score += CENTER,
        Some(pos) if pos.is_corner() => score += CORNER,
        _ => {}
    }

    if opponent_wins_next(after, opponent) {
        return score - MATCH_GIFT;
    }

    let active = after.active_micro_boards();
    if active.len() > 1 {
        score -= FREE_MOVE_GIFT;
    } else if active.iter().any(|&target| {
        !winning_cells(after.micro_boards()[target].board().squares(), opponent).is_empty()
    }) {
        score -= THREAT_GIFT;
    }

    score
}

/// Whether `opponent`, moving next, has a reply that wins the match.
fn opponent_wins_next(board: &UltimateBoard, opponent: Player) -> bool {
    if board.status().is_over() {
        return false;
    }
    board.legal_cells().into_iter().any(|(row, col)| {
        matches!(
            apply_ultimate_move(board, Move::new(opponent, row, col)),
            Ok((_, GameStatus::Won(winner))) if winner == opponent
        )
    })
}
