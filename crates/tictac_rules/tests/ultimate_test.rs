//! Ultimate-variant replays and randomized rule checks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use tictac_rules::{
    ComputerPlayer, GameBoard, GameStatus, MicroStatus, Move, MoveError, Player, UltimateBoard,
    apply_ultimate_move,
};

/// Replays absolute coordinates alternately from X, asserting every move is legal.
fn replay(moves: &[(usize, usize)]) -> (UltimateBoard, GameStatus) {
    let mut board = UltimateBoard::new();
    let mut status = GameStatus::InProgress;
    let mut player = Player::X;
    for (turn, &(row, col)) in moves.iter().enumerate() {
        assert!(!status.is_over(), "game ended before move {turn}");
        (board, status) = apply_ultimate_move(&board, Move::new(player, row, col))
            .unwrap_or_else(|e| panic!("move {turn} ({row}, {col}) rejected: {e}"));
        player = player.opponent();
    }
    (board, status)
}

/// Expected active set computed straight from the rule text.
fn expected_active(board: &UltimateBoard, row: usize, col: usize) -> BTreeSet<usize> {
    let target = (row % 3) * 3 + col % 3;
    if board.micro_boards()[target].status() == MicroStatus::Open {
        BTreeSet::from([target])
    } else {
        (0..9)
            .filter(|&idx| board.micro_boards()[idx].status() == MicroStatus::Open)
            .collect()
    }
}

#[test]
fn test_recorded_game_won_by_x() {
    let moves = [
        (0, 0), (1, 1), (3, 5), (1, 8), (4, 8), (4, 7), (4, 4), (4, 5), (3, 6), (2, 2),
        (6, 8), (1, 7), (5, 3), (6, 0), (1, 0), (4, 1), (2, 0), (7, 0), (3, 0), (1, 3),
        (4, 0), (3, 1), (1, 5), (4, 6), (5, 0), (8, 0), (6, 6), (1, 6), (6, 7),
    ];
    let (_, status) = replay(&moves);
    assert_eq!(status, GameStatus::Won(Player::X));
}

#[test]
fn test_recorded_game_ends_in_macro_draw() {
    let moves = [
        (1, 1), (4, 4), (3, 3), (0, 0), (0, 1), (1, 4), (3, 4), (0, 3), (2, 1), (7, 4),
        (3, 5), (1, 7), (2, 5), (7, 7), (0, 4), (0, 5), (0, 6), (2, 3), (7, 1), (0, 7),
        (2, 7), (6, 3), (0, 8), (1, 6), (4, 1), (1, 8), (4, 7), (3, 0), (3, 1), (5, 1),
        (8, 5), (6, 6), (3, 2), (5, 0), (6, 0), (4, 0), (3, 6), (5, 8), (8, 8), (6, 7),
        (3, 7), (3, 8), (5, 7), (6, 4), (8, 2), (6, 8), (6, 5), (8, 4),
    ];
    let (board, status) = replay(&moves);
    assert_eq!(status, GameStatus::Draw);
    assert!(board.micro_boards().iter().all(|micro| !micro.is_open()));
    assert!(board.legal_cells().is_empty());
}

#[test]
fn test_winning_center_board_sends_opponent_right() {
    let (board, status) = replay(&[
        (4, 4), (3, 3), (1, 1), (5, 5), (7, 7), (3, 5), (1, 7), (4, 5),
    ]);
    assert_eq!(status, GameStatus::InProgress);
    assert_eq!(board.micro_boards()[4].status(), MicroStatus::Won(Player::O));
    assert_eq!(board.active_micro_boards(), &BTreeSet::from([5]));
}

#[test]
fn test_forced_move_rule_holds_in_random_games() {
    let mut rng = StdRng::seed_from_u64(0x7177);

    for _ in 0..200 {
        let mut board = UltimateBoard::new();
        let mut player = Player::X;
        loop {
            let legal = board.legal_cells();
            if legal.is_empty() {
                break;
            }

            // Probe an illegal micro-board before playing, when one exists.
            if let Some(outside) = (0..81)
                .map(|idx| (idx / 9, idx % 9))
                .find(|&(r, c)| {
                    !board
                        .active_micro_boards()
                        .contains(&Move::new(player, r, c).micro_board())
                })
            {
                let before = board.clone();
                let err = apply_ultimate_move(&board, Move::new(player, outside.0, outside.1))
                    .unwrap_err();
                assert!(matches!(err, MoveError::InactiveMicroBoard(_)));
                assert_eq!(board, before);
            }

            let (row, col) = legal[rng.random_range(0..legal.len())];
            let (next, status) = apply_ultimate_move(&board, Move::new(player, row, col)).unwrap();
            assert_eq!(next.active_micro_boards(), &expected_active(&next, row, col));
            board = next;
            if status.is_over() {
                break;
            }
            player = player.opponent();
        }
    }
}

#[test]
fn test_computer_never_gifts_match_when_safe_move_exists() {
    let mut rng = StdRng::seed_from_u64(42);
    let ai = ComputerPlayer::new();

    for _ in 0..20 {
        let mut board = UltimateBoard::new();
        let mut player = Player::X;
        while !board.status().is_over() {
            let (row, col) = if player == Player::O {
                let choice = ai
                    .choose_move(&GameBoard::Ultimate(board.clone()), Player::O)
                    .expect("open position must yield a move");
                assert!(board.legal_cells().contains(&choice));
                choice
            } else {
                let legal = board.legal_cells();
                legal[rng.random_range(0..legal.len())]
            };

            let (next, _) = apply_ultimate_move(&board, Move::new(player, row, col)).unwrap();
            if player == Player::O && gifts_match(&next, Player::X) {
                let safe_exists = board.legal_cells().into_iter().any(|(r, c)| {
                    let (alt, status) =
                        apply_ultimate_move(&board, Move::new(Player::O, r, c)).unwrap();
                    status.is_over() || !gifts_match(&alt, Player::X)
                });
                assert!(!safe_exists, "computer handed X the match at ({row}, {col})");
            }
            board = next;
            player = player.opponent();
        }
    }
}

fn gifts_match(board: &UltimateBoard, opponent: Player) -> bool {
    !board.status().is_over()
        && board.legal_cells().into_iter().any(|(r, c)| {
            matches!(
                apply_ultimate_move(board, Move::new(opponent, r, c)),
                Ok((_, GameStatus::Won(p))) if p == opponent
            )
        })
}
