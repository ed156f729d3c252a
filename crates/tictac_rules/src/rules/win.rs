//! Win detection over any 3x3 grid of squares.

use crate::{Player, Square};

/// The eight lines of a 3x3 grid: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if there is a winner on the grid.
///
/// Returns `Some(player)` if the player holds a full row, column or
/// diagonal, `None` otherwise. Works on a standard board and on the
/// macro-board projection of an ultimate game alike.
pub fn check_winner(grid: &[Square; 9]) -> Option<Player> {
    for [a, b, c] in LINES {
        let sq = grid[a];
        if sq != Square::Empty && sq == grid[b] && sq == grid[c] {
            return sq.player();
        }
    }

    None
}

/// Returns the indices that would complete a line for `player` right now.
pub fn winning_cells(grid: &[Square; 9], player: Player) -> Vec<usize> {
    let mut cells = Vec::new();
    for idx in 0..9 {
        if grid[idx] != Square::Empty {
            continue;
        }
        let mut next = *grid;
        next[idx] = Square::Occupied(player);
        if check_winner(&next) == Some(player) {
            cells.push(idx);
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &str) -> [Square; 9] {
        let mut grid = [Square::Empty; 9];
        for (idx, ch) in cells.chars().enumerate() {
            grid[idx] = match ch {
                'X' => Square::Occupied(Player::X),
                'O' => Square::Occupied(Player::O),
                _ => Square::Empty,
            };
        }
        grid
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&[Square::Empty; 9]), None);
    }

    #[test]
    fn test_winner_top_row() {
        assert_eq!(check_winner(&grid("XXX......")), Some(Player::X));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        assert_eq!(check_winner(&grid("..O.O.O..")), Some(Player::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        assert_eq!(check_winner(&grid("XX.OO....")), None);
    }

    #[test]
    fn test_winning_cells_finds_every_threat() {
        assert_eq!(winning_cells(&grid("X...X...."), Player::X), vec![8]);
        assert_eq!(winning_cells(&grid("XX.X....."), Player::X), vec![2, 6]);
        assert!(winning_cells(&grid("XX.X....."), Player::O).is_empty());
    }

    /// Independent line detector, written against rows and columns.
    fn has_line(grid: &[Square; 9], player: Player) -> bool {
        let at = |r: usize, c: usize| grid[r * 3 + c] == Square::Occupied(player);
        (0..3).any(|r| (0..3).all(|c| at(r, c)))
            || (0..3).any(|c| (0..3).all(|r| at(r, c)))
            || (0..3).all(|i| at(i, i))
            || (0..3).all(|i| at(i, 2 - i))
    }

    #[test]
    fn test_check_winner_exhaustive_over_all_grids() {
        for code in 0..3usize.pow(9) {
            let mut grid = [Square::Empty; 9];
            let mut rest = code;
            for cell in grid.iter_mut() {
                *cell = match rest % 3 {
                    0 => Square::Empty,
                    1 => Square::Occupied(Player::X),
                    _ => Square::Occupied(Player::O),
                };
                rest /= 3;
            }

            let x_line = has_line(&grid, Player::X);
            let o_line = has_line(&grid, Player::O);
            match check_winner(&grid) {
                Some(Player::X) => assert!(x_line, "grid {code} reported X without a line"),
                Some(Player::O) => assert!(o_line, "grid {code} reported O without a line"),
                None => assert!(!x_line && !o_line, "grid {code} missed a line"),
            }
        }
    }
}
