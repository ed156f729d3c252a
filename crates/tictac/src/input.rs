//! Parsing typed moves.

use tictac_rules::{GameMode, Position};
use tracing::{debug, instrument};

/// Parses `"row,col"` or `"row col"`, plus square labels ("center") and
/// numbers 0-8 in standard mode.
///
/// Range checks are left to the engine so the player sees its error message.
#[instrument]
pub fn parse_coords(input: &str, mode: GameMode) -> Option<(usize, usize)> {
    let input = input.trim();
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    if let [row, col] = parts.as_slice() {
        let coords: (usize, usize) = (row.parse().ok()?, col.parse().ok()?);
        debug!(?coords, "Parsed row/col");
        return Some(coords);
    }

    match mode {
        GameMode::Standard => {
            Position::from_label_or_number(input).map(|pos| (pos.row(), pos.col()))
        }
        GameMode::Ultimate => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_col_forms() {
        assert_eq!(parse_coords("4,7", GameMode::Ultimate), Some((4, 7)));
        assert_eq!(parse_coords(" 2 0 ", GameMode::Standard), Some((2, 0)));
        assert_eq!(parse_coords("1, 1", GameMode::Standard), Some((1, 1)));
    }

    #[test]
    fn test_standard_labels_and_numbers() {
        assert_eq!(parse_coords("4", GameMode::Standard), Some((1, 1)));
        assert_eq!(parse_coords("8", GameMode::Standard), Some((2, 2)));
        assert_eq!(parse_coords("Top-right", GameMode::Standard), Some((0, 2)));
        assert_eq!(parse_coords("9", GameMode::Standard), None);
    }

    #[test]
    fn test_ultimate_needs_row_and_col() {
        assert_eq!(parse_coords("5", GameMode::Ultimate), None);
        assert_eq!(parse_coords("a,b", GameMode::Ultimate), None);
        assert_eq!(parse_coords("", GameMode::Standard), None);
    }
}
