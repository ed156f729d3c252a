//! Draw detection logic.

use crate::Square;

/// Checks if the grid is full (all squares occupied).
///
/// A full grid with no winner indicates a draw.
pub fn is_full(grid: &[Square; 9]) -> bool {
    grid.iter().all(|s| *s != Square::Empty)
}
