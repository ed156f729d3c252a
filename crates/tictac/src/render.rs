//! Plain-text rendering of snapshots and the leaderboard.

use tictac_engine::{BoardView, ClockView, LeaderboardEntry, SessionSnapshot, SessionStatus};
use tictac_rules::{MicroStatus, Player};

fn mark(cell: Option<Player>) -> Option<String> {
    cell.map(|player| player.to_string())
}

/// Standard boards number empty squares 0-8 so they can be typed back.
/// Ultimate boards show `.` where a move is allowed and a blank elsewhere.
pub fn render_board(board: &BoardView) -> String {
    match board {
        BoardView::Standard { cells } => cells
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| mark(*cell).unwrap_or_else(|| (row * 3 + col).to_string()))
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n-+-+-\n"),
        BoardView::Ultimate {
            cells,
            active_micro_boards,
            ..
        } => {
            let mut out = String::from("    0 1 2   3 4 5   6 7 8\n");
            for (row, cells) in cells.iter().enumerate() {
                if row > 0 && row % 3 == 0 {
                    out.push_str("   -------+-------+------\n");
                }
                out.push_str(&format!("{row}  "));
                for (col, cell) in cells.iter().enumerate() {
                    if col > 0 && col % 3 == 0 {
                        out.push_str(" |");
                    }
                    let micro = (row / 3) * 3 + col / 3;
                    let blank = if active_micro_boards.contains(&micro) { "." } else { " " };
                    let symbol = mark(*cell).unwrap_or_else(|| blank.to_string());
                    out.push(' ');
                    out.push_str(&symbol);
                }
                out.push('\n');
            }
            out
        }
    }
}

/// One line per decided micro-board, e.g. `Board 4: won by O`.
pub fn render_micro_status(board: &BoardView) -> Vec<String> {
    let BoardView::Ultimate { micro_status, .. } = board else {
        return Vec::new();
    };
    micro_status
        .iter()
        .enumerate()
        .filter_map(|(idx, status)| match status {
            MicroStatus::Open => None,
            MicroStatus::Won(player) => Some(format!("Board {idx}: won by {player}")),
            MicroStatus::Drawn => Some(format!("Board {idx}: drawn")),
        })
        .collect()
}

/// Remaining turn time for both players, to a tenth of a second.
pub fn render_clocks(clocks: &ClockView) -> String {
    format!(
        "X {:.1}s | O {:.1}s",
        clocks.x_remaining_ms as f64 / 1000.0,
        clocks.o_remaining_ms as f64 / 1000.0
    )
}

/// Board, decided micro-boards, clocks and the status banner.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = render_board(&snapshot.board);
    out.push('\n');
    for line in render_micro_status(&snapshot.board) {
        out.push_str(&line);
        out.push('\n');
    }
    if snapshot.status == SessionStatus::Active {
        out.push_str(&render_clocks(&snapshot.clocks));
        out.push('\n');
    }
    out.push_str(&snapshot.headline());
    out
}

/// Fixed-width table: Rank, Name, Wins, Losses, Draws, Win %, Last Played.
pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = format!(
        "{:<4} {:<name_width$} {:>4} {:>6} {:>5} {:>6}  {}\n",
        "Rank", "Name", "Wins", "Losses", "Draws", "Win %", "Last Played"
    );
    for entry in entries {
        out.push_str(&format!(
            "{:<4} {:<name_width$} {:>4} {:>6} {:>5} {:>5.1}%  {}\n",
            entry.rank,
            entry.name,
            entry.wins,
            entry.losses,
            entry.draws,
            entry.win_pct,
            entry.last_played.format("%Y-%m-%d %H:%M"),
        ));
    }
    out
}
