//! Read-only views of a session for transports to render.

use crate::clock::ClockView;
use crate::session::{GameResult, MoveRecord, PlayerSlot, SessionStatus};
use serde::Serialize;
use tictac_rules::{GameBoard, GameMode, MicroStatus, Player};

/// Public view of a seat. Connection tokens never leave the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// Display name.
    pub name: String,
    /// X or O.
    pub symbol: Player,
    /// Whether the engine plays this seat.
    pub is_computer: bool,
}

impl From<&PlayerSlot> for PlayerView {
    fn from(slot: &PlayerSlot) -> Self {
        Self {
            name: slot.display_name().clone(),
            symbol: *slot.symbol(),
            is_computer: *slot.is_computer(),
        }
    }
}

/// Board contents for either variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BoardView {
    /// 3x3 cells.
    Standard {
        /// Cells by row.
        cells: [[Option<Player>; 3]; 3],
    },
    /// 9x9 cells plus the macro state.
    Ultimate {
        /// Cells by absolute row.
        cells: [[Option<Player>; 9]; 9],
        /// Status of each micro-board, row-major.
        micro_status: [MicroStatus; 9],
        /// Micro-boards the player to move may play in.
        active_micro_boards: Vec<usize>,
    },
}

impl From<&GameBoard> for BoardView {
    fn from(board: &GameBoard) -> Self {
        match board {
            GameBoard::Standard(b) => BoardView::Standard { cells: b.rows() },
            GameBoard::Ultimate(u) => BoardView::Ultimate {
                cells: u.rows(),
                micro_status: std::array::from_fn(|idx| u.micro_boards()[idx].status()),
                active_micro_boards: u.active_micro_boards().iter().copied().collect(),
            },
        }
    }
}

/// Everything a client needs to draw a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Session id.
    pub session_id: String,
    /// Standard or ultimate.
    pub mode: GameMode,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Outcome once finished.
    pub result: Option<GameResult>,
    /// Symbol to move.
    pub turn: Player,
    /// Seated players, X first.
    pub players: Vec<PlayerView>,
    /// Board contents.
    pub board: BoardView,
    /// Remaining time on each clock.
    pub clocks: ClockView,
    /// Most recent accepted move.
    pub last_move: Option<MoveRecord>,
}

impl SessionSnapshot {
    /// Display name for a symbol, if that seat is filled.
    pub fn player_name(&self, symbol: Player) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.symbol == symbol)
            .map(|p| p.name.as_str())
    }

    /// Banner text for the current state.
    pub fn headline(&self) -> String {
        let name = |symbol| self.player_name(symbol).unwrap_or("?").to_string();
        match (self.status, self.result) {
            (SessionStatus::Waiting, _) => "Waiting for opponent...".to_string(),
            (SessionStatus::Active, _) => format!("{} ({}) to move", name(self.turn), self.turn),
            (_, Some(GameResult::Draw)) => "It's a draw!".to_string(),
            (_, Some(GameResult::Win { winner })) => format!("{} wins!", name(winner)),
            (_, Some(GameResult::Timeout { loser })) => {
                format!("{} ran out of time. {} wins!", name(loser), name(loser.opponent()))
            }
            (_, None) => "Game over".to_string(),
        }
    }
}

/// A caller's seat plus the session as it stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    /// Caller's symbol.
    pub symbol: Player,
    /// Current state.
    pub snapshot: SessionSnapshot,
}
