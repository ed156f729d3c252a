//! Session engine error types.

use crate::session::SessionStatus;
use derive_more::{Display, Error};
use tictac_rules::{MoveError, Player};
use tracing::instrument;

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IllegalMove {
    /// The mover is not the player whose turn it is.
    #[display("It is {}'s turn", _0)]
    NotYourTurn(Player),
    /// The rules rejected the coordinates.
    #[display("{}", _0)]
    Rules(MoveError),
}

/// Category of a session error.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// No session exists under the given id.
    #[display("Session {} not found", _0)]
    SessionNotFound(String),

    /// The session already has both players.
    #[display("Session {} already has two players", _0)]
    SessionFull(String),

    /// The move was refused; session state is unchanged.
    #[display("Illegal move: {}", _0)]
    IllegalMove(IllegalMove),

    /// The session is waiting for an opponent or already finished.
    #[display("Game is not active (status: {})", _0)]
    GameNotActive(SessionStatus),

    /// The connection token belongs to neither player of the session.
    #[display("Unknown player for session {}", _0)]
    UnknownPlayer(String),

    /// An engine invariant was violated; only this operation is aborted.
    #[display("Internal error: {}", _0)]
    Internal(String),
}

/// Session engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// What went wrong.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind), fields(kind = %kind))]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error category.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }
}

impl From<SessionErrorKind> for SessionError {
    #[track_caller]
    fn from(kind: SessionErrorKind) -> Self {
        Self::new(kind)
    }
}
