//! One match: seats, board, turn, clocks and the state machine around them.

use crate::clock::{Clocks, TimeSource};
use crate::config::EngineConfig;
use crate::error::{IllegalMove, SessionError, SessionErrorKind};
use crate::leaderboard::LeaderboardStore;
use crate::snapshot::{BoardView, PlayerView, SessionSnapshot};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tictac_rules::{ComputerPlayer, GameBoard, GameMode, GameStatus, Move, Player};
use tracing::{debug, error, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PlayerSlot {
    display_name: String,
    symbol: Player,
    connection_token: String,
    is_computer: bool,
}

impl PlayerSlot {
    /// Seat for a human, identified later by `connection_token`.
    pub fn human(display_name: impl Into<String>, symbol: Player, connection_token: String) -> Self {
        Self {
            display_name: display_name.into(),
            symbol,
            connection_token,
            is_computer: false,
        }
    }

    /// Seat played by the engine itself.
    pub fn computer(display_name: impl Into<String>, symbol: Player, connection_token: String) -> Self {
        Self {
            display_name: display_name.into(),
            symbol,
            connection_token,
            is_computer: true,
        }
    }
}

/// Lifecycle state of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    /// Host seated, waiting for an opponent.
    Waiting,
    /// Both seats filled, moves accepted.
    Active,
    /// Won, drawn or timed out.
    Finished,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GameResult {
    /// Three in a row (standard) or on the macro-board (ultimate).
    Win {
        /// Symbol that completed the line.
        winner: Player,
    },
    /// No line and no legal move left.
    Draw,
    /// `loser` exceeded the per-turn limit.
    Timeout {
        /// Symbol whose clock ran out.
        loser: Player,
    },
}

impl GameResult {
    /// The winning symbol, if the game was decided.
    pub fn winner(self) -> Option<Player> {
        match self {
            Self::Win { winner } => Some(winner),
            Self::Timeout { loser } => Some(loser.opponent()),
            Self::Draw => None,
        }
    }

    fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Won(winner) => Some(Self::Win { winner }),
            GameStatus::Draw => Some(Self::Draw),
            GameStatus::InProgress => None,
        }
    }
}

/// An accepted move and when it was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// Who moved.
    pub player: Player,
    /// Absolute row.
    pub row: usize,
    /// Absolute column.
    pub col: usize,
    /// When the engine accepted it.
    pub at: DateTime<Utc>,
}

/// What a `leave` request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LeaveOutcome {
    /// The session was closed and should be dropped.
    Closed,
    /// The game is in progress; leaving does not forfeit it.
    Ignored,
}

/// Collaborators every session needs.
#[derive(Debug, Clone)]
pub struct SessionEnv {
    /// Source of "now" for clocks and history.
    pub time: Arc<dyn TimeSource>,
    /// Where finished games are reported.
    pub leaderboard: Arc<LeaderboardStore>,
    /// Turn limits and the computer's name.
    pub config: Arc<EngineConfig>,
}

/// A game session with up to two players.
///
/// All mutation goes through `&mut self`; the registry wraps each session in
/// its own lock so actions on one session are applied one at a time.
#[derive(Debug, Getters)]
pub struct GameSession {
    id: SessionId,
    mode: GameMode,
    player_x: PlayerSlot,
    player_o: Option<PlayerSlot>,
    board: GameBoard,
    turn: Player,
    status: SessionStatus,
    result: Option<GameResult>,
    #[getter(skip)]
    clocks: Clocks,
    history: Vec<MoveRecord>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    #[getter(skip)]
    env: SessionEnv,
    #[getter(skip)]
    computer: ComputerPlayer,
}

impl GameSession {
    /// Creates a session in `waiting` with the host seated as X.
    #[instrument(skip(env, host), fields(host = %host.display_name))]
    pub fn new(id: SessionId, mode: GameMode, host: PlayerSlot, env: SessionEnv) -> Self {
        info!(session_id = %id, %mode, "Creating new game session");
        let now = env.time.now();
        Self {
            clocks: Clocks::new(env.config.turn_limit(mode)),
            id,
            mode,
            player_x: PlayerSlot { symbol: Player::X, ..host },
            player_o: None,
            board: GameBoard::new(mode),
            turn: Player::X,
            status: SessionStatus::Waiting,
            result: None,
            history: Vec::new(),
            created_at: now,
            last_activity: now,
            env,
            computer: ComputerPlayer::new(),
        }
    }

    /// Creates a session that is `active` at once, with the computer as O.
    #[instrument(skip(env, host), fields(host = %host.display_name))]
    pub fn new_vs_computer(
        id: SessionId,
        mode: GameMode,
        host: PlayerSlot,
        computer_token: String,
        env: SessionEnv,
    ) -> Self {
        let name = env.config.computer_name().clone();
        let mut session = Self::new(id, mode, host, env);
        session.player_o = Some(PlayerSlot::computer(name, Player::O, computer_token));
        session.activate();
        session
    }

    fn now(&self) -> DateTime<Utc> {
        self.env.time.now()
    }

    fn activate(&mut self) {
        let now = self.now();
        self.status = SessionStatus::Active;
        self.turn = Player::X;
        self.clocks.reset();
        self.clocks.start(Player::X, now);
        self.last_activity = now;
    }

    /// Seats the joiner as O and starts the game.
    #[instrument(skip(self, connection_token), fields(session_id = %self.id))]
    pub fn join(&mut self, display_name: &str, connection_token: String) -> Result<Player, SessionError> {
        if self.status != SessionStatus::Waiting || self.player_o.is_some() {
            warn!(status = %self.status, "Session already has 2 players");
            return Err(SessionErrorKind::SessionFull(self.id.clone()).into());
        }

        info!(player = display_name, mark = "O", "Registering player as O");
        self.player_o = Some(PlayerSlot::human(display_name, Player::O, connection_token));
        self.activate();
        Ok(Player::O)
    }

    /// Returns the seat holding `connection_token`.
    pub fn seat_of(&self, connection_token: &str) -> Option<&PlayerSlot> {
        std::iter::once(&self.player_x)
            .chain(self.player_o.as_ref())
            .find(|slot| slot.connection_token == connection_token)
    }

    fn require_seat(&self, connection_token: &str) -> Result<Player, SessionError> {
        self.seat_of(connection_token)
            .map(|slot| slot.symbol)
            .ok_or_else(|| {
                warn!(session_id = %self.id, "Unknown connection token");
                SessionErrorKind::UnknownPlayer(self.id.clone()).into()
            })
    }

    fn seat(&self, symbol: Player) -> Option<&PlayerSlot> {
        match symbol {
            Player::X => Some(&self.player_x),
            Player::O => self.player_o.as_ref(),
        }
    }

    /// Ends the game if the player on turn has run out of time.
    ///
    /// Returns whether a timeout fired.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn check_timeout(&mut self) -> bool {
        let now = self.now();
        if self.status != SessionStatus::Active || !self.clocks.has_expired(self.turn, now) {
            return false;
        }

        info!(loser = %self.turn, "Turn clock expired");
        self.finish(GameResult::Timeout { loser: self.turn }, now);
        true
    }

    /// Plays `(row, col)` for the seat holding `connection_token`.
    ///
    /// A move from a player whose clock already ran out ends the game as a
    /// timeout and is then dropped without error. When the computer is to
    /// move afterwards it answers before this returns.
    #[instrument(skip(self, connection_token), fields(session_id = %self.id))]
    pub fn submit_move(
        &mut self,
        connection_token: &str,
        row: usize,
        col: usize,
    ) -> Result<(), SessionError> {
        let mover = self.require_seat(connection_token)?;

        if self.check_timeout() {
            debug!(%mover, row, col, "Move discarded after timeout");
            return Ok(());
        }

        if self.status != SessionStatus::Active {
            warn!(status = %self.status, "Move submitted to inactive game");
            return Err(SessionErrorKind::GameNotActive(self.status).into());
        }

        if mover != self.turn {
            warn!(%mover, expected = %self.turn, "Player tried to move out of turn");
            return Err(SessionErrorKind::IllegalMove(IllegalMove::NotYourTurn(self.turn)).into());
        }

        self.apply(Move::new(mover, row, col)).map_err(|e| {
            warn!(row, col, error = %e, "Invalid move");
            SessionError::from(SessionErrorKind::IllegalMove(IllegalMove::Rules(e)))
        })?;

        if self.status == SessionStatus::Active
            && self.seat(self.turn).is_some_and(|slot| slot.is_computer)
        {
            self.play_computer_turn()?;
        }
        Ok(())
    }

    fn apply(&mut self, mv: Move) -> Result<(), tictac_rules::MoveError> {
        let (board, status) = self.board.apply_move(mv)?;
        let now = self.now();
        self.board = board;
        self.history.push(MoveRecord {
            player: mv.player,
            row: mv.row,
            col: mv.col,
            at: now,
        });
        self.last_activity = now;

        info!(%mv, ?status, "Move completed successfully");
        match GameResult::from_status(status) {
            Some(result) => self.finish(result, now),
            None => {
                self.turn = self.turn.opponent();
                self.clocks.start(self.turn, now);
            }
        }
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %self.id))]
    fn play_computer_turn(&mut self) -> Result<(), SessionError> {
        let player = self.turn;
        let (row, col) = self.computer.choose_move(&self.board, player).ok_or_else(|| {
            error!("Computer found no legal move in an active game");
            SessionError::from(SessionErrorKind::Internal(
                "computer found no legal move".to_string(),
            ))
        })?;

        debug!(row, col, "Computer chose move");
        self.apply(Move::new(player, row, col)).map_err(|e| {
            error!(error = %e, "Computer chose an illegal move");
            SessionErrorKind::Internal(format!("computer move rejected: {}", e)).into()
        })
    }

    fn finish(&mut self, result: GameResult, now: DateTime<Utc>) {
        self.status = SessionStatus::Finished;
        self.result = Some(result);
        self.clocks.stop(now);
        self.last_activity = now;

        let o_name = self
            .player_o
            .as_ref()
            .map(|slot| slot.display_name.as_str())
            .unwrap_or_default();
        self.env
            .leaderboard
            .record_result(&self.player_x.display_name, o_name, result.winner(), now);
        info!(session_id = %self.id, ?result, "Game finished");
    }

    /// Starts a fresh game in a finished session: same seats, X to move.
    #[instrument(skip(self, connection_token), fields(session_id = %self.id))]
    pub fn restart(&mut self, connection_token: &str) -> Result<(), SessionError> {
        self.require_seat(connection_token)?;
        if self.status != SessionStatus::Finished {
            warn!(status = %self.status, "Restart requested before game finished");
            return Err(SessionErrorKind::GameNotActive(self.status).into());
        }

        self.board = GameBoard::new(self.mode);
        self.result = None;
        self.history.clear();
        self.activate();
        info!("Game restarted");
        Ok(())
    }

    /// Symbol of the seat holding `connection_token`, without touching state.
    pub fn rejoin(&self, connection_token: &str) -> Result<Player, SessionError> {
        self.require_seat(connection_token)
    }

    /// Handles a seat leaving: closes waiting or finished sessions, and
    /// ignores the request while a game is in progress.
    #[instrument(skip(self, connection_token), fields(session_id = %self.id))]
    pub fn leave(&mut self, connection_token: &str) -> Result<LeaveOutcome, SessionError> {
        let seat = self.require_seat(connection_token)?;
        let outcome = match self.status {
            SessionStatus::Active => LeaveOutcome::Ignored,
            SessionStatus::Waiting | SessionStatus::Finished => LeaveOutcome::Closed,
        };
        info!(%seat, %outcome, "Player left");
        Ok(outcome)
    }

    /// Full renderable state at the current instant.
    pub fn snapshot(&self) -> SessionSnapshot {
        let now = self.now();
        SessionSnapshot {
            session_id: self.id.clone(),
            mode: self.mode,
            status: self.status,
            result: self.result,
            turn: self.turn,
            players: std::iter::once(&self.player_x)
                .chain(self.player_o.as_ref())
                .map(PlayerView::from)
                .collect(),
            board: BoardView::from(&self.board),
            clocks: self.clocks.view(now),
            last_move: self.history.last().copied(),
        }
    }
}
