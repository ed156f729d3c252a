//! Process-wide map from session id to session.

use crate::clock::{SystemClock, TimeSource};
use crate::config::EngineConfig;
use crate::error::{SessionError, SessionErrorKind};
use crate::ids;
use crate::leaderboard::{ActivityPoint, ActivityRange, LeaderboardEntry, LeaderboardStore};
use crate::session::{GameSession, LeaveOutcome, PlayerSlot, SessionEnv, SessionId};
use crate::snapshot::{SeatView, SessionSnapshot};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tictac_rules::{GameMode, Player};
use tracing::{debug, info, instrument, warn};

/// Seat handed out by create or join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatAssignment {
    /// Session the seat belongs to.
    pub session_id: SessionId,
    /// Assigned symbol.
    pub symbol: Player,
    /// Secret for later moves and rejoins.
    pub connection_token: String,
}

type SharedSession = Arc<Mutex<GameSession>>;

fn lock_session(session: &Mutex<GameSession>) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Manages all game sessions.
///
/// The map lock is held only for lookups and inserts. Each session has its
/// own lock, so actions on one session never wait on another.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SharedSession>>>,
    env: SessionEnv,
}

impl SessionRegistry {
    /// Creates a registry on wall-clock time with a fresh leaderboard.
    #[instrument(skip(config))]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(LeaderboardStore::new()))
    }

    /// Creates a registry with an explicit time source and leaderboard.
    #[instrument(skip_all)]
    pub fn with_parts(
        config: EngineConfig,
        time: Arc<dyn TimeSource>,
        leaderboard: Arc<LeaderboardStore>,
    ) -> Self {
        info!("Creating session registry");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            env: SessionEnv {
                time,
                leaderboard,
                config: Arc::new(config),
            },
        }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<SessionId, SharedSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self, id: &str) -> Result<SharedSession, SessionError> {
        self.map().get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionErrorKind::SessionNotFound(id.to_string()).into()
        })
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.env.config
    }

    /// Shared leaderboard.
    pub fn leaderboard_store(&self) -> &Arc<LeaderboardStore> {
        &self.env.leaderboard
    }

    /// Opens a session with the host as X.
    ///
    /// Against the computer the session is active at once; otherwise it
    /// waits for [`join_session`](Self::join_session).
    #[instrument(skip(self))]
    pub fn create_session(&self, mode: GameMode, host_name: &str, vs_computer: bool) -> SeatAssignment {
        let mut rng = rand::rng();
        let token = ids::connection_token(&mut rng);
        let host = PlayerSlot::human(host_name, Player::X, token.clone());

        let mut sessions = self.map();
        let id = loop {
            let candidate = ids::session_id(&mut rng);
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = if vs_computer {
            let computer_token = ids::connection_token(&mut rng);
            GameSession::new_vs_computer(id.clone(), mode, host, computer_token, self.env.clone())
        } else {
            GameSession::new(id.clone(), mode, host, self.env.clone())
        };
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        info!(session_id = %id, total = sessions.len(), "Created new session");
        SeatAssignment {
            session_id: id,
            symbol: Player::X,
            connection_token: token,
        }
    }

    /// Seats `joiner_name` as O in a waiting session.
    #[instrument(skip(self))]
    pub fn join_session(&self, session_id: &str, joiner_name: &str) -> Result<SeatAssignment, SessionError> {
        let session = self.session(session_id)?;
        let token = ids::connection_token(&mut rand::rng());
        let symbol = lock_session(&session).join(joiner_name, token.clone())?;
        Ok(SeatAssignment {
            session_id: session_id.to_string(),
            symbol,
            connection_token: token,
        })
    }

    /// Returns the caller's seat and the current state, changing nothing.
    #[instrument(skip(self, connection_token))]
    pub fn rejoin(&self, session_id: &str, connection_token: &str) -> Result<SeatView, SessionError> {
        let session = self.session(session_id)?;
        let session = lock_session(&session);
        let symbol = session.rejoin(connection_token)?;
        debug!(%symbol, "Player rejoined");
        Ok(SeatView {
            symbol,
            snapshot: session.snapshot(),
        })
    }

    /// Plays a move and returns the resulting state.
    #[instrument(skip(self, connection_token))]
    pub fn submit_move(
        &self,
        session_id: &str,
        connection_token: &str,
        row: usize,
        col: usize,
    ) -> Result<SessionSnapshot, SessionError> {
        let session = self.session(session_id)?;
        let mut session = lock_session(&session);
        session.submit_move(connection_token, row, col)?;
        Ok(session.snapshot())
    }

    /// Starts a new game in a finished session.
    #[instrument(skip(self, connection_token))]
    pub fn restart(&self, session_id: &str, connection_token: &str) -> Result<SessionSnapshot, SessionError> {
        let session = self.session(session_id)?;
        let mut session = lock_session(&session);
        session.restart(connection_token)?;
        Ok(session.snapshot())
    }

    /// Applies any pending timeout and returns the state.
    #[instrument(skip(self))]
    pub fn poll(&self, session_id: &str) -> Result<SessionSnapshot, SessionError> {
        let session = self.session(session_id)?;
        let mut session = lock_session(&session);
        session.check_timeout();
        Ok(session.snapshot())
    }

    /// Leaves a session; waiting or finished sessions are dropped.
    #[instrument(skip(self, connection_token))]
    pub fn leave(&self, session_id: &str, connection_token: &str) -> Result<LeaveOutcome, SessionError> {
        let session = self.session(session_id)?;
        let outcome = lock_session(&session).leave(connection_token)?;
        if outcome == LeaveOutcome::Closed {
            self.remove(session_id);
        }
        Ok(outcome)
    }

    /// Ranked leaderboard rows; `None` uses the configured limit.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let limit = limit.unwrap_or(*self.env.config.leaderboard_limit());
        self.env.leaderboard.entries(limit)
    }

    /// Games finished per day over `range`, ending today.
    pub fn game_activity(&self, range: ActivityRange) -> Vec<ActivityPoint> {
        self.env.leaderboard.game_activity(range, self.env.time.now())
    }

    /// Drops a session. Returns whether it existed.
    #[instrument(skip(self))]
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.map().remove(session_id).is_some();
        if removed {
            info!(session_id, "Removed session");
        } else {
            warn!(session_id, "Remove requested for unknown session");
        }
        removed
    }

    /// Drops every session idle for longer than `max_idle`.
    ///
    /// The engine never calls this itself; hosts that want expiry schedule it.
    #[instrument(skip(self))]
    pub fn sweep_idle(&self, max_idle: chrono::Duration) -> usize {
        let cutoff = self.env.time.now() - max_idle;
        let mut sessions = self.map();
        let before = sessions.len();
        sessions.retain(|_, session| *lock_session(session).last_activity() >= cutoff);
        let swept = before - sessions.len();
        info!(swept, remaining = sessions.len(), "Swept idle sessions");
        swept
    }

    /// Lists all session ids.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.map().keys().cloned().collect()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    /// Whether there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
