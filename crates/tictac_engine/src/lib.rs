//! Server-authoritative session engine for standard and ultimate tic-tac-toe.
//!
//! # Architecture
//!
//! - **SessionRegistry**: id to session map, the entry point for every action
//! - **GameSession**: one match's state machine, serialized behind its own lock
//! - **Clocks**: per-turn countdowns, checked lazily when an action arrives
//! - **LeaderboardStore**: result sink with a ranked view and daily activity
//!
//! Move legality lives in `tictac_rules`; this crate owns time, seats and
//! lifecycle.
//!
//! ```
//! use tictac_engine::{EngineConfig, SessionRegistry};
//! use tictac_rules::GameMode;
//!
//! let registry = SessionRegistry::new(EngineConfig::default());
//! let host = registry.create_session(GameMode::Standard, "alice", true);
//! let snapshot = registry
//!     .submit_move(&host.session_id, &host.connection_token, 1, 1)
//!     .unwrap();
//! // The computer has already answered.
//! assert!(snapshot.last_move.is_some());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod clock;
mod config;
mod error;
mod ids;
mod leaderboard;
mod registry;
mod session;
mod snapshot;

pub use clock::{ClockView, Clocks, ManualClock, PlayerClock, SystemClock, TimeSource};
pub use config::{ConfigError, EngineConfig};
pub use error::{IllegalMove, SessionError, SessionErrorKind};
pub use ids::{SESSION_ID_LEN, TOKEN_LEN};
pub use leaderboard::{
    ActivityPoint, ActivityRange, LeaderboardEntry, LeaderboardStore, PlayerRecord, rank_order,
};
pub use registry::{SeatAssignment, SessionRegistry};
pub use session::{
    GameResult, GameSession, LeaveOutcome, MoveRecord, PlayerSlot, SessionEnv, SessionId,
    SessionStatus,
};
pub use snapshot::{BoardView, PlayerView, SeatView, SessionSnapshot};
