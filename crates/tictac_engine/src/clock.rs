//! Per-turn countdown clocks and the time source they read.
//!
//! Clocks are strictly per turn: every accepted move restarts the allotment
//! for the next mover. Expiry is never pushed; the session checks it lazily
//! when an action arrives.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use tictac_rules::Player;

/// Source of the current instant.
pub trait TimeSource: Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable time source for driving timeouts deterministically.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a manual clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Jumps the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One player's countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerClock {
    limit: Duration,
    turn_started_at: Option<DateTime<Utc>>,
    remaining: Duration,
}

impl PlayerClock {
    /// Creates a stopped clock holding the full allotment.
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            turn_started_at: None,
            remaining: limit,
        }
    }

    /// Starts a fresh turn at `now`.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.turn_started_at = Some(now);
        self.remaining = self.limit;
    }

    /// Stops the clock, keeping what was left on it.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.remaining = self.remaining(now);
        self.turn_started_at = None;
    }

    /// Stops the clock and restores the full allotment.
    pub fn reset(&mut self) {
        self.turn_started_at = None;
        self.remaining = self.limit;
    }

    /// Whether more than the allotment has elapsed since the turn started.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.turn_started_at
            .is_some_and(|started| now - started > self.limit)
    }

    /// Time left on the clock at `now`, never negative.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.turn_started_at {
            Some(started) => (self.limit - (now - started)).max(Duration::zero()),
            None => self.remaining,
        }
    }

    /// Instant the running turn began, if the clock is running.
    pub fn turn_started_at(&self) -> Option<DateTime<Utc>> {
        self.turn_started_at
    }
}

/// Remaining time per player, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockView {
    /// Milliseconds left for X.
    pub x_remaining_ms: i64,
    /// Milliseconds left for O.
    pub o_remaining_ms: i64,
}

/// The pair of clocks attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clocks {
    x: PlayerClock,
    o: PlayerClock,
}

impl Clocks {
    /// Creates two stopped clocks with the same allotment.
    pub fn new(limit: Duration) -> Self {
        Self {
            x: PlayerClock::new(limit),
            o: PlayerClock::new(limit),
        }
    }

    /// Returns one player's clock.
    pub fn get(&self, player: Player) -> &PlayerClock {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    fn get_mut(&mut self, player: Player) -> &mut PlayerClock {
        match player {
            Player::X => &mut self.x,
            Player::O => &mut self.o,
        }
    }

    /// Hands the turn to `player`: their clock restarts, the other resets.
    pub fn start(&mut self, player: Player, now: DateTime<Utc>) {
        self.get_mut(player.opponent()).reset();
        self.get_mut(player).start(now);
    }

    /// Stops both clocks.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.x.stop(now);
        self.o.stop(now);
    }

    /// Stops both clocks and restores both allotments.
    pub fn reset(&mut self) {
        self.x.reset();
        self.o.reset();
    }

    /// Whether `player` has run past their allotment.
    pub fn has_expired(&self, player: Player, now: DateTime<Utc>) -> bool {
        self.get(player).has_expired(now)
    }

    /// Remaining time for both players at `now`.
    pub fn view(&self, now: DateTime<Utc>) -> ClockView {
        ClockView {
            x_remaining_ms: self.x.remaining(now).num_milliseconds(),
            o_remaining_ms: self.o.remaining(now).num_milliseconds(),
        }
    }
}
