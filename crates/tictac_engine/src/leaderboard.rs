//! Win/loss/draw tallies keyed by display name.
//!
//! Display names are the only identity the store knows about: two people
//! playing under the same name share one record.

use chrono::{DateTime, Days, NaiveDate, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tictac_rules::Player;
use tracing::{debug, info, instrument};

/// Lifetime tally for one display name.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize)]
pub struct PlayerRecord {
    name: String,
    #[new(default)]
    wins: u32,
    #[new(default)]
    losses: u32,
    #[new(default)]
    draws: u32,
    last_played_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Games with a decisive result.
    pub fn decided_games(&self) -> u32 {
        self.wins + self.losses
    }

    /// `wins / (wins + losses) * 100`, or 0 when nothing was decided.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn win_percentage(&self) -> f64 {
        if self.decided_games() == 0 {
            0.0
        } else {
            (self.wins as f64 / self.decided_games() as f64) * 100.0
        }
    }
}

/// Ranking order: wins desc, then draws desc, then losses desc.
///
/// Name ascending is the last resort so equal tallies still sort the same way
/// every time.
pub fn rank_order(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.draws.cmp(&a.draws))
        .then_with(|| b.losses.cmp(&a.losses))
        .then_with(|| a.name.cmp(&b.name))
}

/// One row of the ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// One-based position.
    pub rank: usize,
    /// Display name.
    pub name: String,
    /// Games won.
    pub wins: u32,
    /// Games lost.
    pub losses: u32,
    /// Games drawn.
    pub draws: u32,
    /// Win percentage over decided games.
    pub win_pct: f64,
    /// When this name last finished a game.
    pub last_played: DateTime<Utc>,
}

/// Window for the game activity series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ActivityRange {
    /// The last 7 days.
    #[default]
    Week,
    /// The last 30 days.
    Month,
    /// The last 365 days.
    Year,
}

impl ActivityRange {
    /// Number of calendar days covered, today included.
    pub fn days(self) -> u64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

/// Number of games finished on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    /// The day.
    pub date: NaiveDate,
    /// Games finished that day.
    pub games: u32,
}

#[derive(Debug, Default)]
struct LeaderboardState {
    records: HashMap<String, PlayerRecord>,
    finished_games: Vec<DateTime<Utc>>,
}

/// Append-only result sink with a ranked read view.
///
/// A single lock covers both the tallies and the activity log, so a result
/// is either fully recorded or not at all.
#[derive(Debug, Default)]
pub struct LeaderboardStore {
    state: Mutex<LeaderboardState>,
}

impl LeaderboardStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating leaderboard store");
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LeaderboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one finished game between `player_x` and `player_o`.
    ///
    /// `winner` is `None` for a draw. Each name gets exactly one of
    /// wins/losses/draws incremented; unseen names get a fresh record.
    #[instrument(skip(self))]
    pub fn record_result(
        &self,
        player_x: &str,
        player_o: &str,
        winner: Option<Player>,
        played_at: DateTime<Utc>,
    ) {
        let mut state = self.lock();
        for (name, symbol) in [(player_x, Player::X), (player_o, Player::O)] {
            let record = state
                .records
                .entry(name.to_string())
                .or_insert_with(|| PlayerRecord::new(name.to_string(), played_at));
            match winner {
                None => record.draws += 1,
                Some(w) if w == symbol => record.wins += 1,
                Some(_) => record.losses += 1,
            }
            record.last_played_at = played_at;
        }
        state.finished_games.push(played_at);

        info!(
            player_x,
            player_o,
            winner = ?winner,
            total_players = state.records.len(),
            "Recorded game result"
        );
    }

    /// Looks up one name's record.
    pub fn record(&self, name: &str) -> Option<PlayerRecord> {
        self.lock().records.get(name).cloned()
    }

    /// Number of distinct names seen.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Whether no game has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// The best `n` records in ranking order.
    #[instrument(skip(self))]
    pub fn top_n(&self, n: usize) -> Vec<PlayerRecord> {
        let mut records: Vec<PlayerRecord> = self.lock().records.values().cloned().collect();
        records.sort_by(rank_order);
        records.truncate(n);
        debug!(returned = records.len(), "Ranked leaderboard");
        records
    }

    /// The best `n` records as display rows with rank and win percentage.
    pub fn entries(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.top_n(n)
            .into_iter()
            .enumerate()
            .map(|(idx, record)| LeaderboardEntry {
                rank: idx + 1,
                win_pct: record.win_percentage(),
                name: record.name,
                wins: record.wins,
                losses: record.losses,
                draws: record.draws,
                last_played: record.last_played_at,
            })
            .collect()
    }

    /// Finished games per day over `range`, oldest day first.
    ///
    /// Days without games are present with a count of zero.
    #[instrument(skip(self))]
    pub fn game_activity(&self, range: ActivityRange, now: DateTime<Utc>) -> Vec<ActivityPoint> {
        let today = now.date_naive();
        let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
        for played_at in &self.lock().finished_games {
            *per_day.entry(played_at.date_naive()).or_default() += 1;
        }

        (0..range.days())
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| ActivityPoint {
                date,
                games: per_day.get(&date).copied().unwrap_or(0),
            })
            .collect()
    }
}
