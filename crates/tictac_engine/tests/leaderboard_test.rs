//! Leaderboard ranking, limits and concurrent reporting.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use tictac_engine::{
    ActivityRange, EngineConfig, LeaderboardStore, ManualClock, SessionRegistry, rank_order,
};
use tictac_rules::{GameMode, Player};

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn random_store(rng: &mut StdRng, players: usize, games: usize) -> LeaderboardStore {
    let store = LeaderboardStore::new();
    for game in 0..games {
        let x = rng.random_range(0..players);
        let mut o = rng.random_range(0..players);
        if o == x {
            o = (o + 1) % players;
        }
        let winner = match rng.random_range(0..3) {
            0 => Some(Player::X),
            1 => Some(Player::O),
            _ => None,
        };
        store.record_result(
            &format!("player{x:02}"),
            &format!("player{o:02}"),
            winner,
            t0() + Duration::minutes(game as i64),
        );
    }
    store
}

#[test]
fn test_top_ten_of_fifty() {
    let mut rng = StdRng::seed_from_u64(50);
    let store = random_store(&mut rng, 50, 2_000);
    assert_eq!(store.len(), 50);

    let top = store.top_n(10);
    assert_eq!(top.len(), 10);
    assert_eq!(store.entries(10).len(), 10);
    assert_eq!(store.top_n(100).len(), 50);
}

#[test]
fn test_ranking_is_consistent_total_order() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..20 {
        let store = random_store(&mut rng, 12, 60);
        let ranked = store.top_n(usize::MAX);

        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key = |r: &tictac_engine::PlayerRecord| (*r.wins(), *r.draws(), *r.losses());
            assert!(key(a) >= key(b), "{a:?} ranked above {b:?}");
            assert_ne!(rank_order(a, b), std::cmp::Ordering::Greater);
        }
    }
}

#[test]
fn test_entries_carry_win_percentage() {
    let store = LeaderboardStore::new();
    for winner in [Some(Player::X), Some(Player::X), Some(Player::O), None] {
        store.record_result("alice", "bob", winner, t0());
    }

    let entries = store.entries(10);
    let alice = entries.iter().find(|e| e.name == "alice").unwrap();
    assert_eq!((alice.wins, alice.losses, alice.draws), (2, 1, 1));
    assert!((alice.win_pct - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(alice.rank, 1);
    assert_eq!(alice.last_played, t0());
}

#[test]
fn test_concurrent_results_are_not_lost() {
    let store = Arc::new(LeaderboardStore::new());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..250 {
                    let winner = if worker % 2 == 0 { Some(Player::X) } else { None };
                    store.record_result("host", &format!("guest{worker}"), winner, t0());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let host = store.record("host").unwrap();
    assert_eq!(*host.wins(), 1_000);
    assert_eq!(*host.draws(), 1_000);
    let activity = store.game_activity(ActivityRange::Week, t0());
    assert_eq!(activity.last().unwrap().games, 2_000);
}

#[test]
fn test_registry_leaderboard_uses_configured_limit() {
    let clock = ManualClock::new(t0());
    let config = EngineConfig::from_toml("leaderboard_limit = 2\n").unwrap();
    let registry = SessionRegistry::with_parts(
        config,
        Arc::new(clock.clone()),
        Arc::new(LeaderboardStore::new()),
    );

    let hosts: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| registry.create_session(GameMode::Standard, name, true))
        .collect();
    for host in &hosts {
        registry
            .submit_move(&host.session_id, &host.connection_token, 0, 0)
            .unwrap();
    }
    assert!(registry.leaderboard(None).is_empty());

    clock.advance(Duration::seconds(6));
    for host in &hosts {
        registry.poll(&host.session_id).unwrap();
    }

    let board = registry.leaderboard(None);
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].name, "Computer");
    assert_eq!(board[0].wins, 3);
    assert_eq!(registry.leaderboard(Some(10)).len(), 4);
    assert_eq!(registry.game_activity(ActivityRange::Month).len(), 30);
}

#[test]
fn test_sessions_run_in_parallel() {
    let registry = SessionRegistry::new(EngineConfig::default());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let registry = registry.clone();
            thread::spawn(move || {
                let host = registry.create_session(GameMode::Standard, &format!("p{worker}"), true);
                // First empty square, row-major, until the game ends.
                loop {
                    let snapshot = registry.poll(&host.session_id).unwrap();
                    if snapshot.result.is_some() {
                        return snapshot;
                    }
                    let tictac_engine::BoardView::Standard { cells } = snapshot.board else {
                        unreachable!("standard session");
                    };
                    let (row, col) = (0..9)
                        .map(|idx| (idx / 3, idx % 3))
                        .find(|&(r, c)| cells[r][c].is_none())
                        .unwrap();
                    registry
                        .submit_move(&host.session_id, &host.connection_token, row, col)
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        let snapshot = handle.join().unwrap();
        assert_ne!(snapshot.result.and_then(|r| r.winner()), Some(Player::X));
    }
    assert_eq!(registry.len(), 8);
    let computer = registry.leaderboard_store().record("Computer").unwrap();
    assert_eq!(*computer.wins() + *computer.draws(), 8);
}
