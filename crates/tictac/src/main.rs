//! Tictac - terminal front end
//!
//! Drives the session engine from stdin: play against the computer, or
//! replay a recorded move list between two local seats.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod input;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::io::{BufRead, Write};
use std::path::Path;
use tictac_engine::{EngineConfig, SessionRegistry, SessionStatus};
use tictac_rules::{GameMode, Player};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Play {
            mode,
            name,
            turn_limit_secs,
        } => {
            let config = match turn_limit_secs {
                Some(secs) => config.with_turn_limit_secs(mode, secs),
                None => config,
            };
            run_play(config, mode, &name)
        }
        Command::Replay {
            mode,
            x_name,
            o_name,
            moves,
        } => run_replay(config, mode, &x_name, &o_name, &moves),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => {
            debug!("No config file given, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

/// Interactive game against the computer.
#[instrument(skip(config))]
fn run_play(config: EngineConfig, mode: GameMode, name: &str) -> Result<()> {
    info!(limit_secs = config.turn_limit(mode).num_seconds(), "Starting game");
    let registry = SessionRegistry::new(config);
    let seat = registry.create_session(mode, name, true);
    let (id, token) = (&seat.session_id, &seat.connection_token);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = std::io::stdout();

    loop {
        let snapshot = registry.poll(id)?;
        writeln!(stdout, "\n{}", render::render_snapshot(&snapshot))?;

        if snapshot.status == SessionStatus::Finished {
            write!(stdout, "Play again? [y/N] ")?;
            stdout.flush()?;
            match lines.next().transpose()? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                    registry.restart(id, token)?;
                    continue;
                }
                _ => break,
            }
        }

        write!(stdout, "Your move (row,col{}; q to quit): ", standard_hint(mode))?;
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("q") {
            let outcome = registry.leave(id, token)?;
            debug!(%outcome, "Leave requested");
            break;
        }

        let Some((row, col)) = input::parse_coords(&line, mode) else {
            writeln!(stdout, "Could not read '{}' as a move", line.trim())?;
            continue;
        };
        if let Err(e) = registry.submit_move(id, token, row, col) {
            warn!(error = %e, "Move rejected");
            writeln!(stdout, "{}", e.kind)?;
        }
    }

    writeln!(stdout, "\n{}", render::render_leaderboard(&registry.leaderboard(None)))?;
    Ok(())
}

fn standard_hint(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Standard => " or square 0-8",
        GameMode::Ultimate => "",
    }
}

/// Plays a recorded move list through the engine, X and O alternating.
#[instrument(skip(config, moves), fields(moves = moves.len()))]
fn run_replay(
    config: EngineConfig,
    mode: GameMode,
    x_name: &str,
    o_name: &str,
    moves: &[String],
) -> Result<()> {
    let registry = SessionRegistry::new(config);
    let host = registry.create_session(mode, x_name, false);
    let guest = registry.join_session(&host.session_id, o_name)?;
    let id = &host.session_id;

    let mut snapshot = registry.poll(id)?;
    for (idx, text) in moves.iter().enumerate() {
        if snapshot.status == SessionStatus::Finished {
            warn!(remaining = moves.len() - idx, "Game ended before the move list did");
            break;
        }
        let Some((row, col)) = input::parse_coords(text, mode) else {
            bail!("move {} ('{}') is not a coordinate", idx + 1, text);
        };
        let token = match snapshot.turn {
            Player::X => &host.connection_token,
            Player::O => &guest.connection_token,
        };
        snapshot = registry
            .submit_move(id, token, row, col)
            .with_context(|| format!("move {} ({}, {}) by {}", idx + 1, row, col, snapshot.turn))?;
    }

    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", render::render_snapshot(&snapshot))?;
    if snapshot.status == SessionStatus::Finished {
        writeln!(stdout, "\n{}", render::render_leaderboard(&registry.leaderboard(None)))?;
    }
    Ok(())
}
