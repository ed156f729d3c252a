//! Command-line interface for tictac.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictac_rules::GameMode;

/// Tictac - standard and ultimate tic-tac-toe on a server-authoritative engine
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Standard and ultimate tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to engine config (TOML). Defaults are used when absent.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against the computer
    Play {
        /// Game variant: standard or ultimate
        #[arg(short, long, default_value = "standard")]
        mode: GameMode,

        /// Your display name on the leaderboard
        #[arg(short, long, default_value = "Player")]
        name: String,

        /// Override the per-turn time limit in seconds
        #[arg(long)]
        turn_limit_secs: Option<u64>,
    },

    /// Replay a recorded move list between two local players
    Replay {
        /// Game variant: standard or ultimate
        #[arg(short, long, default_value = "standard")]
        mode: GameMode,

        /// Name of the player moving first
        #[arg(long, default_value = "Player X")]
        x_name: String,

        /// Name of the player moving second
        #[arg(long, default_value = "Player O")]
        o_name: String,

        /// Moves as "row,col" (or a square label or number 0-8 in standard mode)
        #[arg(required = true)]
        moves: Vec<String>,
    },
}
