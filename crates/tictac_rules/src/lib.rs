//! Pure tic-tac-toe rules for the standard and ultimate variants.
//!
//! # Architecture
//!
//! - **Rules**: stateless win/draw detectors over any 3x3 grid
//! - **Standard**: move application on a single 3x3 board
//! - **Ultimate**: micro-boards, the macro-board and the forced-move rule
//! - **GameBoard**: one `apply_move` capability dispatched on the mode
//! - **ComputerPlayer**: move selection for the computer opponent
//!
//! Nothing in this crate owns time, sessions or players; it only answers
//! "is this move legal, and what does the board look like afterwards".

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod computer;
mod game;
mod position;
pub mod rules;
mod standard;
mod types;
mod ultimate;

pub use action::{Move, MoveError};
pub use computer::ComputerPlayer;
pub use game::GameBoard;
pub use position::Position;
pub use standard::apply_standard_move;
pub use types::{Board, GameMode, GameStatus, Player, Square};
pub use ultimate::{MicroBoard, MicroStatus, UltimateBoard, apply_ultimate_move};
