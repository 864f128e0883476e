//! Tic-tac-toe against a three-level AI.

pub mod ai;
mod game;
mod position;
pub mod rules;
mod types;

pub use ai::{Difficulty, candidate_moves, choose_move};
pub use game::{GameState, TicTacToe};
pub use position::Position;
pub use types::{Board, Mark, Square};
