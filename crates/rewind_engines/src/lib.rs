//! Rewind Arcade engines - self-contained game simulations
//!
//! Each engine owns one game's full rule set and state. Engines never
//! block, never sleep and never touch the network; the host drives them
//! through the [`Engine`], [`RealTime`] and [`TurnBased`] traits and is
//! responsible for timers and score submission.
//!
//! # Games
//!
//! - **Tetris**: 12x20 well, level-scaled gravity
//! - **Snake**: 24x16 grid, grows on food
//! - **Pong**: 600x400 field, first to ten goals
//! - **Connect Four**: 7x6 gravity grid against a random opponent
//! - **Tic-Tac-Toe**: 3x3 against a three-level AI
//!
//! # Example
//!
//! ```
//! use rewind_engines::{Engine, TicTacToe, TurnBased, tictactoe::{Difficulty, Position}};
//!
//! let mut game = TicTacToe::with_difficulty(Difficulty::Hard, 7);
//! game.apply(Position::Center).unwrap();
//! game.reply().unwrap();
//! assert!(!game.is_terminal());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
pub mod connect_four;
pub mod pong;
pub mod rng;
pub mod snake;
pub mod tetris;
pub mod tictactoe;

// Crate-level exports - shared vocabulary
pub use engine::{Engine, GameId, MoveError, Outcome, RealTime, Side, Status, TurnBased, WIN_REWARD};

// Crate-level exports - engines
pub use connect_four::ConnectFour;
pub use pong::Pong;
pub use snake::Snake;
pub use tetris::Tetris;
pub use tictactoe::TicTacToe;
