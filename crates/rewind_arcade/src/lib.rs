//! Rewind Arcade host
//!
//! Runs [`rewind_engines`] sessions headless, paces them like the browser
//! would, and hands finished results to the score gateway exactly once.
//!
//! # Example
//!
//! ```no_run
//! use rewind_arcade::demo::{DemoOptions, play};
//! use rewind_engines::GameId;
//!
//! # async fn example() {
//! let result = play(GameId::Snake, DemoOptions::new(Some(42))).await;
//! println!("{}\n{}", result.board(), result.report());
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod autopilot;
pub mod config;
pub mod demo;
pub mod gateway;
pub mod runner;
pub mod session;

pub use autopilot::Autopilot;
pub use config::{ArcadeConfig, ConfigError};
pub use gateway::{GatewayError, HttpScoreGateway, ScoreGateway};
pub use runner::{Pacing, RunReport};
pub use session::{ArcadeSession, RetryPolicy, Submission};
