//! Command-line interface for rewind_arcade.

use clap::{Parser, Subcommand};
use rewind_engines::GameId;

/// Rewind Arcade - headless arcade sessions and the score gateway
#[derive(Parser, Debug)]
#[command(name = "rewind_arcade")]
#[command(about = "Headless arcade engines with a score gateway", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "rewind_arcade.toml")]
    pub config: std::path::PathBuf,

    /// Score gateway URL (overrides config and REWIND_GATEWAY_URL)
    #[arg(long, global = true)]
    pub gateway_url: Option<String>,

    /// Bearer token for score submission (overrides config and REWIND_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the score and auth gateway
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Play one session with the built-in autopilot
    Demo {
        /// Game to play (tetris, snake, pong, connect4, tictactoe)
        game: GameId,

        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Submit the result with the configured token
        #[arg(long)]
        submit: bool,

        /// Skip pacing and run as fast as possible
        #[arg(long)]
        fast: bool,
    },

    /// Print the top scores of a game
    Leaderboard {
        /// Game to rank
        game: GameId,

        /// Number of entries
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Create an account and print its token
    Register {
        /// Display name
        #[arg(long)]
        username: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Log in and print a fresh token
    Login {
        /// Login email
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// List the games the gateway knows
    Games,
}
