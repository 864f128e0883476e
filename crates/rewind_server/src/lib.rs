//! Rewind Arcade score gateway
//!
//! Accounts, opaque bearer tokens and per-game best scores, stored in
//! SQLite and served as JSON over HTTP.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! rewind_server::serve("127.0.0.1", 3000, "arcade.db").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod auth;
mod db;

pub use api::{ApiError, AppState, DEFAULT_LIMIT, router};
pub use auth::{hash_password, new_token, parse_bearer, verify_password};
pub use db::{
    DbError, DbErrorKind, Game, MIGRATIONS, ROLE_ADMIN, ROLE_USER, ScoreEntry, ScoreRepository, User,
};

use tokio::net::TcpListener;
use tracing::{info, instrument};

/// Failure to start or run the gateway.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ServeError {
    /// Repository setup or migration failed.
    #[display("{}", _0)]
    Db(DbError),
    /// Binding or serving failed.
    #[display("I/O error: {}", _0)]
    Io(std::io::Error),
}

impl std::error::Error for ServeError {}

/// Opens (and migrates) the database, then builds the router.
#[instrument]
pub fn open(db_path: &str) -> Result<axum::Router, DbError> {
    let repo = ScoreRepository::new(db_path.to_string())?;
    repo.run_migrations()?;
    Ok(router(repo))
}

/// Serves the gateway until the process is stopped.
#[instrument]
pub async fn serve(host: &str, port: u16, db_path: &str) -> Result<(), ServeError> {
    let app = open(db_path)?;
    let listener = TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, db_path, "Score gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
