//! Score and auth gateway client.

mod error;
mod http;
mod models;

pub use error::GatewayError;
pub use http::HttpScoreGateway;
pub use models::{Account, AuthSession, GameInfo, ScoreRecord};

use async_trait::async_trait;
use rewind_engines::GameId;

/// Remote store of accounts and best scores.
#[async_trait]
pub trait ScoreGateway: Send + Sync {
    /// Records `points` for the token's account. The gateway keeps the
    /// higher of the stored and submitted points.
    async fn submit_score(
        &self,
        token: &str,
        game: GameId,
        points: u32,
    ) -> Result<ScoreRecord, GatewayError>;

    /// Top `limit` scores of a game, highest first.
    async fn leaderboard(&self, game: GameId, limit: u32) -> Result<Vec<ScoreRecord>, GatewayError>;

    /// Every game the gateway accepts scores for.
    async fn games(&self) -> Result<Vec<GameInfo>, GatewayError>;

    /// Creates an account and returns its first token.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, GatewayError>;

    /// Exchanges credentials for a fresh token.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// Resolves a token to its account.
    async fn me(&self, token: &str) -> Result<Account, GatewayError>;
}
