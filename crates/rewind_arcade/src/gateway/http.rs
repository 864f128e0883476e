//! Gateway client over HTTP/JSON.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use rewind_engines::GameId;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::models::{
    Credentials, GamesEnvelope, MessageEnvelope, ScoreEnvelope, ScoresEnvelope, SubmitScore,
    UserEnvelope,
};
use super::{Account, AuthSession, GameInfo, GatewayError, ScoreGateway, ScoreRecord};

/// Talks to a running score gateway.
#[derive(Debug, Clone)]
pub struct HttpScoreGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpScoreGateway {
    /// Creates a client for the gateway at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        debug!("Creating gateway client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and decodes a success body, or maps the `{message}`
    /// body of a failure.
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = response
            .json::<MessageEnvelope>()
            .await
            .map(|m| m.message)
            .unwrap_or_default();
        debug!(status = status.as_u16(), message = %message, "Gateway returned an error");
        Err(GatewayError::from_status(status.as_u16(), message))
    }
}

#[async_trait]
impl ScoreGateway for HttpScoreGateway {
    #[instrument(skip(self, token))]
    async fn submit_score(
        &self,
        token: &str,
        game: GameId,
        points: u32,
    ) -> Result<ScoreRecord, GatewayError> {
        let game_id: &'static str = game.into();
        let request = self
            .client
            .post(self.url("/scores"))
            .bearer_auth(token)
            .json(&SubmitScore { game_id, points });
        let envelope: ScoreEnvelope = Self::send(request).await.inspect_err(|e| {
            warn!(error = %e, "Score submission failed");
        })?;
        info!(best = envelope.score.points(), "Score submitted");
        Ok(envelope.score)
    }

    #[instrument(skip(self))]
    async fn leaderboard(&self, game: GameId, limit: u32) -> Result<Vec<ScoreRecord>, GatewayError> {
        let request = self
            .client
            .get(self.url(&format!("/scores/game/{}?limit={}", game, limit)));
        let envelope: ScoresEnvelope = Self::send(request).await?;
        debug!(count = envelope.scores.len(), "Leaderboard fetched");
        Ok(envelope.scores)
    }

    #[instrument(skip(self))]
    async fn games(&self) -> Result<Vec<GameInfo>, GatewayError> {
        let envelope: GamesEnvelope = Self::send(self.client.get(self.url("/games"))).await?;
        Ok(envelope.games)
    }

    #[instrument(skip(self, email, password), fields(username = %username))]
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, GatewayError> {
        let request = self.client.post(self.url("/auth/register")).json(&Credentials {
            username: Some(username),
            email,
            password,
        });
        let session: AuthSession = Self::send(request).await?;
        info!(user_id = session.user().id(), "Registered");
        Ok(session)
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let request = self.client.post(self.url("/auth/login")).json(&Credentials {
            username: None,
            email,
            password,
        });
        let session: AuthSession = Self::send(request).await?;
        info!(user_id = session.user().id(), "Logged in");
        Ok(session)
    }

    #[instrument(skip(self, token))]
    async fn me(&self, token: &str) -> Result<Account, GatewayError> {
        let request = self.client.get(self.url("/auth/me")).bearer_auth(token);
        let envelope: UserEnvelope = Self::send(request).await?;
        Ok(envelope.user)
    }
}
