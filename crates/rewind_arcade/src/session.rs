//! One engine, the player's credentials and the fate of its score.

use std::sync::Arc;
use std::time::Duration;

use derive_getters::Getters;
use rewind_engines::{Engine, MoveError};
use tracing::{debug, info, instrument, warn};

use crate::gateway::{GatewayError, ScoreGateway, ScoreRecord};

/// How often and how patiently a failed submission is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RetryPolicy {
    retries: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// `retries` extra attempts, `backoff` apart.
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(250))
    }
}

/// What happened to the session's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The match is still running.
    Pending,
    /// Finished, but no gateway or token was configured.
    NotAttributed,
    /// Finished with nothing worth recording.
    NothingToSubmit,
    /// The gateway accepted the result and answered with the stored best.
    Submitted(ScoreRecord),
    /// Every attempt failed; the last error is kept for display.
    Failed(GatewayError),
}

impl Submission {
    /// False while the match is running.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Submission::Pending)
    }
}

/// A playing session.
pub struct ArcadeSession<E: Engine> {
    engine: E,
    gateway: Option<Arc<dyn ScoreGateway>>,
    token: Option<String>,
    retry: RetryPolicy,
    submission: Submission,
}

impl<E: Engine> std::fmt::Debug for ArcadeSession<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcadeSession")
            .field("game", &self.engine.game_id())
            .field("status", &self.engine.status())
            .field("attributed", &self.is_attributed())
            .field("submission", &self.submission)
            .finish()
    }
}

impl<E: Engine> ArcadeSession<E> {
    /// A session whose result is never submitted.
    pub fn offline(engine: E) -> Self {
        Self {
            engine,
            gateway: None,
            token: None,
            retry: RetryPolicy::default(),
            submission: Submission::Pending,
        }
    }

    /// A session that reports to `gateway` as the owner of `token`.
    /// Without a token the result stays unattributed.
    pub fn attributed(engine: E, gateway: Arc<dyn ScoreGateway>, token: Option<String>) -> Self {
        Self {
            gateway: Some(gateway),
            token,
            ..Self::offline(engine)
        }
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The engine, for tick and reply calls. Follow them with [`observe`].
    ///
    /// [`observe`]: ArcadeSession::observe
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Current submission state.
    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Whether a finished match would be sent anywhere.
    pub fn is_attributed(&self) -> bool {
        self.gateway.is_some() && self.token.is_some()
    }

    /// Forwards a human command. Rejections leave the session unchanged.
    #[instrument(skip(self), fields(game = %self.engine.game_id()))]
    pub fn apply(&mut self, command: E::Command) -> Result<(), MoveError> {
        self.engine.apply(command)
    }

    /// Settles the submission the first time the engine is terminal.
    /// Later calls return the settled state without contacting the gateway.
    #[instrument(skip(self), fields(game = %self.engine.game_id()))]
    pub async fn observe(&mut self) -> &Submission {
        if self.submission.is_settled() || !self.engine.is_terminal() {
            return &self.submission;
        }

        info!(
            status = %self.engine.status(),
            score = self.engine.score(),
            "Session finished"
        );

        self.submission = match (self.engine.submittable_points(), &self.gateway, &self.token) {
            (None, _, _) => {
                debug!("Nothing to submit");
                Submission::NothingToSubmit
            }
            (Some(points), Some(gateway), Some(token)) => {
                let gateway = Arc::clone(gateway);
                let token = token.clone();
                self.submit(gateway.as_ref(), &token, points).await
            }
            (Some(points), _, _) => {
                debug!(points, "No credentials, result not attributed");
                Submission::NotAttributed
            }
        };
        &self.submission
    }

    async fn submit(&self, gateway: &dyn ScoreGateway, token: &str, points: u32) -> Submission {
        let game = self.engine.game_id();
        let mut attempt = 0;
        loop {
            match gateway.submit_score(token, game, points).await {
                Ok(record) => {
                    info!(points, best = record.points(), attempt, "Score recorded");
                    return Submission::Submitted(record);
                }
                Err(e) if e.is_retryable() && attempt < self.retry.retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "Submission failed, retrying");
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Submission failed");
                    return Submission::Failed(e);
                }
            }
        }
    }

    /// Starts over: fresh engine state and a pending submission.
    #[instrument(skip(self), fields(game = %self.engine.game_id()))]
    pub fn reset(&mut self) {
        self.engine.reset();
        self.submission = Submission::Pending;
        debug!("Session reset");
    }
}
