//! Host configuration: TOML file, then environment overrides.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Gateway base URL environment override.
pub const ENV_GATEWAY_URL: &str = "REWIND_GATEWAY_URL";
/// Bearer token environment override.
pub const ENV_TOKEN: &str = "REWIND_TOKEN";
/// Database path environment override (used by `serve`).
pub const ENV_DB_PATH: &str = "REWIND_DB_PATH";

/// Configuration for the arcade host.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// Base URL of the score gateway.
    gateway_url: String,

    /// Bearer token used to attribute scores. Sessions without one are
    /// played but never submitted.
    token: Option<String>,

    /// SQLite file served by `serve`.
    db_path: String,

    /// Extra submission attempts after the first failure.
    submit_retries: u32,

    /// Wait between submission attempts, in milliseconds.
    retry_backoff_ms: u64,

    /// Delay before the turn-based opponent replies, in milliseconds.
    reply_delay_ms: u64,

    /// Sleep between ticks and replies. Disabled for tests and fast demos.
    pacing: bool,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:3000".to_string(),
            token: None,
            db_path: "rewind_arcade.db".to_string(),
            submit_retries: 2,
            retry_backoff_ms: 250,
            reply_delay_ms: 500,
            pacing: true,
        }
    }
}

impl ArcadeConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(gateway_url = %config.gateway_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file when given (and present), then applies environment
    /// overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                debug!(path = %path.display(), "Config file absent, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Applies overrides looked up through `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var(ENV_GATEWAY_URL).filter(|v| !v.trim().is_empty()) {
            debug!(gateway_url = %url, "Gateway URL from environment");
            self.gateway_url = url;
        }
        if let Some(token) = var(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            debug!("Token from environment");
            self.token = Some(token);
        }
        if let Some(path) = var(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.db_path = path;
        }
        self
    }

    /// Replaces the gateway URL.
    pub fn set_gateway_url(&mut self, url: impl Into<String>) {
        self.gateway_url = url.into();
    }

    /// Replaces the bearer token.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Turns pacing on or off.
    pub fn set_pacing(&mut self, pacing: bool) {
        self.pacing = pacing;
    }

    /// Wait between submission attempts.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Delay before the opponent replies.
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
