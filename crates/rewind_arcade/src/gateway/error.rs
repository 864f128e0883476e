//! Gateway client errors.

use derive_more::Display;

/// Why a gateway call failed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GatewayError {
    /// No session token, or the gateway rejected it.
    #[display("Unauthorized: {}", _0)]
    Unauthorized(String),

    /// The gateway refused the request (4xx other than 401).
    #[display("Rejected ({}): {}", status, message)]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Message from the `{message}` body.
        message: String,
    },

    /// The gateway failed (5xx).
    #[display("Gateway failure ({}): {}", status, message)]
    Server {
        /// HTTP status.
        status: u16,
        /// Message from the `{message}` body.
        message: String,
    },

    /// The request never produced a response.
    #[display("Transport error: {}", _0)]
    Transport(String),

    /// The response body did not have the expected shape.
    #[display("Malformed response: {}", _0)]
    Decode(String),
}

impl std::error::Error for GatewayError {}

impl GatewayError {
    /// Maps a non-success status and its message body to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => GatewayError::Unauthorized(message),
            500.. => GatewayError::Server { status, message },
            _ => GatewayError::Rejected { status, message },
        }
    }

    /// Whether trying again could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Server { .. } | GatewayError::Transport(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}
