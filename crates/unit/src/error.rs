//! Error types for the Unit adapter.

use nestegg_core::errors::GatewayError;
use thiserror::Error;

/// Result type alias for Unit adapter operations.
pub type Result<T> = std::result::Result<T, UnitError>;

#[derive(Debug, Error)]
pub enum UnitError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the Unit API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request could not be built (bad token, bad input)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Webhook body could not be turned into events
    #[error("Invalid webhook: {0}")]
    InvalidWebhook(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UnitError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<UnitError> for nestegg_core::Error {
    fn from(err: UnitError) -> Self {
        let gateway = match err {
            UnitError::Http(e) => GatewayError::Transport(e.to_string()),
            UnitError::Json(e) => GatewayError::MalformedResponse(e.to_string()),
            UnitError::Api { status, message } => GatewayError::Api { status, message },
            UnitError::InvalidRequest(m) | UnitError::Config(m) => GatewayError::Rejected(m),
            UnitError::InvalidWebhook(m) => GatewayError::MalformedResponse(m),
        };
        nestegg_core::Error::Gateway(gateway)
    }
}
