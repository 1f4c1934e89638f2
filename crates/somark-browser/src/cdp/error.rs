//! Errors raised while talking to Chrome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    /// Nothing answered on the DevTools HTTP endpoint.
    #[error("DevTools endpoint {endpoint} unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Cannot open DevTools socket: {0}")]
    Connect(String),

    #[error("DevTools socket error: {0}")]
    Transport(String),

    /// Chrome rejected a command.
    #[error("{method} failed: {message} ({code})")]
    Remote {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Malformed DevTools JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DevTools HTTP request failed: {0}")]
    Discovery(#[from] reqwest::Error),

    #[error("Cannot load {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// The evaluated expression threw.
    #[error("Page script threw: {0}")]
    Script(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// The socket went away before an answer arrived.
    #[error("DevTools session closed")]
    Closed,

    #[error("Unexpected DevTools reply: {0}")]
    Unexpected(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::Transport(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::Connect(format!("bad endpoint URL: {}", e))
    }
}

impl From<base64::DecodeError> for CdpError {
    fn from(e: base64::DecodeError) -> Self {
        CdpError::Unexpected(format!("screenshot is not base64: {}", e))
    }
}
