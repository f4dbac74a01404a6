//! Refresh errors

use thiserror::Error;

/// Why a refresh cycle was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request could not be sent, or timed out
    #[error("network error: {0}")]
    Network(String),
    /// Price API answered with a non-success status
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Body was not valid JSON, or a requested asset was missing or malformed
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    /// Stable label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Http { .. } => "http",
            FetchError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Network(format!("request timed out: {}", e))
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}
