use thiserror::Error;
use trendsense_core::{BlankField, Platform};

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("{platform} returned unexpected HTTP status {status}")]
    UnexpectedStatus { platform: Platform, status: u16 },

    #[error("{platform} response did not match the expected shape: {source}")]
    Shape {
        platform: Platform,
        #[source]
        source: serde_json::Error,
    },

    #[error("{platform} authentication failed: {reason}")]
    Auth { platform: Platform, reason: String },

    #[error("{platform} API error: {reason}")]
    Api { platform: Platform, reason: String },

    #[error("analyst error: {0}")]
    Analyst(String),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] BlankField),
}

/// Query strings can carry access tokens, so the request URL is dropped
/// before the error can reach a log line.
impl From<reqwest::Error> for SignalError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}
