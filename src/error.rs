use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single question/answer round trip.
///
/// `Http` is a non-success status. The remaining variants are the
/// transport-or-parse family: the connection failed, the envelope could not be
/// decoded, or the background task never produced a result.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {status}")]
    Http { status: StatusCode },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ChatError {
    pub fn is_http(&self) -> bool {
        matches!(self, ChatError::Http { .. })
    }
}
