use std::time::Duration;

use thiserror::Error;

/// Failure of an external analysis call.
///
/// Never fatal to a pipeline run: each stage converts it into an empty or
/// placeholder value at its own boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    #[error("quota exhausted or rate limited")]
    Quota,

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gcp")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "gcp")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
