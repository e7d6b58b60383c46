//! Errors raised while talking to the inference service.

use std::time::Duration;

use thiserror::Error;

/// Errors emitted by inference backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InferenceError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("inference service returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    /// No response, or no further chunk, arrived within the configured timeout.
    #[error("inference service did not respond within {0:?}")]
    Timeout(Duration),
    /// The service replied with an `error` field instead of text.
    #[error("inference service reported an error: {0}")]
    Upstream(String),
    /// The reply could not be decoded into the expected shape.
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),
    /// Quiz generation output had no `[...]` span to parse.
    #[error("model output contains no JSON array")]
    MissingJsonArray,
}
