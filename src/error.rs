//! Error type and helpers for mapping HTTP/reqwest failures.

use std::time::Duration;

/// Errors from Ollama client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Retryable errors
    /// Network-level error (connection refused, reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Server is temporarily unavailable (5xx).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Terminal errors
    /// Requested model does not exist on the server.
    #[error("model not found: {0}")]
    ModelNotFound(String),
    /// Malformed or invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Transport error while reading an in-flight response stream.
    ///
    /// Per-line decode errors never surface here; malformed lines are
    /// skipped inside the NDJSON decoder.
    #[error("stream error: {0}")]
    Stream(String),

    /// The in-flight generation was cancelled by the caller.
    ///
    /// Distinct from failure: the caller typically annotates the partial
    /// output rather than reporting an error.
    #[error("cancelled")]
    Cancelled,
}

impl ClientError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::ServiceUnavailable(_)
        )
    }

    /// Whether this outcome is a user-initiated cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Map an HTTP status code (from the Ollama API) to a [`ClientError`].
///
/// Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md>
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ClientError {
    match status.as_u16() {
        404 => ClientError::ModelNotFound(body.to_string()),
        400 => ClientError::InvalidRequest(body.to_string()),
        500..=599 => ClientError::ServiceUnavailable(body.to_string()),
        _ => ClientError::InvalidRequest(format!("HTTP {status}: {body}")),
    }
}

/// Map a [`reqwest::Error`] to a [`ClientError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(Duration::from_secs(30))
    } else {
        ClientError::Network(Box::new(err))
    }
}
