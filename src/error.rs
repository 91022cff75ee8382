//! Error types for remote generation and response handling.

use crate::text::ExtractionError;
use std::time::Duration;

/// Errors that can occur while generating or post-processing content.
#[derive(Debug, thiserror::Error)]
pub enum IaGenError {
    /// Credentials missing, invalid, or no backend configured.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit or quota exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// A request exceeded the client timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Billing is not enabled for the project or key.
    #[error("billing error: {0}")]
    Billing(String),

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters or input data.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream answered, but not with anything usable.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Input bytes are not in the expected encoding (e.g. a non-UTF-8 CSV).
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading a CSV or saving a creative).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No parseable JSON in an upstream text response.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Image decoding or encoding error.
    #[cfg(feature = "creative")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl IaGenError {
    /// Returns true if this error is likely transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Network(_)
        )
    }

    /// Returns the suggested retry delay, if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            Self::Timeout(_) => Some(Duration::from_secs(1)),
            Self::Network(_) => Some(Duration::from_secs(2)),
            _ => None,
        }
    }
}

/// Result type alias for iagen operations.
pub type Result<T> = std::result::Result<T, IaGenError>;

/// Upper bound on error text carried into `IaGenError` messages.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Reads a `Retry-After` header expressed in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Prepares an upstream error body for display.
///
/// Prefers the `error.message` field of a Google-style JSON error body, redacts
/// anything that looks like an API key and bounds the length.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.trim().to_string());

    let redacted = message
        .split(' ')
        .map(|word| {
            if word.starts_with("AIza") && word.len() >= 30 {
                "[REDACTED]"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if redacted.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let cut: String = redacted.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{cut}...")
    } else {
        redacted
    }
}
