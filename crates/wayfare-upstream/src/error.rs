//! Error types for downstream calls.

use reqwest::StatusCode;
use thiserror::Error;

/// A result type using `UpstreamError`.
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors that can occur while calling the downstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The downstream request could not be built (bad URL or header).
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    /// The downstream could not be reached, timed out, or dropped the body.
    #[error("upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The downstream answered with a non-2xx status.
    #[error("upstream returned {status}: {message}")]
    Status {
        /// Downstream status.
        status: StatusCode,
        /// Downstream `message`/`error` text, or a generic description.
        message: String,
    },

    /// The downstream body did not match the declared schema.
    #[error("malformed upstream payload: {0}")]
    Decode(String),

    /// The caller cancelled the call.
    #[error("upstream call cancelled")]
    Cancelled,

    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(String),
}

impl UpstreamError {
    /// The downstream status, when the downstream answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    ///
    /// Network failures and 5xx answers are retriable; 4xx answers and
    /// schema mismatches are not.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            Self::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
