//! API error types and responses.
//!
//! Every failure a route can hit ends up here and is rendered as a JSON
//! envelope: `{ "success": false, "error": <code>, "message": <text> }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use wayfare_auth::AuthError;
use wayfare_core::Envelope;
use wayfare_upstream::UpstreamError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Protected route called without a credential.
    #[error("Authentication required")]
    Unauthorized,

    /// Missing or ill-typed input.
    #[error("{0}")]
    Validation(String),

    /// The downstream has no such resource.
    #[error("{0}")]
    NotFound(String),

    /// The downstream failed or could not be reached.
    #[error("{message}")]
    Upstream {
        /// Status to answer with: the downstream's when it answered, else 500.
        status: StatusCode,
        /// Description for the client.
        message: String,
    },

    /// A JSON body (inbound or downstream) could not be parsed.
    #[error("{0}")]
    MalformedPayload(String),

    /// The inbound body exceeds the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { status, .. } => *status,
            Self::MalformedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Upstream { .. } => "upstream_error",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::PayloadTooLarge => "payload_too_large",
        }
    }

    /// A 500 upstream error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Envelope::failure(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, message } if status == StatusCode::NOT_FOUND => {
                Self::NotFound(message)
            }
            UpstreamError::Status { status, message } => {
                // Only error statuses may be mirrored.
                let status = if status.is_client_error() || status.is_server_error() {
                    status
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                Self::Upstream { status, message }
            }
            UpstreamError::Decode(detail) => {
                tracing::error!(error = %detail, "Downstream payload did not match its schema");
                Self::MalformedPayload("Malformed response from upstream service".to_string())
            }
            UpstreamError::Unreachable(e) => {
                tracing::error!(error = %e, "Downstream unreachable");
                Self::internal("Upstream service unavailable")
            }
            UpstreamError::Cancelled => Self::internal("Request cancelled"),
            UpstreamError::InvalidRequest(msg) | UpstreamError::Client(msg) => {
                tracing::error!(error = %msg, "Could not build downstream request");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => Self::Unauthorized,
            AuthError::InvalidCookieValue => {
                tracing::error!(error = %err, "Session token cannot be stored in a cookie");
                Self::internal("Could not establish session")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: StatusCode) -> UpstreamError {
        UpstreamError::Status {
            status: code,
            message: "downstream says no".into(),
        }
    }

    #[test]
    fn error_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Validation("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MalformedPayload("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes() {
        assert_eq!(ApiError::Unauthorized.code(), "unauthorized");
        assert_eq!(ApiError::Validation("x".into()).code(), "validation_error");
        assert_eq!(ApiError::internal("x").code(), "upstream_error");
    }

    #[test]
    fn downstream_statuses_are_mirrored() {
        assert!(matches!(
            ApiError::from(status(StatusCode::NOT_FOUND)),
            ApiError::NotFound(_)
        ));
        assert_eq!(
            ApiError::from(status(StatusCode::CONFLICT)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(status(StatusCode::UNAUTHORIZED)).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(status(StatusCode::BAD_GATEWAY)).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(status(StatusCode::FOUND)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn decode_failure_is_malformed_payload() {
        let err = ApiError::from(UpstreamError::Decode("missing field `cities`".into()));
        assert_eq!(err.code(), "malformed_payload");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_credential_is_unauthorized() {
        let err = ApiError::from(AuthError::MissingCredential);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
