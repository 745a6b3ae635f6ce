//! Request extractors.
//!
//! Every extractor here rejects with [`ApiError`], so a malformed request
//! still gets the JSON envelope rather than axum's plain-text rejection.

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use serde_json::Value;

use wayfare_auth::{resolve_credential, Credential};

use crate::error::ApiError;
use crate::state::GatewayState;

/// The request credential, if the client presented one.
///
/// Never rejects: whether a credential is required is decided by the route.
#[derive(Debug, Clone, Default)]
pub struct MaybeCredential(pub Option<Credential>);

#[async_trait]
impl FromRequestParts<Arc<GatewayState>> for MaybeCredential {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_credential(&parts.headers, state.cookie_name())))
    }
}

/// Query parameters in the order the client sent them.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Parse a raw query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    /// First non-blank value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .find(|v| !v.trim().is_empty())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Params {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}

/// A single path parameter.
#[derive(Debug, Clone)]
pub struct PathParam(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PathParam {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        if value.trim().is_empty() {
            return Err(ApiError::Validation("Path parameter must not be empty".into()));
        }
        Ok(Self(value))
    }
}

/// The raw inbound body.
#[derive(Debug, Clone, Default)]
pub struct RawBody(pub Bytes);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for RawBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ApiError::MalformedPayload(rejection.body_text())
            }
        })?;
        Ok(Self(bytes))
    }
}

/// An inbound JSON body, read but not yet parsed.
///
/// Parsing is deferred so a protected route answers 401 before it ever
/// looks at the body.
#[derive(Debug, Clone, Default)]
pub struct JsonBody(Bytes);

impl JsonBody {
    /// Wrap raw bytes.
    #[must_use]
    pub const fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    /// True when the client sent no body (or only whitespace).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(u8::is_ascii_whitespace)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` if the body is empty or not valid JSON.
    pub fn parse(&self) -> Result<Value, ApiError> {
        if self.is_empty() {
            return Err(ApiError::MalformedPayload("Request body is empty".into()));
        }
        serde_json::from_slice(&self.0).map_err(|e| {
            tracing::debug!(error = %e, "Inbound body is not valid JSON");
            ApiError::MalformedPayload("Request body is not valid JSON".into())
        })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let RawBody(bytes) = RawBody::from_request(req, state).await?;
        Ok(Self(bytes))
    }
}
