//! Generic downstream dispatch.
//!
//! Every route handler describes its downstream call with a [`Route`] and
//! lets it do the shared work, in this order:
//!
//! 1. enforce the route's [`Access`] level against the resolved credential
//! 2. parse the JSON body and check its required fields
//! 3. build the downstream URL (encoded path segments, forwarded and renamed
//!    query parameters)
//! 4. issue exactly one downstream call and decode the declared schema
//!
//! A failure in steps 1 or 2 returns before anything goes on the wire.

use std::fmt;

use axum::body::Bytes;
use axum::http::{HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use wayfare_auth::{AuthError, Credential};
use wayfare_upstream::{Call, Payload, Reply};

use crate::error::ApiError;
use crate::extract::{JsonBody, MaybeCredential, Params};
use crate::state::GatewayState;

/// Who may call a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    /// No credential needed; none is forwarded.
    #[default]
    Public,
    /// A credential is forwarded when present.
    Optional,
    /// A credential is required.
    Protected,
}

#[derive(Debug)]
enum Body {
    None,
    Json(JsonBody),
    OptionalJson(JsonBody),
    Multipart { content_type: HeaderValue, body: Bytes },
}

/// One downstream call, described declaratively.
#[derive(Debug)]
pub struct Route<'a> {
    state: &'a GatewayState,
    method: Method,
    path: &'static str,
    segments: Vec<String>,
    access: Access,
    credential: Option<Credential>,
    query: Vec<(String, String)>,
    required: &'static [&'static str],
    body: Body,
}

impl<'a> Route<'a> {
    /// Describe a call to `path` on the downstream API.
    #[must_use]
    pub fn new(state: &'a GatewayState, method: Method, path: &'static str) -> Self {
        Self {
            state,
            method,
            path,
            segments: Vec::new(),
            access: Access::Public,
            credential: None,
            query: Vec::new(),
            required: &[],
            body: Body::None,
        }
    }

    /// A `GET` call.
    #[must_use]
    pub fn get(state: &'a GatewayState, path: &'static str) -> Self {
        Self::new(state, Method::GET, path)
    }

    /// A `POST` call.
    #[must_use]
    pub fn post(state: &'a GatewayState, path: &'static str) -> Self {
        Self::new(state, Method::POST, path)
    }

    /// A `PATCH` call.
    #[must_use]
    pub fn patch(state: &'a GatewayState, path: &'static str) -> Self {
        Self::new(state, Method::PATCH, path)
    }

    /// A `DELETE` call.
    #[must_use]
    pub fn delete(state: &'a GatewayState, path: &'static str) -> Self {
        Self::new(state, Method::DELETE, path)
    }

    /// Append an encoded path segment.
    #[must_use]
    pub fn segment(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Forward the client's credential when it has one.
    #[must_use]
    pub fn optional(mut self, credential: MaybeCredential) -> Self {
        self.access = Access::Optional;
        self.credential = credential.0;
        self
    }

    /// Require a credential.
    #[must_use]
    pub fn protected(mut self, credential: MaybeCredential) -> Self {
        self.access = Access::Protected;
        self.credential = credential.0;
        self
    }

    /// Forward `keys` from the inbound query, in the order given.
    #[must_use]
    pub fn forward(mut self, params: &Params, keys: &[&str]) -> Self {
        for key in keys {
            if let Some(value) = params.get(key) {
                self.query.push(((*key).to_string(), value.to_string()));
            }
        }
        self
    }

    /// Forward inbound `from` as downstream `to`.
    #[must_use]
    pub fn rename(mut self, params: &Params, from: &str, to: &str) -> Self {
        if let Some(value) = params.get(from) {
            self.query.push((to.to_string(), value.to_string()));
        }
        self
    }

    /// Add a fixed query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Send `body` downstream as JSON, unchanged.
    #[must_use]
    pub fn json(mut self, body: JsonBody) -> Self {
        self.body = Body::Json(body);
        self
    }

    /// Like [`Route::json`], but an empty body is allowed and sends nothing.
    #[must_use]
    pub fn json_opt(mut self, body: JsonBody) -> Self {
        self.body = Body::OptionalJson(body);
        self
    }

    /// Fields the JSON body must carry (non-null, non-blank).
    #[must_use]
    pub fn require(mut self, fields: &'static [&'static str]) -> Self {
        self.required = fields;
        self
    }

    /// Forward a multipart body and its `Content-Type` byte for byte.
    #[must_use]
    pub fn multipart(mut self, content_type: HeaderValue, body: Bytes) -> Self {
        self.body = Body::Multipart { content_type, body };
        self
    }

    /// Check access and input, then build the downstream call.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the route is protected and no credential is present
    /// - `MalformedPayload` if the JSON body does not parse
    /// - `Validation` if the body is not an object or lacks a required field
    pub fn prepare(self) -> Result<Call<'a>, ApiError> {
        if self.access == Access::Protected && self.credential.is_none() {
            tracing::debug!(method = %self.method, path = self.path, "Rejecting call without credential");
            return Err(AuthError::MissingCredential.into());
        }

        let payload = match self.body {
            Body::None => Payload::Empty,
            Body::OptionalJson(body) if body.is_empty() => Payload::Empty,
            Body::Json(body) | Body::OptionalJson(body) => {
                let value = body.parse()?;
                check_required(&value, self.required)?;
                Payload::Json(value)
            }
            Body::Multipart { content_type, body } => Payload::Raw { content_type, body },
        };

        let credential = match self.access {
            Access::Public => None,
            Access::Optional | Access::Protected => self.credential.as_ref(),
        };

        let mut call = self
            .state
            .upstream
            .call(self.method, self.path)
            .bearer_opt(credential)
            .payload(payload);
        for segment in self.segments {
            call = call.segment(segment);
        }
        for (key, value) in self.query {
            call = call.query(key, value);
        }
        Ok(call)
    }

    /// Issue the call.
    ///
    /// # Errors
    ///
    /// Everything [`Route::prepare`] returns, plus the downstream failure
    /// translated into an [`ApiError`].
    pub async fn send(self) -> Result<Reply, ApiError> {
        let call = self.prepare()?;
        Ok(call.send().await?)
    }

    /// Issue the call and decode the declared downstream schema.
    ///
    /// # Errors
    ///
    /// As [`Route::send`]; a body that does not match `T` is
    /// `MalformedPayload`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let call = self.prepare()?;
        Ok(call.fetch::<T>().await?)
    }
}

fn check_required(body: &Value, required: &[&str]) -> Result<(), ApiError> {
    if required.is_empty() {
        return Ok(());
    }

    let object = body
        .as_object()
        .ok_or_else(|| ApiError::Validation("Request body must be a JSON object".into()))?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|field| match object.get(*field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wayfare_auth::CredentialSource;
    use wayfare_upstream::UpstreamClient;

    use super::*;
    use crate::config::GatewayConfig;

    fn state() -> GatewayState {
        let upstream = UpstreamClient::new("http://api:5000", Duration::from_secs(5)).unwrap();
        GatewayState::with_upstream(GatewayConfig::default(), upstream)
    }

    fn credential() -> MaybeCredential {
        MaybeCredential(Credential::new("T", CredentialSource::Header))
    }

    fn body(value: &Value) -> JsonBody {
        JsonBody::new(Bytes::from(serde_json::to_vec(value).unwrap()))
    }

    #[test]
    fn protected_route_needs_credential() {
        let state = state();
        let err = Route::patch(&state, "/api/experiences")
            .segment(42)
            .segment("approve")
            .protected(MaybeCredential::default())
            .prepare()
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn auth_is_checked_before_body() {
        let state = state();
        let err = Route::post(&state, "/api/bookings")
            .protected(MaybeCredential::default())
            .json(JsonBody::new(Bytes::from_static(b"not json")))
            .prepare()
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn missing_fields_are_listed() {
        let state = state();
        let err = Route::post(&state, "/api/auth/login")
            .json(body(&json!({ "email": "a@b.c", "password": "  " })))
            .require(&["email", "password"])
            .prepare()
            .unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, "Missing required fields: password"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_object_body_fails_validation() {
        let state = state();
        let err = Route::post(&state, "/api/auth/login")
            .json(body(&json!(["a@b.c"])))
            .require(&["email"])
            .prepare()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn query_is_forwarded_and_renamed_in_order() {
        let state = state();
        let params = Params::parse("city=bali&q=surf&limit=6&ignored=1&page=2");
        let call = Route::get(&state, "/api/experiences")
            .optional(credential())
            .forward(&params, &["page", "limit", "category"])
            .rename(&params, "q", "search")
            .rename(&params, "city", "citySlug")
            .prepare()
            .unwrap();
        assert_eq!(
            call.url().unwrap().as_str(),
            "http://api:5000/api/experiences?page=2&limit=6&search=surf&citySlug=bali"
        );
    }

    #[test]
    fn optional_json_may_be_empty() {
        let state = state();
        let call = Route::patch(&state, "/api/experiences")
            .segment(7)
            .segment("reject")
            .protected(credential())
            .json_opt(JsonBody::default())
            .prepare();
        assert!(call.is_ok());
    }

    #[test]
    fn path_segments_are_encoded() {
        let state = state();
        let call = Route::get(&state, "/api/cities/slug")
            .segment("../admin")
            .prepare()
            .unwrap();
        assert_eq!(call.url().unwrap().path(), "/api/cities/slug/..%2Fadmin");
    }
}
