//! HTTP client for the downstream API.
//!
//! [`UpstreamClient`] owns a pooled `reqwest::Client` and the resolved base
//! URL. Each downstream request is described by a [`Call`], built fresh per
//! inbound request and consumed by [`Call::send`].

use std::fmt;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use wayfare_auth::Credential;

use crate::error::{Result, UpstreamError};

/// Default downstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for downstream requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the downstream API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client for `base_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `Client` if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The downstream base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start describing a call to `path` (relative to the base URL).
    #[must_use]
    pub fn call(&self, method: Method, path: &str) -> Call<'_> {
        Call {
            client: self,
            method,
            path: path.to_string(),
            segments: Vec::new(),
            query: Vec::new(),
            authorization: None,
            payload: Payload::Empty,
        }
    }

    /// Shorthand for a `GET` call.
    #[must_use]
    pub fn get(&self, path: &str) -> Call<'_> {
        self.call(Method::GET, path)
    }
}

/// Body of a downstream request.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// JSON body, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Opaque body forwarded byte for byte under the caller's content type
    /// (multipart uploads keep their boundary this way).
    Raw {
        /// The inbound `Content-Type`, boundary included.
        content_type: HeaderValue,
        /// The inbound body.
        body: Bytes,
    },
}

/// A single downstream request under construction.
pub struct Call<'a> {
    client: &'a UpstreamClient,
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    authorization: Option<String>,
    payload: Payload,
}

impl fmt::Debug for Call<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("segments", &self.segments)
            .field("query", &self.query)
            .field("authorized", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}

impl Call<'_> {
    /// Append a path segment. The segment is percent-encoded, so a `/`
    /// inside it cannot escape into another path.
    #[must_use]
    pub fn segment(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Authenticate the call with the client's credential.
    #[must_use]
    pub fn bearer(mut self, credential: &Credential) -> Self {
        self.authorization = Some(credential.authorization_value());
        self
    }

    /// Authenticate the call if a credential is present.
    #[must_use]
    pub fn bearer_opt(self, credential: Option<&Credential>) -> Self {
        match credential {
            Some(credential) => self.bearer(credential),
            None => self,
        }
    }

    /// Send `body` as JSON.
    #[must_use]
    pub fn json(self, body: serde_json::Value) -> Self {
        self.payload(Payload::Json(body))
    }

    /// Set the request body.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// The HTTP method of this call.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Build the full downstream URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the base URL and path do not form a URL.
    pub fn url(&self) -> Result<Url> {
        let raw = format!("{}{}", self.client.base_url, self.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| UpstreamError::InvalidRequest(format!("{raw}: {e}")))?;

        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| UpstreamError::InvalidRequest(format!("{raw}: cannot be a base")))?
                .pop_if_empty()
                .extend(&self.segments);
        }

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        Ok(url)
    }

    /// Issue the call.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the URL or `Authorization` header is malformed
    /// - `Unreachable` if the downstream cannot be reached or times out
    /// - `Status` if the downstream answers with a non-2xx status
    pub async fn send(self) -> Result<Reply> {
        let url = self.url()?;
        let method = self.method.clone();

        let mut request = self.client.client.request(method.clone(), url.clone());

        if let Some(authorization) = &self.authorization {
            let value = HeaderValue::from_str(authorization).map_err(|_| {
                UpstreamError::InvalidRequest("credential is not a valid header value".into())
            })?;
            request = request.header(AUTHORIZATION, value);
        }

        request = match self.payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Raw { content_type, body } => {
                request.header(CONTENT_TYPE, content_type).body(body)
            }
        };

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::error!(
                method = %method,
                path = %url.path(),
                error = %e,
                "Upstream request failed"
            );
            UpstreamError::Unreachable(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(UpstreamError::Unreachable)?;

        tracing::debug!(
            method = %method,
            path = %url.path(),
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Upstream responded"
        );

        if status.is_success() {
            Ok(Reply { body })
        } else {
            let message = error_message(status, &body);
            tracing::warn!(
                method = %method,
                path = %url.path(),
                status = status.as_u16(),
                error = %message,
                "Upstream returned an error"
            );
            Err(UpstreamError::Status { status, message })
        }
    }

    /// Issue the call and decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Call::send`] returns, plus `Decode` if the body does not
    /// match `T`.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T> {
        self.send().await?.json()
    }
}

/// A successful downstream answer.
#[derive(Debug, Clone)]
pub struct Reply {
    body: Bytes,
}

impl Reply {
    /// Decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the body is empty or does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Err(UpstreamError::Decode("empty body".to_string()));
        }
        serde_json::from_slice(&self.body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Best description of a downstream failure: its `message` or `error`
/// string, else a generic status line.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("upstream returned status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wayfare_auth::CredentialSource;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_is_trimmed() {
        assert_eq!(client("http://api:5000/").base_url(), "http://api:5000");
    }

    #[test]
    fn url_encodes_segments_and_query() {
        let client = client("http://api:5000");
        let url = client
            .get("/api/cities/slug")
            .segment("rio de/janeiro")
            .query("limit", "6")
            .query("search", "a&b")
            .url()
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://api:5000/api/cities/slug/rio%20de%2Fjaneiro?limit=6&search=a%26b"
        );
    }

    #[test]
    fn url_without_query_has_no_question_mark() {
        let url = client("http://api:5000")
            .call(Method::PATCH, "/api/experiences")
            .segment(42)
            .segment("approve")
            .url()
            .unwrap();
        assert_eq!(url.as_str(), "http://api:5000/api/experiences/42/approve");
    }

    #[test]
    fn error_message_prefers_downstream_text() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, br#"{"success":false,"message":"Email taken"}"#),
            "Email taken"
        );
        assert_eq!(error_message(status, br#"{"error":"nope"}"#), "nope");
        assert_eq!(
            error_message(status, b"<html>"),
            "upstream returned status 400 Bad Request"
        );
    }

    #[tokio::test]
    async fn sends_json_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bookings"))
            .and(header("authorization", "Bearer T"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "experienceId": 42, "guests": 2 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = Credential::new("T", CredentialSource::Header).unwrap();
        let reply = client(&server.uri())
            .call(Method::POST, "/api/bookings")
            .bearer(&credential)
            .json(json!({ "experienceId": 42, "guests": 2 }))
            .send()
            .await
            .unwrap();

        assert_eq!(reply.json::<serde_json::Value>().unwrap()["ok"], true);
    }

    #[tokio::test]
    async fn raw_payload_keeps_content_type() {
        let server = MockServer::start().await;
        let content_type = "multipart/form-data; boundary=----wayfare1234";
        Mock::given(method("POST"))
            .and(path("/api/uploads"))
            .and(header("content-type", content_type))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let body = Bytes::from_static(b"------wayfare1234\r\n\r\nhello\r\n------wayfare1234--\r\n");
        client(&server.uri())
            .call(Method::POST, "/api/uploads")
            .payload(Payload::Raw {
                content_type: HeaderValue::from_static(content_type),
                body: body.clone(),
            })
            .send()
            .await
            .unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received[0].body, body.to_vec());
    }

    #[tokio::test]
    async fn non_success_becomes_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/experiences/9"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Experience not found" })),
            )
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .get("/api/experiences")
            .segment(9)
            .send()
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Experience not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_decodes_declared_schema() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cities"))
            .and(query_param("limit", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": [] })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .get("/api/cities")
            .query("limit", "6")
            .fetch::<wayfare_core::models::CityList>()
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_downstream() {
        let err = client("http://127.0.0.1:1")
            .get("/api/cities")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Unreachable(_)));
        assert!(err.is_retriable());
    }
}
