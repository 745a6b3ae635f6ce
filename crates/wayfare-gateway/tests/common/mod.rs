//! Shared helpers for router tests.

#![allow(dead_code)]

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use wiremock::MockServer;

use wayfare_gateway::{create_router, GatewayConfig, GatewayState};
use wayfare_upstream::BackendAddresses;

/// Image service base used by every test gateway.
pub const IMAGES: &str = "http://images.test";

/// A gateway whose downstream is `api`.
pub fn gateway_for(api: &str) -> TestServer {
    gateway_with(api, |_| {})
}

/// A gateway whose downstream is `api`, with `configure` applied on top of
/// the defaults.
pub fn gateway_with(api: &str, configure: impl FnOnce(&mut GatewayConfig)) -> TestServer {
    let mut config = GatewayConfig {
        addresses: BackendAddresses {
            api: api.to_string(),
            images: IMAGES.to_string(),
        },
        ..GatewayConfig::default()
    };
    configure(&mut config);
    let state = GatewayState::new(config).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

/// A gateway in front of a fresh mock downstream.
pub async fn gateway() -> (TestServer, MockServer) {
    let downstream = MockServer::start().await;
    let server = gateway_for(&downstream.uri());
    (server, downstream)
}

/// A gateway whose downstream refuses connections.
pub fn gateway_unreachable() -> TestServer {
    gateway_for("http://127.0.0.1:1")
}

/// `Authorization: Bearer <token>`.
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

/// `Cookie: admin_token=<token>`.
pub fn session_cookie(token: &str) -> (HeaderName, HeaderValue) {
    (
        COOKIE,
        HeaderValue::from_str(&format!("admin_token={token}")).unwrap(),
    )
}
