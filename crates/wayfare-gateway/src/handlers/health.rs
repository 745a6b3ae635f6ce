//! Health check endpoints.
//!
//! `/api/health` is a liveness probe and never looks at the downstream.
//! `/api/health/ready` reports whether the downstream answers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::GatewayState;

const SERVICE: &str = "wayfare-gateway";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// RFC 3339 time of the check.
    pub timestamp: String,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Deployment environment.
    pub environment: String,
    /// Downstream reachability, readiness probe only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downstream: Option<&'static str>,
}

impl HealthResponse {
    fn new(status: &'static str, state: &GatewayState) -> Self {
        Self {
            status,
            timestamp: Utc::now().to_rfc3339(),
            service: SERVICE,
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.environment.to_string(),
            downstream: None,
        }
    }
}

/// Liveness handler.
///
/// ```text
/// GET /api/health
///
/// Response: 200 OK
/// {
///   "status": "healthy",
///   "timestamp": "2024-05-01T12:00:00+00:00",
///   "service": "wayfare-gateway",
///   "version": "0.1.0",
///   "environment": "development"
/// }
/// ```
pub async fn health(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::new("healthy", &state)))
}

/// Readiness handler: 200 when the downstream health endpoint answers 2xx,
/// else 503.
pub async fn ready(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    match state.upstream.get("/api/health").send().await {
        Ok(_) => {
            let mut body = HealthResponse::new("ready", &state);
            body.downstream = Some("reachable");
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            let mut body = HealthResponse::new("unavailable", &state);
            body.downstream = Some("unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
