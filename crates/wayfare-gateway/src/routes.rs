//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::guard::access_guard;
use crate::handlers::{admin, auth, bookings, cities, experiences, health, uploads};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Health
/// - `GET /api/health` - Liveness
/// - `GET /api/health/ready` - Readiness (downstream reachable)
///
/// ## Public site
/// - `GET /api/cities` - List cities
/// - `GET /api/cities/:slug` - City by slug
/// - `GET /api/cities/:slug/experiences` - Experiences in a city
/// - `GET /api/experiences` - Browse experiences
/// - `POST /api/experiences` - Submit an experience (authenticated)
/// - `GET /api/experiences/:id` - Experience detail
/// - `POST /api/auth/login` - Sign in, sets the session cookie
/// - `POST /api/auth/register` - Create an account
/// - `POST /api/auth/logout` - Clear the session cookie
/// - `GET /api/auth/me` - Current user (authenticated)
/// - `GET /api/bookings` - Own bookings (authenticated)
/// - `POST /api/bookings` - Book (authenticated)
/// - `PATCH /api/bookings/:id/cancel` - Cancel (authenticated)
/// - `POST /api/uploads` - Multipart image upload (authenticated)
///
/// ## Admin console (authenticated)
/// - `POST /api/admin/auth/login` - Sign in, sets the session cookie
/// - `GET /api/admin/stats` - Dashboard counters
/// - `GET /api/admin/experiences/pending` - Moderation queue
/// - `PATCH /api/experiences/:id/approve` - Publish
/// - `PATCH /api/experiences/:id/reject` - Reject
/// - `GET /api/admin/users` - List users
/// - `PATCH /api/admin/users/:id/role` - Change role
/// - `DELETE /api/admin/users/:id` - Delete user
/// - `GET /api/admin/finance/transactions` - Finance ledger
///
/// Every request passes the Access Guard first. Unknown paths answer a
/// JSON 404.
pub fn create_router(state: GatewayState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let cors = build_cors_layer(&cors_origins);
    let state = Arc::new(state);

    Router::new()
        // Health
        .route("/api/health", get(health::health))
        .route("/api/health/ready", get(health::ready))
        // Cities
        .route("/api/cities", get(cities::list_cities))
        .route("/api/cities/:slug", get(cities::get_city))
        .route("/api/cities/:slug/experiences", get(cities::city_experiences))
        // Experiences
        .route(
            "/api/experiences",
            get(experiences::list_experiences).post(experiences::create_experience),
        )
        .route("/api/experiences/:id", get(experiences::get_experience))
        .route(
            "/api/experiences/:id/approve",
            patch(admin::approve_experience),
        )
        .route("/api/experiences/:id/reject", patch(admin::reject_experience))
        // Sessions
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Bookings
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/api/bookings/:id/cancel", patch(bookings::cancel_booking))
        // Uploads
        .route("/api/uploads", post(uploads::upload))
        // Admin console
        .route("/api/admin/auth/login", post(auth::admin_login))
        .route("/api/admin/stats", get(admin::stats))
        .route(
            "/api/admin/experiences/pending",
            get(admin::pending_experiences),
        )
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:id", delete(admin::delete_user))
        .route("/api/admin/users/:id/role", patch(admin::update_user_role))
        .route(
            "/api/admin/finance/transactions",
            get(admin::transactions),
        )
        .fallback(not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            access_guard,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(envelope_edge_rejections))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// The body limit and timeout layers answer 413 and 408 on their own, with
/// plain-text or empty bodies. Give those the JSON envelope too.
async fn envelope_edge_rejections(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        StatusCode::REQUEST_TIMEOUT => {
            tracing::warn!("Request exceeded the gateway timeout");
            ApiError::internal("Upstream service timed out").into_response()
        }
        _ => response,
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
