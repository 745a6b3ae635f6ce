//! Session endpoints.
//!
//! Login and registration hand the downstream token to the browser twice:
//! in the envelope and in the session cookie.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use wayfare_core::models::{Session, SessionRecord, User, UserDetail};
use wayfare_core::{DownstreamEnvelope, Envelope};

use crate::dispatch::Route;
use crate::error::ApiError;
use crate::extract::{JsonBody, MaybeCredential};
use crate::state::GatewayState;

const LOGIN_FIELDS: &[&str] = &["email", "password"];
const REGISTER_FIELDS: &[&str] = &["name", "email", "password"];

/// Sign in to the public site.
///
/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<GatewayState>>,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let route = Route::post(&state, "/api/auth/login")
        .json(body)
        .require(LOGIN_FIELDS);
    open_session(&state, route, "Login successful", true).await
}

/// Sign in to the admin console.
///
/// `POST /api/admin/auth/login`
pub async fn admin_login(
    State(state): State<Arc<GatewayState>>,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let route = Route::post(&state, "/api/admin/auth/login")
        .json(body)
        .require(LOGIN_FIELDS);
    open_session(&state, route, "Login successful", true).await
}

/// Create an account. Signs the user in when the downstream returns a token.
///
/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<GatewayState>>,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let route = Route::post(&state, "/api/auth/register")
        .json(body)
        .require(REGISTER_FIELDS);
    open_session(&state, route, "Registration successful", false).await
}

/// Sign out: expire the session cookie. Nothing is sent downstream.
///
/// `POST /api/auth/logout`
pub async fn logout(State(state): State<Arc<GatewayState>>) -> Response {
    (
        [(SET_COOKIE, state.session_cookie.clear())],
        Json(Envelope::ack("Logged out successfully")),
    )
        .into_response()
}

/// The signed-in user.
///
/// `GET /api/auth/me`
pub async fn me(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
) -> Result<Json<Envelope<User>>, ApiError> {
    let detail: UserDetail = Route::get(&state, "/api/auth/me")
        .protected(credential)
        .fetch()
        .await?;
    Ok(Json(Envelope::data(User::from_record(detail.user, &state.media))))
}

async fn open_session(
    state: &GatewayState,
    route: Route<'_>,
    default_message: &str,
    token_required: bool,
) -> Result<Response, ApiError> {
    let reply: DownstreamEnvelope<SessionRecord> = route.fetch().await?;

    if !reply.success {
        return Err(ApiError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            message: reply.reason().unwrap_or("Invalid credentials").to_string(),
        });
    }

    let message = reply
        .message
        .clone()
        .unwrap_or_else(|| default_message.to_string());
    let session = reply
        .data
        .map(|record| Session::from_record(record, &state.media))
        .unwrap_or(Session {
            token: None,
            user: None,
        });

    let Some(token) = session.token.clone() else {
        if token_required {
            tracing::error!("Downstream login reply carried no token");
            return Err(ApiError::MalformedPayload(
                "Malformed response from upstream service".to_string(),
            ));
        }
        return Ok(Json(Envelope::data(session).with_message(message)).into_response());
    };

    let cookie = state.session_cookie.issue(&token)?;
    tracing::info!(cookie = state.cookie_name(), "Session opened");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(Envelope::data(session).with_message(message)),
    )
        .into_response())
}
