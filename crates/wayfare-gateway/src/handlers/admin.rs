//! Admin console endpoints: dashboard, moderation, users and finance.
//!
//! All of them are protected. Whether the caller is actually an admin is
//! the downstream's decision.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use wayfare_core::models::{
    DashboardStats, Experience, ExperienceList, StatsRecord, Transaction, TransactionList, User,
    UserDetail, UserList,
};
use wayfare_core::Envelope;

use crate::dispatch::Route;
use crate::error::ApiError;
use crate::extract::{JsonBody, MaybeCredential, Params, PathParam};
use crate::handlers::experiences::listing;
use crate::state::GatewayState;

/// Dashboard counters.
///
/// `GET /api/admin/stats`
pub async fn stats(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
) -> Result<Json<Envelope<DashboardStats>>, ApiError> {
    let record: StatsRecord = Route::get(&state, "/api/admin/stats")
        .protected(credential)
        .fetch()
        .await?;
    Ok(Json(Envelope::data(DashboardStats::from(record))))
}

/// Experiences awaiting moderation.
///
/// `GET /api/admin/experiences/pending?page&limit`
pub async fn pending_experiences(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    params: Params,
) -> Result<Json<Envelope<Vec<Experience>>>, ApiError> {
    let list: ExperienceList = Route::get(&state, "/api/admin/experiences/pending")
        .protected(credential)
        .forward(&params, &["page", "limit"])
        .fetch()
        .await?;
    Ok(Json(listing(&state, list)))
}

/// Publish an experience.
///
/// `PATCH /api/experiences/:id/approve`
pub async fn approve_experience(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    PathParam(id): PathParam,
) -> Result<Json<Envelope<()>>, ApiError> {
    Route::patch(&state, "/api/experiences")
        .segment(&id)
        .segment("approve")
        .protected(credential)
        .send()
        .await?;

    tracing::info!(experience_id = %id, "Experience approved");
    Ok(Json(Envelope::ack(
        "Experience approved and published successfully",
    )))
}

/// Turn an experience down, with an optional `reason`.
///
/// `PATCH /api/experiences/:id/reject`
pub async fn reject_experience(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    PathParam(id): PathParam,
    body: JsonBody,
) -> Result<Json<Envelope<()>>, ApiError> {
    Route::patch(&state, "/api/experiences")
        .segment(&id)
        .segment("reject")
        .protected(credential)
        .json_opt(body)
        .send()
        .await?;

    tracing::info!(experience_id = %id, "Experience rejected");
    Ok(Json(Envelope::ack("Experience rejected")))
}

/// Users, filtered by role or search text.
///
/// `GET /api/admin/users?page&limit&role&q`
pub async fn list_users(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    params: Params,
) -> Result<Json<Envelope<Vec<User>>>, ApiError> {
    let list: UserList = Route::get(&state, "/api/admin/users")
        .protected(credential)
        .forward(&params, &["page", "limit", "role"])
        .rename(&params, "q", "search")
        .fetch()
        .await?;

    let users = list
        .users
        .into_iter()
        .map(|record| User::from_record(record, &state.media))
        .collect();
    Ok(Json(Envelope::data(users).with_pagination(list.pagination)))
}

/// Change a user's role.
///
/// `PATCH /api/admin/users/:id/role`
pub async fn update_user_role(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    PathParam(id): PathParam,
    body: JsonBody,
) -> Result<Json<Envelope<User>>, ApiError> {
    let detail: UserDetail = Route::patch(&state, "/api/admin/users")
        .segment(&id)
        .segment("role")
        .protected(credential)
        .json(body)
        .require(&["role"])
        .fetch()
        .await?;

    Ok(Json(
        Envelope::data(User::from_record(detail.user, &state.media))
            .with_message("User role updated successfully"),
    ))
}

/// Delete a user.
///
/// `DELETE /api/admin/users/:id`
pub async fn delete_user(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    PathParam(id): PathParam,
) -> Result<Json<Envelope<()>>, ApiError> {
    Route::delete(&state, "/api/admin/users")
        .segment(&id)
        .protected(credential)
        .send()
        .await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(Envelope::ack("User deleted successfully")))
}

/// Finance ledger.
///
/// `GET /api/admin/finance/transactions?page&limit&from&to&status`
pub async fn transactions(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    params: Params,
) -> Result<Json<Envelope<Vec<Transaction>>>, ApiError> {
    let list: TransactionList = Route::get(&state, "/api/admin/finance/transactions")
        .protected(credential)
        .forward(&params, &["page", "limit", "from", "to", "status"])
        .fetch()
        .await?;

    let transactions = list.transactions.into_iter().map(Transaction::from).collect();
    Ok(Json(
        Envelope::data(transactions).with_pagination(list.pagination),
    ))
}
