//! Experience endpoints of the public site.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use wayfare_core::models::{Experience, ExperienceDetail, ExperienceList};
use wayfare_core::Envelope;

use crate::dispatch::Route;
use crate::error::ApiError;
use crate::extract::{JsonBody, MaybeCredential, Params, PathParam};
use crate::state::GatewayState;

/// Fields a new listing must carry.
pub const CREATE_FIELDS: &[&str] = &["title", "cityId", "price"];

/// Browse experiences.
///
/// `GET /api/experiences?page&limit&category&status&q&city`
///
/// `q` is sent downstream as `search` and `city` as `citySlug`.
pub async fn list_experiences(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    params: Params,
) -> Result<Json<Envelope<Vec<Experience>>>, ApiError> {
    let list: ExperienceList = Route::get(&state, "/api/experiences")
        .optional(credential)
        .forward(&params, &["page", "limit", "category", "status"])
        .rename(&params, "q", "search")
        .rename(&params, "city", "citySlug")
        .fetch()
        .await?;

    Ok(Json(listing(&state, list)))
}

/// One experience.
///
/// `GET /api/experiences/:id`
pub async fn get_experience(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    PathParam(id): PathParam,
) -> Result<Json<Envelope<Experience>>, ApiError> {
    let detail: ExperienceDetail = Route::get(&state, "/api/experiences")
        .segment(id)
        .optional(credential)
        .fetch()
        .await?;

    Ok(Json(Envelope::data(Experience::from_record(
        detail.experience,
        &state.media,
    ))))
}

/// Submit a new experience for moderation.
///
/// `POST /api/experiences`
pub async fn create_experience(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    body: JsonBody,
) -> Result<Json<Envelope<Experience>>, ApiError> {
    let detail: ExperienceDetail = Route::post(&state, "/api/experiences")
        .protected(credential)
        .json(body)
        .require(CREATE_FIELDS)
        .fetch()
        .await?;

    tracing::info!(experience_id = %detail.experience.id, "Experience submitted");
    Ok(Json(
        Envelope::data(Experience::from_record(detail.experience, &state.media))
            .with_message("Experience submitted for review"),
    ))
}

/// Map a downstream listing, keeping its pagination.
pub(crate) fn listing(state: &GatewayState, list: ExperienceList) -> Envelope<Vec<Experience>> {
    let experiences = list
        .experiences
        .into_iter()
        .map(|record| Experience::from_record(record, &state.media))
        .collect();
    Envelope::data(experiences).with_pagination(list.pagination)
}
