//! City endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use wayfare_core::models::{City, CityDetail, CityList, Experience, ExperienceList};
use wayfare_core::Envelope;

use crate::dispatch::Route;
use crate::error::ApiError;
use crate::extract::{Params, PathParam};
use crate::state::GatewayState;

/// List cities.
///
/// `GET /api/cities?limit&popular&country`
pub async fn list_cities(
    State(state): State<Arc<GatewayState>>,
    params: Params,
) -> Result<Json<Envelope<Vec<City>>>, ApiError> {
    let list: CityList = Route::get(&state, "/api/cities")
        .forward(&params, &["limit", "popular", "country"])
        .fetch()
        .await?;

    let cities = list
        .cities
        .into_iter()
        .map(|record| City::from_record(record, &state.media))
        .collect();
    Ok(Json(Envelope::data(cities)))
}

/// One city by slug.
///
/// `GET /api/cities/:slug`
pub async fn get_city(
    State(state): State<Arc<GatewayState>>,
    PathParam(slug): PathParam,
) -> Result<Json<Envelope<City>>, ApiError> {
    let detail = city_by_slug(&state, &slug).await?;
    Ok(Json(Envelope::data(City::from_record(detail.city, &state.media))))
}

/// Experiences in a city, by city slug.
///
/// `GET /api/cities/:slug/experiences?page&limit`
///
/// The slug is resolved first; the listing is only requested once that
/// succeeds.
pub async fn city_experiences(
    State(state): State<Arc<GatewayState>>,
    PathParam(slug): PathParam,
    params: Params,
) -> Result<Json<Envelope<Vec<Experience>>>, ApiError> {
    let detail = city_by_slug(&state, &slug).await?;

    let list: ExperienceList = Route::get(&state, "/api/experiences")
        .query("cityId", detail.city.id.to_string())
        .forward(&params, &["page", "limit"])
        .fetch()
        .await?;

    let experiences = list
        .experiences
        .into_iter()
        .map(|record| Experience::from_record(record, &state.media))
        .collect();
    Ok(Json(
        Envelope::data(experiences).with_pagination(list.pagination),
    ))
}

async fn city_by_slug(state: &GatewayState, slug: &str) -> Result<CityDetail, ApiError> {
    Route::get(state, "/api/cities/slug")
        .segment(slug)
        .fetch()
        .await
}
