//! Booking endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use wayfare_core::models::{Booking, BookingDetail, BookingList};
use wayfare_core::Envelope;

use crate::dispatch::Route;
use crate::error::ApiError;
use crate::extract::{JsonBody, MaybeCredential, Params, PathParam};
use crate::state::GatewayState;

const BOOKING_FIELDS: &[&str] = &["experienceId", "date", "guests"];

/// The caller's bookings.
///
/// `GET /api/bookings?status&page&limit`
pub async fn list_bookings(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    params: Params,
) -> Result<Json<Envelope<Vec<Booking>>>, ApiError> {
    let list: BookingList = Route::get(&state, "/api/bookings")
        .protected(credential)
        .forward(&params, &["status", "page", "limit"])
        .fetch()
        .await?;

    let bookings = list.bookings.into_iter().map(Booking::from).collect();
    Ok(Json(Envelope::data(bookings).with_pagination(list.pagination)))
}

/// Book an experience.
///
/// `POST /api/bookings`
pub async fn create_booking(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    body: JsonBody,
) -> Result<Json<Envelope<Booking>>, ApiError> {
    let detail: BookingDetail = Route::post(&state, "/api/bookings")
        .protected(credential)
        .json(body)
        .require(BOOKING_FIELDS)
        .fetch()
        .await?;

    Ok(Json(
        Envelope::data(Booking::from(detail.booking)).with_message("Booking created successfully"),
    ))
}

/// Cancel a booking.
///
/// `PATCH /api/bookings/:id/cancel`
pub async fn cancel_booking(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    PathParam(id): PathParam,
) -> Result<Json<Envelope<()>>, ApiError> {
    Route::patch(&state, "/api/bookings")
        .segment(&id)
        .segment("cancel")
        .protected(credential)
        .send()
        .await?;

    tracing::info!(booking_id = %id, "Booking cancelled");
    Ok(Json(Envelope::ack("Booking cancelled successfully")))
}
