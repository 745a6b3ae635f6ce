//! Image uploads.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;

use wayfare_core::media::{Upload, UploadRecord};
use wayfare_core::Envelope;

use crate::dispatch::Route;
use crate::error::ApiError;
use crate::extract::{MaybeCredential, RawBody};
use crate::state::GatewayState;

/// Store an image.
///
/// `POST /api/uploads` (multipart/form-data)
///
/// The body and its `Content-Type` go downstream untouched so the multipart
/// boundary survives. The stored path comes back as an absolute URL on the
/// image service.
pub async fn upload(
    State(state): State<Arc<GatewayState>>,
    credential: MaybeCredential,
    headers: HeaderMap,
    RawBody(body): RawBody,
) -> Result<Json<Envelope<Upload>>, ApiError> {
    let route = Route::post(&state, "/api/uploads").protected(credential);

    let content_type = headers
        .get(CONTENT_TYPE)
        .filter(|value| {
            value
                .to_str()
                .is_ok_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        })
        .cloned();

    // An unauthenticated upload is a 401 whatever its body.
    let route = match content_type {
        Some(content_type) => route.multipart(content_type, body),
        None => {
            route.prepare()?;
            return Err(ApiError::Validation(
                "Expected a multipart/form-data body".to_string(),
            ));
        }
    };

    let record: UploadRecord = route.fetch().await?;
    Ok(Json(Envelope::data(Upload::from_record(record, &state.media))))
}
