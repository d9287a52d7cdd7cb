//! Media routes
//!
//! Listing (with page-local reconciliation), deletion, and capture intake.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::MediaService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use microlab_shared::types::{
    CaptureRequest, DeleteMediaResponse, MediaQuery, MediaRecordResponse, PaginatedResponse,
};
use uuid::Uuid;

/// Create media routes
pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/media", get(list_media))
        .route("/media/capture", post(capture_media))
        .route("/media/:id", axum::routing::delete(delete_media))
}

/// List media records with pagination
///
/// GET /media?filter=mine|all&kind=image|video&page=&limit=
///
/// Every record on the returned page is cross-checked against the file
/// store; stale rows are pruned and excluded from the response.
async fn list_media(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<MediaQuery>,
) -> ApiResult<Json<PaginatedResponse<MediaRecordResponse>>> {
    let response =
        MediaService::list(&state.db, state.media_store(), &auth_user, &query).await?;
    Ok(Json(response))
}

/// Delete a media record (owner or admin)
///
/// DELETE /media/:id
async fn delete_media(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteMediaResponse>> {
    let response = MediaService::delete(&state.db, state.media_store(), &auth_user, id).await?;
    Ok(Json(response))
}

/// Trigger a capture on the camera service and record the result
///
/// POST /media/capture
async fn capture_media(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CaptureRequest>,
) -> ApiResult<(StatusCode, Json<MediaRecordResponse>)> {
    let record = MediaService::capture(&state.db, state.camera(), &auth_user, &req).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    // Route tests live in routes/media_tests.rs and tests/media_integration_test.rs
}
