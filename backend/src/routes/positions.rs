//! Saved stage position routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PositionService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use microlab_shared::types::{
    CreatePositionRequest, DeleteResponse, PageQuery, PaginatedResponse, PositionResponse,
    UpdatePositionRequest,
};
use uuid::Uuid;

/// Create position routes
pub fn position_routes() -> Router<AppState> {
    Router::new()
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/:id",
            put(update_position).delete(delete_position),
        )
}

/// List the caller's saved positions
///
/// GET /positions?page=&limit=
async fn list_positions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResponse<PositionResponse>>> {
    let (page, limit) = query.normalize();
    let response = PositionService::list(&state.db, &auth_user, page, limit).await?;
    Ok(Json(response))
}

/// Save a new stage position
///
/// POST /positions
async fn create_position(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreatePositionRequest>,
) -> ApiResult<(StatusCode, Json<PositionResponse>)> {
    let response = PositionService::create(&state.db, &auth_user, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a saved position (owner or admin)
///
/// PUT /positions/:id
async fn update_position(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePositionRequest>,
) -> ApiResult<Json<PositionResponse>> {
    let response = PositionService::update(&state.db, &auth_user, id, req).await?;
    Ok(Json(response))
}

/// Delete a saved position (owner or admin)
///
/// DELETE /positions/:id
async fn delete_position(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let response = PositionService::delete(&state.db, &auth_user, id).await?;
    Ok(Json(response))
}
