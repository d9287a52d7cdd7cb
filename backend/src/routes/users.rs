//! User administration routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use microlab_shared::types::{PageQuery, PaginatedResponse, PublicUser};

/// Create user administration routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// List all users, sanitized (admin only)
///
/// GET /users?page=&limit=
async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResponse<PublicUser>>> {
    if !auth_user.is_admin() {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }

    let (page, limit) = query.normalize();
    let response = UserService::list_users(&state.db, page, limit).await?;
    Ok(Json(response))
}
