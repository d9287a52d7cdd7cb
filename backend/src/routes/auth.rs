//! Authentication routes
//!
//! Registration, login, and the bearer-protected profile endpoints.
//!
//! Password hashing runs on the blocking thread pool; token issuance uses
//! the pre-computed JWT keys from AppState.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use microlab_shared::types::{
    AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateProfileRequest,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(get_profile).put(update_profile))
}

/// Register a new user
///
/// POST /register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = UserService::register(
        &state.db,
        state.jwt(),
        &req.email,
        &req.username,
        &req.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = UserService::login(&state.db, state.jwt(), &req.email, &req.password).await?;
    Ok(Json(response))
}

/// Get current user profile (requires authentication)
///
/// GET /profile
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let profile = UserService::get_profile(&state.db, auth_user.user_id).await?;
    Ok(Json(profile))
}

/// Update current user profile (requires authentication)
///
/// PUT /profile
async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<PublicUser>> {
    let profile = UserService::update_profile(&state.db, auth_user.user_id, req).await?;
    Ok(Json(profile))
}
