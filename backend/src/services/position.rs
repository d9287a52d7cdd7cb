//! Saved stage position service

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{NewPosition, PositionRecord, PositionRepository, UpdatePosition};
use microlab_shared::types::{
    CreatePositionRequest, DeleteResponse, PaginatedResponse, PaginationMeta, PositionResponse,
    UpdatePositionRequest,
};
use microlab_shared::validation::{validate_coordinate, validate_position_name};
use sqlx::PgPool;
use uuid::Uuid;

/// Stage position service
pub struct PositionService;

impl PositionService {
    /// List one page of the caller's saved positions
    pub async fn list(
        pool: &PgPool,
        auth: &AuthUser,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedResponse<PositionResponse>, ApiError> {
        let offset = (page - 1) * limit;

        let rows = PositionRepository::list_by_owner(pool, auth.user_id, limit, offset)
            .await
            .map_err(ApiError::Internal)?;
        let total = PositionRepository::count_by_owner(pool, auth.user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Self::to_response).collect(),
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// Save a new stage position for the caller
    pub async fn create(
        pool: &PgPool,
        auth: &AuthUser,
        request: CreatePositionRequest,
    ) -> Result<PositionResponse, ApiError> {
        validate_position_name(&request.name).map_err(ApiError::Validation)?;
        for value in [request.x, request.y, request.z] {
            validate_coordinate(value).map_err(ApiError::Validation)?;
        }

        let row = PositionRepository::insert(
            pool,
            NewPosition {
                owner_user_id: auth.user_id,
                name: request.name,
                x: request.x,
                y: request.y,
                z: request.z,
                description: request.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(Self::to_response(row))
    }

    /// Update a saved position (owner or admin only)
    pub async fn update(
        pool: &PgPool,
        auth: &AuthUser,
        id: Uuid,
        request: UpdatePositionRequest,
    ) -> Result<PositionResponse, ApiError> {
        let row = Self::find_authorized(pool, auth, id).await?;

        if let Some(name) = &request.name {
            validate_position_name(name).map_err(ApiError::Validation)?;
        }
        for value in [request.x, request.y, request.z].into_iter().flatten() {
            validate_coordinate(value).map_err(ApiError::Validation)?;
        }

        let updated = PositionRepository::update(
            pool,
            row.id,
            UpdatePosition {
                name: request.name,
                x: request.x,
                y: request.y,
                z: request.z,
                description: request.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Position not found".to_string()))?;

        Ok(Self::to_response(updated))
    }

    /// Delete a saved position (owner or admin only)
    pub async fn delete(
        pool: &PgPool,
        auth: &AuthUser,
        id: Uuid,
    ) -> Result<DeleteResponse, ApiError> {
        let row = Self::find_authorized(pool, auth, id).await?;

        PositionRepository::delete(pool, row.id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DeleteResponse {
            success: true,
            message: "Position deleted".to_string(),
        })
    }

    async fn find_authorized(
        pool: &PgPool,
        auth: &AuthUser,
        id: Uuid,
    ) -> Result<PositionRecord, ApiError> {
        let row = PositionRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Position not found".to_string()))?;

        if row.owner_user_id != auth.user_id && !auth.is_admin() {
            return Err(ApiError::Forbidden(
                "You do not have permission to modify this position".to_string(),
            ));
        }

        Ok(row)
    }

    fn to_response(row: PositionRecord) -> PositionResponse {
        PositionResponse {
            id: row.id,
            owner_user_id: row.owner_user_id,
            name: row.name,
            x: row.x,
            y: row.y,
            z: row.z,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
