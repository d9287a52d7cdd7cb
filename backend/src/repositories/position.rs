//! Saved stage position repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Stage position record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PositionRecord {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a stage position
#[derive(Debug, Clone)]
pub struct NewPosition {
    pub owner_user_id: Uuid,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub description: Option<String>,
}

/// Input for updating a stage position
#[derive(Debug, Clone, Default)]
pub struct UpdatePosition {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub description: Option<String>,
}

/// Stage position repository
pub struct PositionRepository;

impl PositionRepository {
    /// List one page of a user's saved positions, newest first
    pub async fn list_by_owner(
        pool: &PgPool,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PositionRecord>> {
        let rows = sqlx::query_as::<_, PositionRecord>(
            r#"
            SELECT id, owner_user_id, name, x, y, z, description, created_at, updated_at
            FROM stage_positions
            WHERE owner_user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Count a user's saved positions
    pub async fn count_by_owner(pool: &PgPool, owner: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM stage_positions WHERE owner_user_id = $1",
        )
        .bind(owner)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Find a position by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PositionRecord>> {
        let row = sqlx::query_as::<_, PositionRecord>(
            r#"
            SELECT id, owner_user_id, name, x, y, z, description, created_at, updated_at
            FROM stage_positions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Insert a new saved position
    pub async fn insert(pool: &PgPool, position: NewPosition) -> Result<PositionRecord> {
        let row = sqlx::query_as::<_, PositionRecord>(
            r#"
            INSERT INTO stage_positions (owner_user_id, name, x, y, z, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_user_id, name, x, y, z, description, created_at, updated_at
            "#,
        )
        .bind(position.owner_user_id)
        .bind(position.name)
        .bind(position.x)
        .bind(position.y)
        .bind(position.z)
        .bind(position.description)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Update a saved position
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        updates: UpdatePosition,
    ) -> Result<Option<PositionRecord>> {
        let row = sqlx::query_as::<_, PositionRecord>(
            r#"
            UPDATE stage_positions SET
                name = COALESCE($2, name),
                x = COALESCE($3, x),
                y = COALESCE($4, y),
                z = COALESCE($5, z),
                description = COALESCE($6, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_user_id, name, x, y, z, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(updates.name)
        .bind(updates.x)
        .bind(updates.y)
        .bind(updates.z)
        .bind(updates.description)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Delete a saved position, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM stage_positions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require database - see tests/positions_integration_test.rs
}
