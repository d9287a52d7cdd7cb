//! Media repository for database operations
//!
//! Images and videos share one table; `kind` discriminates. `filename` is
//! unique across both kinds and refers to a file in the media store.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Media record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub kind: String,
    pub filename: String,
    pub captured_at: DateTime<Utc>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
    pub exposure_us: Option<f64>,
    pub gain: Option<f64>,
    pub file_size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub metadata: serde_json::Value,
    pub job_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a media record
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub owner_user_id: Uuid,
    pub kind: String,
    pub filename: String,
    pub captured_at: DateTime<Utc>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
    pub exposure_us: Option<f64>,
    pub gain: Option<f64>,
    pub file_size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub metadata: serde_json::Value,
    pub job_id: Option<String>,
}

/// Media repository for database operations
pub struct MediaRepository;

impl MediaRepository {
    /// List one page of media, newest capture first
    ///
    /// `owner` and `kind` are optional narrowing filters; NULL matches all.
    pub async fn list(
        pool: &PgPool,
        owner: Option<Uuid>,
        kind: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaRow>> {
        let rows = sqlx::query_as::<_, MediaRow>(
            r#"
            SELECT id, owner_user_id, kind, filename, captured_at,
                   position_x, position_y, position_z, exposure_us, gain,
                   file_size_bytes, width, height, metadata, job_id, created_at
            FROM media
            WHERE ($1::uuid IS NULL OR owner_user_id = $1)
              AND ($2::text IS NULL OR kind = $2)
            ORDER BY captured_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(kind)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Count media matching the same filters as `list`
    pub async fn count(pool: &PgPool, owner: Option<Uuid>, kind: Option<&str>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM media
            WHERE ($1::uuid IS NULL OR owner_user_id = $1)
              AND ($2::text IS NULL OR kind = $2)
            "#,
        )
        .bind(owner)
        .bind(kind)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Find a media record by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<MediaRow>> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            SELECT id, owner_user_id, kind, filename, captured_at,
                   position_x, position_y, position_z, exposure_us, gain,
                   file_size_bytes, width, height, metadata, job_id, created_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Insert a media record
    pub async fn insert(pool: &PgPool, media: NewMedia) -> Result<MediaRow> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            INSERT INTO media (owner_user_id, kind, filename, captured_at,
                               position_x, position_y, position_z, exposure_us, gain,
                               file_size_bytes, width, height, metadata, job_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, owner_user_id, kind, filename, captured_at,
                      position_x, position_y, position_z, exposure_us, gain,
                      file_size_bytes, width, height, metadata, job_id, created_at
            "#,
        )
        .bind(media.owner_user_id)
        .bind(media.kind)
        .bind(media.filename)
        .bind(media.captured_at)
        .bind(media.position_x)
        .bind(media.position_y)
        .bind(media.position_z)
        .bind(media.exposure_us)
        .bind(media.gain)
        .bind(media.file_size_bytes)
        .bind(media.width)
        .bind(media.height)
        .bind(media.metadata)
        .bind(media.job_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Delete a media record, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
