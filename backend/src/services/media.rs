//! Media service: listing with reconciliation, deletion, capture intake
//!
//! Listing cross-checks database rows against the backing file store and
//! prunes rows whose file has gone missing. The cleanup is page-local:
//! only rows in the returned page are probed, so the advertised total can
//! still count stale rows beyond the page until they are paged into view.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{MediaRepository, MediaRow, NewMedia, PositionRepository};
use crate::services::capture::CameraClient;
use crate::storage::MediaStore;
use microlab_shared::models::{MediaKind, OwnerFilter};
use microlab_shared::types::{
    CaptureRequest, DeleteMediaResponse, MediaQuery, MediaRecordResponse, PaginatedResponse,
    PaginationMeta,
};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Media service
pub struct MediaService;

impl MediaService {
    /// List one page of media records, reconciling against the file store
    pub async fn list(
        pool: &PgPool,
        store: &dyn MediaStore,
        auth: &AuthUser,
        query: &MediaQuery,
    ) -> Result<PaginatedResponse<MediaRecordResponse>, ApiError> {
        let filter = match query.filter.as_deref() {
            Some(raw) => raw
                .parse::<OwnerFilter>()
                .map_err(ApiError::Validation)?,
            None => OwnerFilter::default(),
        };
        let owner = match filter {
            OwnerFilter::Mine => Some(auth.user_id),
            OwnerFilter::All => None,
        };
        let kind = query.kind.map(|k| k.to_string());

        let paging = query.paging();
        let (page, limit) = paging.normalize();
        let offset = paging.offset();

        let rows = MediaRepository::list(pool, owner, kind.as_deref(), limit, offset)
            .await
            .map_err(ApiError::Internal)?;
        let mut total = MediaRepository::count(pool, owner, kind.as_deref())
            .await
            .map_err(ApiError::Internal)?;

        let (kept, missing) = Self::partition_by_presence(store, rows).await;

        for row in &missing {
            warn!(
                media_id = %row.id,
                filename = %row.filename,
                "Backing file missing, pruning media record"
            );
            MediaRepository::delete(pool, row.id)
                .await
                .map_err(ApiError::Internal)?;
        }
        total -= missing.len() as i64;

        Ok(PaginatedResponse {
            data: kept.into_iter().map(Self::to_response).collect(),
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// Delete a media record (owner or admin only)
    ///
    /// The filesystem unlink is best-effort: a failure is logged and the
    /// database row is removed regardless, which can strand an orphan file.
    pub async fn delete(
        pool: &PgPool,
        store: &dyn MediaStore,
        auth: &AuthUser,
        id: Uuid,
    ) -> Result<DeleteMediaResponse, ApiError> {
        let row = MediaRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Media not found".to_string()))?;

        if row.owner_user_id != auth.user_id && !auth.is_admin() {
            return Err(ApiError::Forbidden(
                "You do not have permission to delete this media".to_string(),
            ));
        }

        let file_deleted = match store.remove(&row.filename).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    media_id = %row.id,
                    filename = %row.filename,
                    error = %e,
                    "Failed to delete backing file"
                );
                false
            }
        };

        MediaRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DeleteMediaResponse {
            success: true,
            message: "Media deleted".to_string(),
            file_deleted,
        })
    }

    /// Trigger a capture on the camera service and record the result
    pub async fn capture(
        pool: &PgPool,
        camera: &CameraClient,
        auth: &AuthUser,
        request: &CaptureRequest,
    ) -> Result<MediaRecordResponse, ApiError> {
        let position = match request.position_id {
            Some(position_id) => Some(
                PositionRepository::find_by_id(pool, position_id)
                    .await
                    .map_err(ApiError::Internal)?
                    .filter(|p| p.owner_user_id == auth.user_id || auth.is_admin())
                    .ok_or_else(|| ApiError::NotFound("Position not found".to_string()))?,
            ),
            None => None,
        };

        let capture = camera
            .capture(request.exposure, request.gain)
            .await
            .map_err(|e| ApiError::External(e.to_string()))?;

        let captured_at = capture.captured_at_utc();
        let row = MediaRepository::insert(
            pool,
            NewMedia {
                owner_user_id: auth.user_id,
                kind: MediaKind::Image.to_string(),
                filename: capture.filename,
                captured_at,
                position_x: position.as_ref().map(|p| p.x),
                position_y: position.as_ref().map(|p| p.y),
                position_z: position.as_ref().map(|p| p.z),
                exposure_us: capture.exposure_time,
                gain: capture.gain,
                file_size_bytes: capture.file_size,
                width: capture.width,
                height: capture.height,
                metadata: if capture.metadata.is_object() {
                    capture.metadata
                } else {
                    serde_json::json!({})
                },
                job_id: None,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(Self::to_response(row))
    }

    /// Split a page of rows into present and missing, probing the store
    ///
    /// A failed probe is logged and the row treated as missing.
    async fn partition_by_presence(
        store: &dyn MediaStore,
        rows: Vec<MediaRow>,
    ) -> (Vec<MediaRow>, Vec<MediaRow>) {
        let mut kept = Vec::with_capacity(rows.len());
        let mut missing = Vec::new();

        for row in rows {
            match store.exists(&row.filename).await {
                Ok(true) => kept.push(row),
                Ok(false) => missing.push(row),
                Err(e) => {
                    warn!(
                        filename = %row.filename,
                        error = %e,
                        "File probe failed, treating as missing"
                    );
                    missing.push(row);
                }
            }
        }

        (kept, missing)
    }

    fn to_response(row: MediaRow) -> MediaRecordResponse {
        MediaRecordResponse {
            id: row.id,
            owner_user_id: row.owner_user_id,
            kind: row.kind.parse().unwrap_or(MediaKind::Image),
            filename: row.filename,
            captured_at: row.captured_at,
            position_x: row.position_x,
            position_y: row.position_y,
            position_z: row.position_z,
            exposure_us: row.exposure_us,
            gain: row.gain,
            file_size_bytes: row.file_size_bytes,
            width: row.width,
            height: row.height,
            metadata: row.metadata,
            job_id: row.job_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory store: a set of present filenames, plus names that fail
    struct FakeStore {
        present: Mutex<HashSet<String>>,
        failing: HashSet<String>,
    }

    impl FakeStore {
        fn new(present: &[&str]) -> Self {
            Self {
                present: Mutex::new(present.iter().map(|s| s.to_string()).collect()),
                failing: HashSet::new(),
            }
        }

        fn with_failing(mut self, failing: &[&str]) -> Self {
            self.failing = failing.iter().map(|s| s.to_string()).collect();
            self
        }
    }

    #[async_trait]
    impl MediaStore for FakeStore {
        async fn exists(&self, filename: &str) -> Result<bool> {
            if self.failing.contains(filename) {
                anyhow::bail!("probe failed");
            }
            Ok(self.present.lock().unwrap().contains(filename))
        }

        async fn remove(&self, filename: &str) -> Result<()> {
            if self.present.lock().unwrap().remove(filename) {
                Ok(())
            } else {
                anyhow::bail!("no such file")
            }
        }
    }

    fn row(filename: &str) -> MediaRow {
        MediaRow {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::new_v4(),
            kind: "image".to_string(),
            filename: filename.to_string(),
            captured_at: Utc::now(),
            position_x: None,
            position_y: None,
            position_z: None,
            exposure_us: Some(15000.0),
            gain: Some(2.0),
            file_size_bytes: 1024,
            width: Some(1280),
            height: Some(1024),
            metadata: serde_json::json!({}),
            job_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_partition_keeps_present_rows() {
        let store = FakeStore::new(&["a.jpg", "b.jpg"]);
        let rows = vec![row("a.jpg"), row("b.jpg")];

        let (kept, missing) = MediaService::partition_by_presence(&store, rows).await;

        assert_eq!(kept.len(), 2);
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_partition_flags_absent_rows() {
        let store = FakeStore::new(&["a.jpg"]);
        let rows = vec![row("a.jpg"), row("gone.jpg")];

        let (kept, missing) = MediaService::partition_by_presence(&store, rows).await;

        assert_eq!(kept.len(), 1);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].filename, "gone.jpg");
    }

    #[tokio::test]
    async fn test_partition_treats_probe_errors_as_missing() {
        let store = FakeStore::new(&["a.jpg", "b.jpg"]).with_failing(&["b.jpg"]);
        let rows = vec![row("a.jpg"), row("b.jpg")];

        let (kept, missing) = MediaService::partition_by_presence(&store, rows).await;

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].filename, "a.jpg");
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn test_response_never_reorders_kind() {
        let mut r = row("a.avi");
        r.kind = "video".to_string();
        let response = MediaService::to_response(r);
        assert_eq!(response.kind, MediaKind::Video);
    }
}
