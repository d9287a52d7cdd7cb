//! Common test utilities for integration tests
//!
//! This module provides shared setup and teardown for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use microlab_backend::{config::AppConfig, routes, state::AppState, storage::FsMediaStore};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: PgPool,
    pub media_root: PathBuf,
}

impl TestApp {
    /// Create a new test application with a real database and a
    /// throwaway media directory
    pub async fn new() -> Self {
        let config = test_config();
        let pool = create_test_pool(&config.database.url).await;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let media_root = PathBuf::from(&config.media.root_dir);
        let store = FsMediaStore::new(&media_root);
        store.ensure_root().await.expect("Failed to create media dir");

        let state =
            AppState::new(pool.clone(), config, Arc::new(store)).expect("Failed to build state");
        let app = routes::create_router(state);

        Self {
            app,
            pool,
            media_root,
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.request("GET", path, None, None).await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.request("GET", path, None, Some(token)).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.request("POST", path, Some(body), None).await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.request("POST", path, Some(body), Some(token)).await
    }

    /// Make an authenticated PUT request with JSON body
    pub async fn put_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.request("PUT", path, Some(body), Some(token)).await
    }

    /// Make an authenticated DELETE request
    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.request("DELETE", path, None, Some(token)).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
        token: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_default())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(bytes.to_vec()).unwrap();

        (status, body_str)
    }

    /// Register a fresh user and return (token, user id, email)
    pub async fn register_user(&self, password: &str) -> (String, Uuid, String) {
        let suffix = Uuid::new_v4().simple().to_string();
        let email = format!("user_{}@lab.example", &suffix[..12]);
        let username = format!("user_{}", &suffix[..12]);
        let body = serde_json::json!({
            "email": email,
            "username": username,
            "password": password,
        });

        let (status, response) = self.post("/register", &body.to_string()).await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", response);

        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        let token = response["accessToken"].as_str().unwrap().to_string();
        let user_id = response["user"]["id"].as_str().unwrap().parse().unwrap();

        (token, user_id, email)
    }

    /// Promote a user to admin and return a token carrying the new role
    pub async fn promote_to_admin(&self, email: &str, password: &str) -> String {
        sqlx::query("UPDATE users SET role = 'admin' WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .expect("Failed to promote user");

        let body = serde_json::json!({"email": email, "password": password});
        let (status, response) = self.post("/login", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);

        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        response["accessToken"].as_str().unwrap().to_string()
    }

    /// Insert a media row with a backing file and return its id
    pub async fn seed_media(&self, owner: Uuid, filename: &str) -> Uuid {
        tokio::fs::write(self.media_root.join(filename), b"test-bytes")
            .await
            .expect("Failed to write backing file");

        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO media (owner_user_id, kind, filename, captured_at, file_size_bytes)
            VALUES ($1, 'image', $2, NOW(), 10)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(filename)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to seed media")
    }

    /// Count media rows still present for a filename
    pub async fn media_rows_for(&self, filename: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM media WHERE filename = $1")
            .bind(filename)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Wipe all test data
    ///
    /// Destructive across the whole database; only call from a serial
    /// maintenance test, never from tests that may run in parallel.
    pub async fn cleanup(&self) {
        sqlx::query("TRUNCATE media, stage_positions, users CASCADE")
            .execute(&self.pool)
            .await
            .expect("Failed to truncate tables");
        let _ = tokio::fs::remove_dir_all(&self.media_root).await;
    }
}

/// Build the test configuration
///
/// The media root is shared across tests in a run: listings with
/// `filter=all` probe every row on the page, so a per-test root would
/// let one test prune rows another test just seeded.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
        config.database.url = url;
    }
    config.media.root_dir = std::env::temp_dir()
        .join("microlab-test-media")
        .to_string_lossy()
        .to_string();
    config
}

async fn create_test_pool(url: &str) -> PgPool {
    PgPool::connect(url)
        .await
        .expect("Failed to connect to test database")
}
