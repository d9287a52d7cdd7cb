//! HTTP client for the external camera capture service
//!
//! The camera service is an opaque collaborator; this client only issues
//! capture requests and maps the reported metadata onto media records.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capture request body sent to the camera service
#[derive(Debug, Clone, Serialize)]
pub struct CameraCaptureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
}

/// Capture metadata reported by the camera service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraCapture {
    pub success: bool,
    pub filename: String,
    #[serde(default)]
    pub filepath: Option<String>,
    pub captured_at: String,
    #[serde(default)]
    pub exposure_time: Option<f64>,
    #[serde(default)]
    pub gain: Option<f64>,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl CameraCapture {
    /// Parse the reported capture time
    ///
    /// The camera reports a local ISO timestamp without an offset; such
    /// values are taken as UTC. An unparseable value falls back to now.
    pub fn captured_at_utc(&self) -> DateTime<Utc> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.captured_at) {
            return dt.with_timezone(&Utc);
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.captured_at, "%Y-%m-%dT%H:%M:%S%.f")
        {
            return naive.and_utc();
        }
        Utc::now()
    }
}

/// Client for the camera capture collaborator
#[derive(Clone)]
pub struct CameraClient {
    http: reqwest::Client,
    base_url: String,
}

impl CameraClient {
    /// Build a client with the configured request timeout
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build camera HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request a capture from the camera service
    pub async fn capture(&self, exposure: Option<f64>, gain: Option<f64>) -> Result<CameraCapture> {
        let url = format!("{}/capture", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&CameraCaptureRequest { exposure, gain })
            .send()
            .await
            .context("Camera service unreachable")?
            .error_for_status()
            .context("Camera service returned an error")?;

        let capture = response
            .json::<CameraCapture>()
            .await
            .context("Invalid capture response from camera service")?;

        if !capture.success {
            anyhow::bail!("Camera service reported a failed capture");
        }

        Ok(capture)
    }
}
