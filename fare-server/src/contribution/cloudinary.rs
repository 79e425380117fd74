//! Cloudinary unsigned image uploads.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::error::ContributionError;
use super::form::ImageUpload;
use super::ImageHost;

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

/// Folder contributed photos are filed under.
const UPLOAD_FOLDER: &str = "redat-contributions";

/// Configuration for the Cloudinary client.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    /// Name of an unsigned upload preset
    pub upload_preset: String,
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CloudinaryConfig {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    error: UploadErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UploadErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, ContributionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            upload_url: format!(
                "{}/v1_1/{}/image/upload",
                config.base_url.trim_end_matches('/'),
                config.cloud_name
            ),
            upload_preset: config.upload_preset,
        })
    }

    async fn post_image(&self, image: &ImageUpload) -> Result<String, String> {
        let mut file = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        if let Some(content_type) = &image.content_type {
            file = file.mime_str(content_type).map_err(|e| e.to_string())?;
        }
        let form = Form::new()
            .part("file", file)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", UPLOAD_FOLDER);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<UploadErrorBody>(&body) {
                Ok(b) => b.error.message,
                Err(_) => format!("status {}", status.as_u16()),
            });
        }

        serde_json::from_str::<UploadResponse>(&body)
            .map(|r| r.secure_url)
            .map_err(|e| e.to_string())
    }
}

impl ImageHost for CloudinaryClient {
    async fn upload(&self, image: &ImageUpload) -> Result<String, ContributionError> {
        debug!(slot = %image.slot, bytes = image.bytes.len(), "uploading image");
        self.post_image(image)
            .await
            .map_err(|message| ContributionError::Upload {
                slot: image.slot.to_string(),
                message,
            })
    }
}
