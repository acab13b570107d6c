//! Avatar image download over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use rosterwatch_core::config::remote::RemoteConfig;
use rosterwatch_core::error::{AppError, ErrorKind};
use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::AvatarSource;

/// Fetches avatar images with a plain GET.
#[derive(Debug, Clone)]
pub struct HttpAvatarSource {
    http: reqwest::Client,
}

impl HttpAvatarSource {
    /// Create a source using the remote API timeout.
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl AvatarSource for HttpAvatarSource {
    async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "Avatar download failed", e))?;

        let bytes = response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Avatar body read failed", e)
        })?;

        if bytes.is_empty() {
            return Err(AppError::external(format!("Empty avatar image at {url}")));
        }
        Ok(bytes)
    }
}
