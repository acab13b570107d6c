//! HTTP implementation of the remote presence contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use rosterwatch_core::config::remote::RemoteConfig;
use rosterwatch_core::error::{AppError, ErrorKind};
use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::PresenceApi;
use rosterwatch_core::types::{PeerId, RemotePresence};

use crate::models::{FriendListResponse, PlayerSummariesResponse, ResolveVanityResponse};

const FRIEND_LIST_PATH: &str = "ISteamUser/GetFriendList/v1/";
const PLAYER_SUMMARIES_PATH: &str = "ISteamUser/GetPlayerSummaries/v2/";
const RESOLVE_VANITY_PATH: &str = "ISteamUser/ResolveVanityURL/v1/";

/// Client for the remote presence web API.
#[derive(Debug, Clone)]
pub struct WebApiClient {
    /// Shared HTTP connection pool.
    http: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl WebApiClient {
    /// Create a client from configuration.
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("rosterwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self::with_http(http, &config.base_url))
    }

    /// Create a client around an existing HTTP pool.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build an endpoint URL with escaped query parameters.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid API URL", e))
    }

    /// GET an endpoint and decode its JSON body.
    ///
    /// Only the path is logged; the query carries the API key.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let path = url.path().to_string();
        debug!(path = %path, "Remote API request");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| remote_error(&path, e))?
            .error_for_status()
            .map_err(|e| remote_error(&path, e))?;

        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed response from {path}"),
                e,
            )
        })
    }
}

/// Map a transport or status failure to a transient remote error.
fn remote_error(path: &str, err: reqwest::Error) -> AppError {
    let message = match err.status() {
        Some(status) => format!("Remote API {path} returned {status}"),
        None if err.is_timeout() => format!("Remote API {path} timed out"),
        None => format!("Remote API {path} request failed"),
    };
    AppError::with_source(ErrorKind::ExternalService, message, err)
}

#[async_trait]
impl PresenceApi for WebApiClient {
    async fn resolve_vanity(&self, api_key: &str, name: &str) -> AppResult<Option<PeerId>> {
        if api_key.trim().is_empty() || name.trim().is_empty() {
            return Ok(None);
        }

        let url = self.endpoint(RESOLVE_VANITY_PATH, &[("key", api_key), ("vanityurl", name)])?;
        let body: ResolveVanityResponse = self.get_json(url).await?;
        let resolved = body.into_peer_id();
        if resolved.is_none() {
            warn!(vanity = %name, "Vanity name did not resolve");
        }
        Ok(resolved)
    }

    async fn roster_ids(&self, api_key: &str, owner: PeerId) -> AppResult<Vec<PeerId>> {
        let owner = owner.to_string();
        let url = self.endpoint(
            FRIEND_LIST_PATH,
            &[
                ("key", api_key),
                ("steamid", owner.as_str()),
                ("relationship", "friend"),
            ],
        )?;
        let body: FriendListResponse = self.get_json(url).await?;
        Ok(body.into_peer_ids())
    }

    async fn presence_batch(
        &self,
        api_key: &str,
        ids: &[PeerId],
    ) -> AppResult<Vec<RemotePresence>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(PeerId::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint(
            PLAYER_SUMMARIES_PATH,
            &[("key", api_key), ("steamids", joined.as_str())],
        )?;
        let body: PlayerSummariesResponse = self.get_json(url).await?;
        Ok(body.into_presences())
    }
}
