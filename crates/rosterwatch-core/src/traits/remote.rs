//! Remote presence service contract.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;
use crate::types::{PeerId, RemotePresence};

/// Logical contract of the remote presence service.
#[async_trait]
pub trait PresenceApi: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve a vanity name to a canonical id. `Ok(None)` means not found.
    async fn resolve_vanity(&self, api_key: &str, name: &str) -> AppResult<Option<PeerId>>;

    /// Confirmed peers of `owner`, de-duplicated.
    async fn roster_ids(&self, api_key: &str, owner: PeerId) -> AppResult<Vec<PeerId>>;

    /// Presence for one batch of at most 100 ids.
    async fn presence_batch(&self, api_key: &str, ids: &[PeerId])
    -> AppResult<Vec<RemotePresence>>;
}

/// Downloads avatar image bytes.
#[async_trait]
pub trait AvatarSource: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the full image at `url`.
    async fn fetch(&self, url: &str) -> AppResult<Bytes>;
}
