//! Batched presence retrieval.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use rosterwatch_core::config::remote::MAX_PRESENCE_BATCH;
use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::PresenceApi;
use rosterwatch_core::types::{PeerId, RemotePresence};

/// Fetches presence for an arbitrary id set in service-sized batches.
#[derive(Debug, Clone)]
pub struct PresenceFetcher {
    api: Arc<dyn PresenceApi>,
    batch_size: usize,
}

impl PresenceFetcher {
    /// Create a fetcher. The batch size is clamped to `1..=100`.
    pub fn new(api: Arc<dyn PresenceApi>, batch_size: usize) -> Self {
        Self {
            api,
            batch_size: batch_size.clamp(1, MAX_PRESENCE_BATCH),
        }
    }

    /// Presence for every id, requested in order-preserving batches.
    ///
    /// Duplicate ids are requested once. Any failed batch fails the whole
    /// fetch so the caller never sees a partial roster.
    pub async fn fetch(&self, api_key: &str, ids: &[PeerId]) -> AppResult<Vec<RemotePresence>> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<PeerId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let mut presences = Vec::with_capacity(unique.len());
        for (index, chunk) in unique.chunks(self.batch_size).enumerate() {
            debug!(batch = index, size = chunk.len(), "Fetching presence batch");
            presences.extend(self.api.presence_batch(api_key, chunk).await?);
        }
        Ok(presences)
    }
}
