//! Roster cache.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::PresenceApi;
use rosterwatch_core::types::PeerId;

#[derive(Debug, Clone)]
struct RosterEntry {
    owner: PeerId,
    peers: Vec<PeerId>,
    fetched_at: DateTime<Utc>,
}

/// Peer ids of the primary account, refreshed on a long TTL.
///
/// Owned by the refresh cycle and only touched from inside it.
#[derive(Debug, Clone)]
pub struct RosterCache {
    ttl: Duration,
    entry: Option<RosterEntry>,
}

impl RosterCache {
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Whether the next lookup for `owner` must hit the remote API.
    ///
    /// An empty roster always needs a refresh, whatever its age.
    pub fn needs_refresh(&self, owner: PeerId, now: DateTime<Utc>) -> bool {
        match &self.entry {
            None => true,
            Some(entry) => {
                entry.owner != owner || entry.peers.is_empty() || now - entry.fetched_at > self.ttl
            }
        }
    }

    /// Cached roster, fetching it first when a refresh is due.
    ///
    /// The cache is replaced only after a successful fetch.
    pub async fn peers(
        &mut self,
        api: &dyn PresenceApi,
        api_key: &str,
        owner: PeerId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<PeerId>> {
        if let Some(entry) = self.entry.as_ref().filter(|_| !self.needs_refresh(owner, now)) {
            return Ok(entry.peers.clone());
        }

        let peers = api.roster_ids(api_key, owner).await?;
        debug!(owner = %owner, count = peers.len(), "Roster refreshed");
        self.entry = Some(RosterEntry {
            owner,
            peers: peers.clone(),
            fetched_at: now,
        });
        Ok(peers)
    }
}
