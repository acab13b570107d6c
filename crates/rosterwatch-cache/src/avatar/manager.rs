//! Background avatar downloads and the periodic expiry sweep.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use rosterwatch_core::config::cache::CacheConfig;
use rosterwatch_core::traits::AvatarSource;
use rosterwatch_core::types::PeerId;

use super::store::AvatarStore;

/// Number of new downloads one refresh cycle may still schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadBudget {
    remaining: usize,
}

impl DownloadBudget {
    /// A budget allowing `cap` new downloads.
    pub fn new(cap: usize) -> Self {
        Self { remaining: cap }
    }

    /// Consume one slot; `false` once exhausted.
    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Slots left.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

/// Removes a peer from the in-progress set when its download task ends.
struct InProgressGuard {
    in_progress: Arc<DashMap<PeerId, ()>>,
    id: PeerId,
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.in_progress.remove(&self.id);
    }
}

/// Avatar cache manager.
///
/// A download is started only when no file is cached, no download for the
/// same peer is in flight, and the cycle budget allows it. At most
/// `concurrency` downloads run at once across all cycles.
#[derive(Debug, Clone)]
pub struct AvatarCache {
    store: Arc<AvatarStore>,
    source: Arc<dyn AvatarSource>,
    permits: Arc<Semaphore>,
    in_progress: Arc<DashMap<PeerId, ()>>,
    per_cycle: usize,
    max_age: Duration,
    sweep_interval: chrono::Duration,
    last_sweep: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AvatarCache {
    /// Create a manager from cache configuration.
    pub fn new(config: &CacheConfig, source: Arc<dyn AvatarSource>) -> Self {
        Self {
            store: Arc::new(AvatarStore::new(&config.avatar_dir)),
            source,
            permits: Arc::new(Semaphore::new(config.avatar_concurrency.max(1))),
            in_progress: Arc::new(DashMap::new()),
            per_cycle: config.avatar_downloads_per_cycle,
            max_age: Duration::from_secs(config.avatar_max_age_days * 24 * 3600),
            sweep_interval: chrono::Duration::hours(config.avatar_sweep_hours as i64),
            last_sweep: Arc::new(Mutex::new(None)),
        }
    }

    /// The underlying file store.
    pub fn store(&self) -> &AvatarStore {
        &self.store
    }

    /// A fresh budget for one refresh cycle.
    pub fn budget(&self) -> DownloadBudget {
        DownloadBudget::new(self.per_cycle)
    }

    /// Whether a download for `id` is currently in flight.
    pub fn is_in_progress(&self, id: PeerId) -> bool {
        self.in_progress.contains_key(&id)
    }

    /// Local reference when cached, never scheduling a download.
    pub async fn cached_ref(&self, id: PeerId) -> Option<String> {
        self.store.local_ref(id).await
    }

    /// Avatar reference for display.
    ///
    /// Returns the local file when cached. Otherwise returns the remote URL
    /// and schedules a download if the budget allows.
    pub async fn resolve(
        &self,
        id: PeerId,
        remote_url: Option<&str>,
        budget: &mut DownloadBudget,
    ) -> Option<String> {
        if let Some(local) = self.store.local_ref(id).await {
            return Some(local);
        }
        let url = remote_url.filter(|u| !u.trim().is_empty())?;
        self.schedule(id, url, budget).await;
        Some(url.to_string())
    }

    /// Start a background download of `url` for `id` if eligible.
    ///
    /// Returns the task handle when a download was scheduled.
    pub async fn schedule(
        &self,
        id: PeerId,
        url: &str,
        budget: &mut DownloadBudget,
    ) -> Option<JoinHandle<()>> {
        if self.store.exists(id).await {
            return None;
        }

        match self.in_progress.entry(id) {
            Entry::Occupied(_) => return None,
            Entry::Vacant(slot) => {
                if !budget.take() {
                    return None;
                }
                slot.insert(());
            }
        }

        let guard = InProgressGuard {
            in_progress: Arc::clone(&self.in_progress),
            id,
        };
        let store = Arc::clone(&self.store);
        let source = Arc::clone(&self.source);
        let permits = Arc::clone(&self.permits);
        let url = url.to_string();

        debug!(id = %id, "Scheduling avatar download");
        Some(tokio::spawn(async move {
            let _guard = guard;
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            if store.exists(id).await {
                return;
            }

            let result = match source.fetch(&url).await {
                Ok(bytes) => store.write_atomic(id, &bytes).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!(id = %id, error = %e, "Avatar download failed");
            }
        }))
    }

    /// Start the expiry sweep if one is due.
    ///
    /// The first call always sweeps; later calls sweep once per interval.
    pub fn maybe_sweep(&self, now: DateTime<Utc>) -> Option<JoinHandle<()>> {
        {
            let mut last = self.last_sweep.lock().unwrap_or_else(|e| e.into_inner());
            if last.is_some_and(|at| now - at < self.sweep_interval) {
                return None;
            }
            *last = Some(now);
        }

        let store = Arc::clone(&self.store);
        let max_age = self.max_age;
        let wall_clock = SystemTime::from(now);
        Some(tokio::spawn(async move {
            match store.sweep(max_age, wall_clock).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Removed expired avatars"),
                Err(e) => warn!(error = %e, "Avatar sweep failed"),
            }
        }))
    }
}
