//! One presence refresh cycle.
//!
//! Flow: resolve the primary id → roster (cached) → batched presence →
//! arrange rows and schedule avatars → diff and notify → debounce and
//! publish. Shared caches are only written after the step that feeds them
//! succeeded, so a failed cycle leaves them as they were.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use rosterwatch_cache::{AvatarCache, DownloadBudget, IdentityResolver, RosterCache};
use rosterwatch_client::PresenceFetcher;
use rosterwatch_core::config::AppConfig;
use rosterwatch_core::config::display::DisplayConfig;
use rosterwatch_core::error::AppError;
use rosterwatch_core::locale::{self, Strings};
use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::{
    AvatarSource, Clock, NotificationChannel, PresenceApi, PresenceSink, SettingsSource,
    UserSettings,
};
use rosterwatch_core::types::{
    BoardUpdate, Notification, PeerId, PeerPresence, PresenceState, RemotePresence, SelfProfile,
};
use rosterwatch_notify::{
    HistoryStore, NotificationDispatcher, NotificationEngine, NotificationFormatter,
};

use crate::arrange::{DisplayPolicy, arrange};
use crate::scheduler::CycleTask;
use crate::signature::SignatureDebouncer;

/// External collaborators a cycle talks to.
#[derive(Debug, Clone)]
pub struct Collaborators {
    /// Remote presence service.
    pub api: Arc<dyn PresenceApi>,
    /// Avatar image downloads.
    pub avatar_source: Arc<dyn AvatarSource>,
    /// User-facing settings, read once per cycle.
    pub settings: Arc<dyn SettingsSource>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// UI layer.
    pub sink: Arc<dyn PresenceSink>,
    /// In-application banner output.
    pub banner: Arc<dyn NotificationChannel>,
    /// OS toast output.
    pub toast: Arc<dyn NotificationChannel>,
}

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// API key missing or the profile did not resolve; the board was reset.
    MissingConfiguration,
    /// The roster is empty; the board was reset.
    EmptyRoster,
    /// The visible result changed and was published.
    Published,
    /// Nothing visible changed; only the check time was refreshed.
    Unchanged,
    /// The cycle failed. `reset` tells whether the board was cleared
    /// because no cycle succeeded for too long.
    Failed {
        /// Whether the board was reset.
        reset: bool,
    },
}

/// State carried from one cycle to the next.
#[derive(Debug)]
struct SyncState {
    roster: RosterCache,
    history: HistoryStore,
    debouncer: SignatureDebouncer,
    last_success: Option<DateTime<Utc>>,
    last_self: Option<SelfProfile>,
}

/// The presence refresh cycle.
#[derive(Debug)]
pub struct PresenceCycle {
    api: Arc<dyn PresenceApi>,
    fetcher: PresenceFetcher,
    identity: IdentityResolver,
    avatars: AvatarCache,
    engine: NotificationEngine,
    dispatcher: NotificationDispatcher,
    settings: Arc<dyn SettingsSource>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn PresenceSink>,
    strings: Strings,
    display: DisplayConfig,
    stale_after: Duration,
    enabled: bool,
    rebaseline: AtomicBool,
    state: Mutex<SyncState>,
}

impl PresenceCycle {
    /// Build a cycle from configuration and collaborators.
    pub fn new(config: &AppConfig, deps: Collaborators) -> Self {
        let strings = Strings::new(config.strings.clone());
        let identity_ttl = std::time::Duration::from_secs(config.cache.identity_ttl_hours * 3600);

        Self {
            fetcher: PresenceFetcher::new(Arc::clone(&deps.api), config.remote.batch_size),
            identity: IdentityResolver::new(Arc::clone(&deps.api), identity_ttl),
            avatars: AvatarCache::new(&config.cache, deps.avatar_source),
            engine: NotificationEngine::new(Duration::seconds(
                config.notifications.cooldown_seconds as i64,
            )),
            dispatcher: NotificationDispatcher::new(
                NotificationFormatter::new(strings.clone()),
                deps.banner,
                deps.toast,
            ),
            api: deps.api,
            settings: deps.settings,
            clock: deps.clock,
            sink: deps.sink,
            strings,
            display: config.display.clone(),
            stale_after: Duration::minutes(config.polling.stale_reset_minutes as i64),
            enabled: config.polling.enabled,
            rebaseline: AtomicBool::new(false),
            state: Mutex::new(SyncState {
                roster: RosterCache::new(Duration::hours(config.cache.roster_ttl_hours as i64)),
                history: HistoryStore::new(),
                debouncer: SignatureDebouncer::new(),
                last_success: None,
                last_self: None,
            }),
        }
    }

    /// Avatar cache manager.
    pub fn avatars(&self) -> &AvatarCache {
        &self.avatars
    }

    /// Send a sample notification using the current settings.
    pub fn send_test_notification(&self) -> Option<Notification> {
        self.dispatcher
            .send_test_notification(&self.settings.snapshot())
    }

    /// Make the next cycle absorb its snapshot without notifying.
    pub fn request_rebaseline(&self) {
        self.rebaseline.store(true, Ordering::SeqCst);
    }

    /// Run one cycle. Errors are logged and reflected in the outcome.
    pub async fn run_once(&self) -> CycleOutcome {
        let now = self.clock.now();
        let settings = self.settings.snapshot();
        let mut state = self.state.lock().await;

        if self.rebaseline.swap(false, Ordering::SeqCst) {
            state.history.reset_baseline();
        }

        match self.refresh(&mut state, &settings, now).await {
            Ok(outcome) => outcome,
            Err(e) => self.fail(&mut state, &e, now),
        }
    }

    async fn refresh(
        &self,
        state: &mut SyncState,
        settings: &UserSettings,
        now: DateTime<Utc>,
    ) -> AppResult<CycleOutcome> {
        let Some(owner) = self.resolve_owner(settings).await else {
            self.reset(locale::STATUS_MISSING_CONFIG);
            state.debouncer.reset();
            state.last_self = None;
            return Ok(CycleOutcome::MissingConfiguration);
        };

        self.avatars.maybe_sweep(now);

        let roster = state
            .roster
            .peers(self.api.as_ref(), &settings.api_key, owner, now)
            .await?;
        if roster.is_empty() {
            self.reset(locale::STATUS_EMPTY_ROSTER);
            state.debouncer.mark_empty();
            state.last_success = Some(now);
            return Ok(CycleOutcome::EmptyRoster);
        }

        let mut ids = roster;
        if !ids.contains(&owner) {
            ids.push(owner);
        }
        let (own, others): (Vec<RemotePresence>, Vec<RemotePresence>) = self
            .fetcher
            .fetch(&settings.api_key, &ids)
            .await?
            .into_iter()
            .partition(|r| r.id == owner);

        self.publish_self(state, owner, own.first()).await;

        let mut peers = Vec::with_capacity(others.len());
        for remote in &others {
            peers.push(self.snapshot(remote).await);
        }

        let policy = DisplayPolicy::new(&self.display, settings.show_offline);
        let mut view = arrange(&peers, &policy, &self.strings);
        let urls: HashMap<PeerId, &str> = others
            .iter()
            .filter_map(|r| Some((r.id, r.avatar_url.as_deref()?)))
            .collect();
        let mut budget = self.avatars.budget();
        for row in &mut view.online {
            row.avatar = self
                .avatars
                .resolve(row.id, urls.get(&row.id).copied(), &mut budget)
                .await;
        }

        if let Some(transition) =
            self.engine
                .evaluate(&mut state.history, &peers, Some(owner), settings, now)
        {
            self.dispatcher.dispatch(&transition, settings.output);
        }

        debug!(
            online = view.counts.online,
            in_game = view.counts.in_game,
            offline = view.counts.offline,
            "Presence refreshed"
        );

        let outcome = if state.debouncer.should_publish(&view) {
            self.sink.apply(BoardUpdate::Published {
                view,
                checked_at: now,
            });
            CycleOutcome::Published
        } else {
            self.sink.apply(BoardUpdate::Unchanged { checked_at: now });
            CycleOutcome::Unchanged
        };
        state.last_success = Some(now);
        Ok(outcome)
    }

    async fn resolve_owner(&self, settings: &UserSettings) -> Option<PeerId> {
        if settings.api_key.is_empty() || settings.profile.is_empty() {
            return None;
        }
        self.identity
            .resolve(&settings.api_key, &settings.profile)
            .await
    }

    /// Per-peer snapshot. Offline peers only get an avatar from the local
    /// cache; online peers fall back to the remote URL.
    async fn snapshot(&self, remote: &RemotePresence) -> PeerPresence {
        let mut peer = PeerPresence::from_remote(remote, None);
        peer.avatar_ref = match self.avatars.cached_ref(peer.id).await {
            Some(local) => Some(local),
            None if peer.state.is_online() => remote.avatar_url.clone(),
            None => None,
        };
        peer
    }

    /// Publish the primary account's own presence when it changed.
    ///
    /// Its avatar download has a budget of its own.
    async fn publish_self(
        &self,
        state: &mut SyncState,
        owner: PeerId,
        own: Option<&RemotePresence>,
    ) {
        let profile = match own {
            Some(remote) => {
                let me = PeerPresence::from_remote(remote, None);
                let mut budget = DownloadBudget::new(1);
                let avatar = self
                    .avatars
                    .resolve(owner, remote.avatar_url.as_deref(), &mut budget)
                    .await;
                SelfProfile {
                    display_name: Some(me.display_name),
                    state: me.state,
                    state_label: self.strings.state_label(me.state).to_string(),
                    activity: me.activity,
                    avatar,
                }
            }
            None => SelfProfile {
                display_name: None,
                state: PresenceState::Offline,
                state_label: self.strings.state_label(PresenceState::Offline).to_string(),
                activity: None,
                avatar: None,
            },
        };

        if state.last_self.as_ref() != Some(&profile) {
            self.sink.apply(BoardUpdate::SelfProfile(profile.clone()));
            state.last_self = Some(profile);
        }
    }

    fn reset(&self, status_key: &str) {
        self.sink.apply(BoardUpdate::Reset {
            message: self.strings.get(status_key).to_string(),
        });
    }

    fn fail(&self, state: &mut SyncState, err: &AppError, now: DateTime<Utc>) -> CycleOutcome {
        error!(error = %err, transient = err.is_transient(), "Presence refresh failed");

        let stale = state
            .last_success
            .is_none_or(|at| now - at > self.stale_after);
        if stale {
            info!("No successful refresh for too long, resetting board");
            self.reset(locale::STATUS_STALE);
            state.debouncer.reset();
        }
        CycleOutcome::Failed { reset: stale }
    }
}

#[async_trait]
impl CycleTask for PresenceCycle {
    async fn run_cycle(&self) {
        let outcome = self.run_once().await;
        debug!(?outcome, "Refresh cycle finished");
    }

    fn should_run(&self) -> bool {
        self.enabled
    }

    fn on_resume(&self) {
        self.request_rebaseline();
    }
}
