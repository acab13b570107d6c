//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use rosterwatch_core::config::AppConfig;
use rosterwatch_core::error::AppError;
use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::{
    AvatarSource, Clock, NotificationChannel, PresenceApi, SharedSettings, UserSettings,
};
use rosterwatch_core::types::{Notification, PeerId, RemotePresence};
use rosterwatch_worker::{BoardSink, Collaborators, PresenceBoard, PresenceCycle};

/// Canonical id of the primary account.
pub const OWNER: PeerId = PeerId(76_561_198_000_000_001);

/// Canonical id of the `n`-th peer.
pub fn peer(n: u64) -> PeerId {
    PeerId(76_561_198_000_000_100 + n)
}

/// In-memory remote presence service.
#[derive(Debug, Default)]
pub struct FakeApi {
    vanity: Mutex<HashMap<String, PeerId>>,
    roster: Mutex<Vec<PeerId>>,
    presence: Mutex<HashMap<PeerId, RemotePresence>>,
    failing: AtomicBool,
    roster_calls: AtomicUsize,
    vanity_calls: AtomicUsize,
}

impl FakeApi {
    /// Register a vanity name.
    pub fn add_vanity(&self, name: &str, id: PeerId) {
        self.vanity.lock().unwrap().insert(name.to_string(), id);
    }

    /// Replace the roster of the primary account.
    pub fn set_roster(&self, ids: &[PeerId]) {
        *self.roster.lock().unwrap() = ids.to_vec();
    }

    /// Set the presence reported for `id`.
    pub fn set_presence(
        &self,
        id: PeerId,
        name: &str,
        state_code: i32,
        activity: Option<&str>,
        avatar_url: Option<&str>,
    ) {
        self.presence.lock().unwrap().insert(
            id,
            RemotePresence {
                id,
                display_name: Some(name.to_string()),
                state_code,
                activity: activity.map(str::to_string),
                avatar_url: avatar_url.map(str::to_string),
            },
        );
    }

    /// Make every call fail, or succeed again.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of roster fetches served.
    pub fn roster_calls(&self) -> usize {
        self.roster_calls.load(Ordering::SeqCst)
    }

    /// Number of vanity lookups served.
    pub fn vanity_calls(&self) -> usize {
        self.vanity_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external("Remote service unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PresenceApi for FakeApi {
    async fn resolve_vanity(&self, _api_key: &str, name: &str) -> AppResult<Option<PeerId>> {
        self.check()?;
        self.vanity_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vanity.lock().unwrap().get(name).copied())
    }

    async fn roster_ids(&self, _api_key: &str, _owner: PeerId) -> AppResult<Vec<PeerId>> {
        self.check()?;
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.roster.lock().unwrap().clone())
    }

    async fn presence_batch(
        &self,
        _api_key: &str,
        ids: &[PeerId],
    ) -> AppResult<Vec<RemotePresence>> {
        self.check()?;
        let presence = self.presence.lock().unwrap();
        Ok(ids.iter().filter_map(|id| presence.get(id).cloned()).collect())
    }
}

/// Avatar source serving a fixed image and counting downloads.
#[derive(Debug, Default)]
pub struct MemoryAvatars {
    fetches: AtomicUsize,
}

impl MemoryAvatars {
    /// Number of downloads served.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvatarSource for MemoryAvatars {
    async fn fetch(&self, _url: &str) -> AppResult<Bytes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Bytes::from_static(b"\xff\xd8\xff\xe0avatar"))
    }
}

/// Clock moved by hand.
#[derive(Debug)]
pub struct FakeClock(Mutex<DateTime<Utc>>);

impl FakeClock {
    /// Clock starting at a fixed instant.
    pub fn new() -> Self {
        Self(Mutex::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ))
    }

    /// Move forward.
    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Channel that records every delivered notification.
#[derive(Debug, Default)]
pub struct RecordingChannel(Mutex<Vec<Notification>>);

impl RecordingChannel {
    /// Delivered notifications, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.0.lock().unwrap().clone()
    }

    /// Number of delivered notifications.
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver(&self, notification: &Notification) {
        self.0.lock().unwrap().push(notification.clone());
    }
}

/// A presence cycle wired to fakes.
pub struct TestHarness {
    /// The cycle under test.
    pub cycle: Arc<PresenceCycle>,
    /// Remote service fake.
    pub api: Arc<FakeApi>,
    /// Avatar download fake.
    pub avatars: Arc<MemoryAvatars>,
    /// Published board.
    pub board: Arc<BoardSink>,
    /// Banner output.
    pub banner: Arc<RecordingChannel>,
    /// Toast output.
    pub toast: Arc<RecordingChannel>,
    /// Time source.
    pub clock: Arc<FakeClock>,
    /// User settings.
    pub settings: Arc<SharedSettings>,
    /// Avatar cache directory.
    pub _dir: TempDir,
}

impl TestHarness {
    /// Harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Harness with configuration edits applied on top of the defaults.
    pub fn with_config(edit: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.account.api_key = "KEY".into();
        config.account.profile = OWNER.to_string();
        config.display.show_offline = true;
        config.cache.avatar_dir = dir.path().display().to_string();
        edit(&mut config);

        let api = Arc::new(FakeApi::default());
        let avatars = Arc::new(MemoryAvatars::default());
        let board = Arc::new(BoardSink::new());
        let banner = Arc::new(RecordingChannel::default());
        let toast = Arc::new(RecordingChannel::default());
        let clock = Arc::new(FakeClock::new());
        let settings = Arc::new(SharedSettings::new(UserSettings::from(&config)));

        let cycle = Arc::new(PresenceCycle::new(
            &config,
            Collaborators {
                api: api.clone(),
                avatar_source: avatars.clone(),
                settings: settings.clone(),
                clock: clock.clone(),
                sink: board.clone(),
                banner: banner.clone(),
                toast: toast.clone(),
            },
        ));

        Self {
            cycle,
            api,
            avatars,
            board,
            banner,
            toast,
            clock,
            settings,
            _dir: dir,
        }
    }

    /// Current board.
    pub fn board(&self) -> PresenceBoard {
        self.board.snapshot()
    }

    /// Advance the clock by one default refresh interval.
    pub fn next_minute(&self) {
        self.clock.advance(Duration::seconds(60));
    }
}

/// Poll `condition` until it holds or two seconds pass.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    condition()
}
