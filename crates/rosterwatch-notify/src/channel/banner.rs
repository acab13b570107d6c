//! In-application transient banner.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use rosterwatch_core::traits::NotificationChannel;
use rosterwatch_core::types::Notification;

/// What the banner currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BannerState {
    /// Whether the banner is on screen.
    pub visible: bool,
    /// Banner text.
    pub message: String,
    /// Avatar next to the text.
    pub avatar: Option<String>,
    /// Incremented on every show.
    pub generation: u64,
}

/// Banner that hides itself after a fixed duration.
///
/// Showing a new banner cancels the pending dismiss timer of the previous
/// one, so the last shown banner always gets its full duration.
#[derive(Debug)]
pub struct BannerChannel {
    state: watch::Sender<BannerState>,
    duration: Duration,
    dismiss: Mutex<Option<JoinHandle<()>>>,
}

impl BannerChannel {
    /// Create a banner shown for `duration`.
    pub fn new(duration: Duration) -> Self {
        let (state, _) = watch::channel(BannerState::default());
        Self {
            state,
            duration,
            dismiss: Mutex::new(None),
        }
    }

    /// Observe banner state changes.
    pub fn subscribe(&self) -> watch::Receiver<BannerState> {
        self.state.subscribe()
    }

    /// Current banner state.
    pub fn current(&self) -> BannerState {
        self.state.borrow().clone()
    }

    /// Show a message and restart the dismiss timer.
    pub fn show(&self, message: &str, avatar: Option<&str>) {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.visible = true;
            s.message = message.to_string();
            s.avatar = avatar.map(str::to_string);
            generation = s.generation;
        });

        let mut pending = self.dismiss.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, banner will not auto-dismiss");
            return;
        };
        let state = self.state.clone();
        let duration = self.duration;
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            state.send_if_modified(|s| {
                if s.generation != generation || !s.visible {
                    return false;
                }
                s.visible = false;
                true
            });
        }));
    }

    /// Hide immediately and cancel the dismiss timer.
    pub fn hide(&self) {
        if let Some(pending) = self.dismiss.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pending.abort();
        }
        self.state.send_if_modified(|s| std::mem::replace(&mut s.visible, false));
    }
}

impl NotificationChannel for BannerChannel {
    fn name(&self) -> &str {
        "banner"
    }

    fn deliver(&self, notification: &Notification) {
        debug!(peer = %notification.peer_id, "Showing banner");
        self.show(&notification.banner_text, notification.avatar.as_deref());
    }
}
