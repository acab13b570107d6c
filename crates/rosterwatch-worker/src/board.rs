//! The published presence board.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use rosterwatch_core::traits::PresenceSink;
use rosterwatch_core::types::{BoardUpdate, PresenceView, SelfProfile};

/// Minimum age before a board counts as stale.
const MIN_STALE_AFTER: Duration = Duration::from_secs(90);

/// Externally visible state, as the UI layer would bind to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresenceBoard {
    /// Counts and display lists.
    pub view: PresenceView,
    /// Error status, `None` after a successful cycle.
    pub status: Option<String>,
    /// Time of the last successful check.
    pub last_checked: Option<DateTime<Utc>>,
    /// The primary account's own presence.
    pub self_profile: Option<SelfProfile>,
    /// Number of times the view was replaced.
    pub revision: u64,
}

impl PresenceBoard {
    /// Apply one update.
    pub fn apply(&mut self, update: BoardUpdate) {
        match update {
            BoardUpdate::Published { view, checked_at } => {
                self.view = view;
                self.status = None;
                self.last_checked = Some(checked_at);
                self.revision += 1;
            }
            BoardUpdate::Unchanged { checked_at } => {
                self.status = None;
                self.last_checked = Some(checked_at);
            }
            BoardUpdate::Reset { message } => {
                self.view = PresenceView::default();
                self.status = Some(message);
                self.last_checked = None;
                self.revision += 1;
            }
            BoardUpdate::SelfProfile(profile) => {
                self.self_profile = Some(profile);
            }
        }
    }

    /// Whether the board is too old to trust.
    ///
    /// True without any successful check, or when the last one is older than
    /// three refresh intervals (at least 90 seconds).
    pub fn is_stale(&self, now: DateTime<Utc>, refresh_interval: Duration) -> bool {
        let Some(checked) = self.last_checked else {
            return true;
        };
        let limit = (refresh_interval * 3).max(MIN_STALE_AFTER);
        match (now - checked).to_std() {
            Ok(age) => age > limit,
            Err(_) => false,
        }
    }
}

/// [`PresenceSink`] that publishes into a watch channel.
///
/// Any thread may apply updates; subscribers see them in order.
#[derive(Debug)]
pub struct BoardSink {
    tx: watch::Sender<PresenceBoard>,
}

impl BoardSink {
    /// Create an empty board.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PresenceBoard::default());
        Self { tx }
    }

    /// Observe board changes.
    pub fn subscribe(&self) -> watch::Receiver<PresenceBoard> {
        self.tx.subscribe()
    }

    /// Current board.
    pub fn snapshot(&self) -> PresenceBoard {
        self.tx.borrow().clone()
    }
}

impl Default for BoardSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceSink for BoardSink {
    fn apply(&self, update: BoardUpdate) {
        self.tx.send_modify(|board| board.apply(update));
    }
}
