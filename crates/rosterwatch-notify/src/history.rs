//! Per-peer observation history.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use rosterwatch_core::types::{PeerId, PeerPresence, PresenceState};

/// What was last observed about one peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerHistory {
    /// Last observed state.
    pub state: PresenceState,
    /// Last observed activity.
    pub activity: Option<String>,
    /// When a notification about this peer was last emitted.
    pub last_notified: Option<DateTime<Utc>>,
}

impl Default for PeerHistory {
    fn default() -> Self {
        Self {
            state: PresenceState::Offline,
            activity: None,
            last_notified: None,
        }
    }
}

/// Keyed history store owned by the refresh cycle.
///
/// Entries are created on first observation and never removed, so the map
/// is bounded by the roster size.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    peers: HashMap<PeerId, PeerHistory>,
    baseline: bool,
}

impl HistoryStore {
    /// Create an empty store without a baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// History for a peer, if it was ever observed.
    pub fn get(&self, id: PeerId) -> Option<&PeerHistory> {
        self.peers.get(&id)
    }

    /// Number of peers observed so far.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether no peer was observed yet.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Whether a snapshot was absorbed since start or the last reset.
    pub fn has_baseline(&self) -> bool {
        self.baseline
    }

    /// Mark the baseline as established.
    pub fn set_baseline(&mut self) {
        self.baseline = true;
    }

    /// Require the next snapshot to be absorbed silently.
    pub fn reset_baseline(&mut self) {
        self.baseline = false;
    }

    /// Record the latest observed state and activity of a peer.
    pub fn observe(&mut self, peer: &PeerPresence) {
        let entry = self.peers.entry(peer.id).or_default();
        entry.state = peer.state;
        entry.activity = peer.activity.clone();
    }

    /// Record that a notification about `id` was emitted at `at`.
    pub fn mark_notified(&mut self, id: PeerId, at: DateTime<Utc>) {
        self.peers.entry(id).or_default().last_notified = Some(at);
    }

    /// Whether `id` was notified less than `cooldown` before `now`.
    pub fn is_cooling_down(&self, id: PeerId, now: DateTime<Utc>, cooldown: Duration) -> bool {
        self.peers
            .get(&id)
            .and_then(|h| h.last_notified)
            .is_some_and(|at| now - at < cooldown)
    }
}
