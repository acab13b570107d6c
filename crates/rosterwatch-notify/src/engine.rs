//! Presence diff and notification decision.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use rosterwatch_core::traits::UserSettings;
use rosterwatch_core::types::{PeerId, PeerPresence, PresenceState, TransitionKind};

use crate::history::{HistoryStore, PeerHistory};

/// A qualifying transition selected for notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Fresh snapshot of the peer.
    pub peer: PeerPresence,
    /// Transition category.
    pub kind: TransitionKind,
}

/// Compares fresh snapshots with [`HistoryStore`] and picks at most one
/// notification per cycle.
///
/// Rules:
/// 1. Without a baseline, or with notifications disabled, the snapshot is
///    absorbed silently and the baseline is set. A snapshot with no peers
///    other than `self_id` never sets the baseline.
/// 2. Connect (offline to anything else) wins over activity start for the
///    same peer.
/// 3. A peer notified within the cooldown is skipped, history still updated.
/// 4. The first peer that qualifies outside its cooldown is selected. Every
///    later peer is only absorbed, so one cycle yields one notification.
#[derive(Debug, Clone)]
pub struct NotificationEngine {
    cooldown: Duration,
}

impl NotificationEngine {
    /// Create an engine with the given per-peer cooldown.
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    /// Absorb `peers` into `store` and return the transition to notify, if any.
    ///
    /// Peers are scanned in slice order; `self_id` is never a target.
    pub fn evaluate(
        &self,
        store: &mut HistoryStore,
        peers: &[PeerPresence],
        self_id: Option<PeerId>,
        settings: &UserSettings,
        now: DateTime<Utc>,
    ) -> Option<Transition> {
        let targets: Vec<&PeerPresence> =
            peers.iter().filter(|p| Some(p.id) != self_id).collect();
        if targets.is_empty() {
            trace!("Snapshot has no peers, baseline unchanged");
            return None;
        }

        if !store.has_baseline() || !settings.notifications_enabled() {
            for peer in targets {
                store.observe(peer);
            }
            store.set_baseline();
            trace!("Snapshot absorbed as baseline");
            return None;
        }

        let mut selected = None;
        for peer in targets {
            if selected.is_some() {
                store.observe(peer);
                continue;
            }

            let previous = store.get(peer.id).cloned().unwrap_or_default();
            let kind = classify(&previous, peer, settings);
            match kind {
                Some(kind) if store.is_cooling_down(peer.id, now, self.cooldown) => {
                    debug!(peer = %peer.id, ?kind, "Notification suppressed by cooldown");
                }
                Some(kind) => {
                    store.mark_notified(peer.id, now);
                    selected = Some(Transition {
                        peer: peer.clone(),
                        kind,
                    });
                }
                None => {}
            }
            store.observe(peer);
        }
        selected
    }
}

/// Enabled transition category for one peer, connect first.
fn classify(
    previous: &PeerHistory,
    current: &PeerPresence,
    settings: &UserSettings,
) -> Option<TransitionKind> {
    let connected =
        previous.state == PresenceState::Offline && current.state != PresenceState::Offline;
    let entered_game =
        previous.state != PresenceState::InGame && current.state == PresenceState::InGame;
    let started_activity = previous.activity.is_none() && current.activity.is_some();

    if settings.notify_on_connect && connected {
        Some(TransitionKind::Connect)
    } else if settings.notify_on_activity_start && (entered_game || started_activity) {
        Some(TransitionKind::ActivityStart)
    } else {
        None
    }
}
