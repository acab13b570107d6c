//! Cycle results handed to the UI layer.
//!
//! A cycle computes one of these values and passes it to the publish step;
//! nothing here is shared mutable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::PeerId;
use super::presence::PresenceState;

/// Aggregate counts over the whole roster, not just the displayed rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceCounts {
    /// Peers in any state other than offline.
    pub online: usize,
    /// Peers running an activity.
    pub in_game: usize,
    /// Offline peers.
    pub offline: usize,
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEntry {
    /// Peer identifier.
    pub id: PeerId,
    /// Display name.
    pub display_name: String,
    /// Presence state.
    pub state: PresenceState,
    /// Localized state label.
    pub state_label: String,
    /// Current activity.
    pub activity: Option<String>,
    /// Local file URI or remote URL of the avatar.
    pub avatar: Option<String>,
}

/// The externally visible result set of one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceView {
    /// Counts across all peers.
    pub counts: PresenceCounts,
    /// Online rows, sorted and truncated.
    pub online: Vec<PeerEntry>,
    /// Offline rows, sorted and truncated; empty unless enabled.
    pub offline: Vec<PeerEntry>,
}

/// The primary account's own presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfProfile {
    /// Display name, `None` when the service did not return the account.
    pub display_name: Option<String>,
    /// Presence state.
    pub state: PresenceState,
    /// Localized state label.
    pub state_label: String,
    /// Current activity.
    pub activity: Option<String>,
    /// Avatar reference.
    pub avatar: Option<String>,
}

/// A change delivered to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardUpdate {
    /// The visible result changed; replace counts and lists.
    Published {
        /// New visible result.
        view: PresenceView,
        /// Time of the successful check.
        checked_at: DateTime<Utc>,
    },
    /// Nothing visible changed; only refresh the last-check timestamp.
    Unchanged {
        /// Time of the successful check.
        checked_at: DateTime<Utc>,
    },
    /// Zero all counts, clear the lists, and show an error status.
    Reset {
        /// User-visible status text.
        message: String,
    },
    /// The primary account's own presence.
    SelfProfile(SelfProfile),
}
