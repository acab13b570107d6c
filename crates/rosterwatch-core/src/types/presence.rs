//! Presence state definitions and per-peer snapshots.

use serde::{Deserialize, Serialize};

use super::id::PeerId;

/// Peer presence state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceState {
    /// Not connected.
    Offline,
    /// Connected with no more specific status.
    Online,
    /// Marked away.
    Away,
    /// Do not disturb.
    Busy,
    /// Away for a long time.
    Snoozed,
    /// Running an activity (e.g. a game).
    InGame,
}

impl PresenceState {
    /// Map a remote numeric state code to a presence state.
    ///
    /// Any non-blank activity name wins over the numeric code.
    pub fn from_code(code: i32, activity: Option<&str>) -> Self {
        if activity.is_some_and(|a| !a.trim().is_empty()) {
            return Self::InGame;
        }

        match code {
            1 | 5 | 6 => Self::Online,
            2 => Self::Busy,
            3 => Self::Away,
            4 => Self::Snoozed,
            _ => Self::Offline,
        }
    }

    /// Sort rank for the online list. Lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Self::InGame => 0,
            Self::Online => 1,
            Self::Away => 2,
            Self::Busy => 3,
            Self::Snoozed => 4,
            Self::Offline => 9,
        }
    }

    /// Whether the peer counts as connected.
    pub fn is_online(self) -> bool {
        self != Self::Offline
    }

    /// Stable machine-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Snoozed => "snoozed",
            Self::InGame => "in_game",
        }
    }
}

/// One presence record exactly as the remote service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePresence {
    /// Peer identifier.
    pub id: PeerId,
    /// Display name, if the service returned one.
    pub display_name: Option<String>,
    /// Raw numeric state code.
    pub state_code: i32,
    /// Current activity name.
    pub activity: Option<String>,
    /// Remote avatar image URL.
    pub avatar_url: Option<String>,
}

/// One peer's snapshot for the current cycle. Replaced every cycle, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPresence {
    /// Stable external identifier.
    pub id: PeerId,
    /// Display name; empty when the service did not provide one.
    pub display_name: String,
    /// Mapped presence state.
    pub state: PresenceState,
    /// Current activity, `None` when blank.
    pub activity: Option<String>,
    /// Local file URI when cached, otherwise the remote URL.
    pub avatar_ref: Option<String>,
}

impl PeerPresence {
    /// Build a snapshot from a remote record and a resolved avatar reference.
    pub fn from_remote(remote: &RemotePresence, avatar_ref: Option<String>) -> Self {
        let activity = remote
            .activity
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        Self {
            id: remote.id,
            display_name: remote.display_name.clone().unwrap_or_default(),
            state: PresenceState::from_code(remote.state_code, activity.as_deref()),
            activity,
            avatar_ref,
        }
    }
}
