//! Localized user-visible strings.
//!
//! Every string is looked up by key. Overrides come from the `[strings]`
//! configuration table; a missing or blank override falls back to the
//! built-in English text.

use std::collections::HashMap;

use crate::types::PresenceState;

/// Label for [`PresenceState::Online`].
pub const STATE_ONLINE: &str = "state_online";
/// Label for [`PresenceState::InGame`].
pub const STATE_IN_GAME: &str = "state_in_game";
/// Label for [`PresenceState::Away`] and [`PresenceState::Snoozed`].
pub const STATE_AWAY: &str = "state_away";
/// Label for [`PresenceState::Busy`].
pub const STATE_BUSY: &str = "state_busy";
/// Label for [`PresenceState::Offline`].
pub const STATE_OFFLINE: &str = "state_offline";
/// Banner text when a peer connects.
pub const BANNER_CONNECT: &str = "banner_connect";
/// Banner text when a peer starts an activity.
pub const BANNER_ACTIVITY: &str = "banner_activity";
/// Toast body when a peer connects.
pub const TOAST_CONNECT: &str = "toast_connect";
/// Toast body when a peer starts an activity.
pub const TOAST_ACTIVITY: &str = "toast_activity";
/// Name used when a peer has no display name.
pub const PEER_FALLBACK_NAME: &str = "peer_fallback_name";
/// Activity text used when the service reports in-game without a title.
pub const ACTIVITY_FALLBACK: &str = "activity_fallback";
/// Status when the API key or profile is missing or unresolved.
pub const STATUS_MISSING_CONFIG: &str = "status_missing_config";
/// Status when the roster is empty.
pub const STATUS_EMPTY_ROSTER: &str = "status_empty_roster";
/// Status after a long run of failed cycles.
pub const STATUS_STALE: &str = "status_stale";

fn builtin(key: &str) -> &'static str {
    match key {
        STATE_ONLINE => "Online",
        STATE_IN_GAME => "In game",
        STATE_AWAY => "Away",
        STATE_BUSY => "Busy",
        STATE_OFFLINE => "Offline",
        BANNER_CONNECT => "{name} is now {state}",
        BANNER_ACTIVITY => "{name} started playing {activity}",
        TOAST_CONNECT => "Now {state}",
        TOAST_ACTIVITY => "Playing {activity}",
        PEER_FALLBACK_NAME => "Friend",
        ACTIVITY_FALLBACK => "In game",
        STATUS_MISSING_CONFIG => "Missing API key or profile.",
        STATUS_EMPTY_ROSTER => "No friends returned by the remote API.",
        STATUS_STALE => "Remote API error (no successful refresh for 10 minutes).",
        _ => "",
    }
}

/// String table with user overrides on top of the built-in text.
#[derive(Debug, Clone, Default)]
pub struct Strings {
    overrides: HashMap<String, String>,
}

impl Strings {
    /// Create a table from configuration overrides.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Look up a string, falling back to the built-in text.
    pub fn get(&self, key: &str) -> &str {
        match self.overrides.get(key) {
            Some(value) if !value.trim().is_empty() => value,
            _ => builtin(key),
        }
    }

    /// Localized label for a presence state.
    pub fn state_label(&self, state: PresenceState) -> &str {
        let key = match state {
            PresenceState::Online => STATE_ONLINE,
            PresenceState::InGame => STATE_IN_GAME,
            PresenceState::Away | PresenceState::Snoozed => STATE_AWAY,
            PresenceState::Busy => STATE_BUSY,
            PresenceState::Offline => STATE_OFFLINE,
        };
        self.get(key)
    }

    /// Render a template, substituting `{name}`, `{state}`, and `{activity}`.
    pub fn render(&self, key: &str, name: &str, state: &str, activity: &str) -> String {
        self.get(key)
            .replace("{name}", name)
            .replace("{state}", state)
            .replace("{activity}", activity)
    }
}
