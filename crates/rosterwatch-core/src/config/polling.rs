//! Refresh scheduling configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Controls the recurring refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PollingConfig {
    /// Whether the refresh loop runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between two refresh ticks.
    #[serde(default = "default_refresh_seconds")]
    #[validate(range(min = 10, max = 3600))]
    pub refresh_seconds: u64,
    /// Minutes to suspend polling after a foreground activity starts.
    #[serde(default = "default_pause_minutes")]
    #[validate(range(max = 240))]
    pub pause_on_activity_minutes: u64,
    /// Minutes without a successful cycle before the display is reset.
    #[serde(default = "default_stale_reset_minutes")]
    #[validate(range(min = 1, max = 1440))]
    pub stale_reset_minutes: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_seconds: default_refresh_seconds(),
            pause_on_activity_minutes: default_pause_minutes(),
            stale_reset_minutes: default_stale_reset_minutes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_refresh_seconds() -> u64 {
    60
}

fn default_pause_minutes() -> u64 {
    10
}

fn default_stale_reset_minutes() -> u64 {
    10
}
