//! Notification configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which output channels receive notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutput {
    /// No channel; transitions are only absorbed into history.
    Off,
    /// In-application banner only.
    #[default]
    Banner,
    /// OS-level toast only.
    Toast,
    /// Banner and toast.
    Both,
}

impl NotificationOutput {
    /// Whether the in-application banner is active.
    pub fn sends_banner(self) -> bool {
        matches!(self, Self::Banner | Self::Both)
    }

    /// Whether the OS toast is active.
    pub fn sends_toast(self) -> bool {
        matches!(self, Self::Toast | Self::Both)
    }
}

/// Notification toggles and timings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotificationConfig {
    /// Output channel selection.
    #[serde(default)]
    pub output: NotificationOutput,
    /// Notify when a peer comes online.
    #[serde(default = "default_true")]
    pub on_connect: bool,
    /// Notify when a peer starts an activity.
    #[serde(default = "default_true")]
    pub on_activity_start: bool,
    /// Minimum seconds between two notifications about the same peer.
    #[serde(default = "default_cooldown")]
    #[validate(range(max = 3600))]
    pub cooldown_seconds: u64,
    /// Seconds before the in-application banner hides itself.
    #[serde(default = "default_banner_seconds")]
    #[validate(range(min = 1, max = 120))]
    pub banner_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            output: NotificationOutput::default(),
            on_connect: true,
            on_activity_start: true,
            cooldown_seconds: default_cooldown(),
            banner_seconds: default_banner_seconds(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cooldown() -> u64 {
    5
}

fn default_banner_seconds() -> u64 {
    6
}
