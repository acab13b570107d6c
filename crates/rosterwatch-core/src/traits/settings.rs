//! User-facing settings consumed read-only by the engine.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, NotificationOutput};

/// Snapshot of the user-editable settings taken at the start of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Remote API key.
    pub api_key: String,
    /// Primary profile reference.
    pub profile: String,
    /// Whether the offline list is published.
    pub show_offline: bool,
    /// Notification output channels.
    pub output: NotificationOutput,
    /// Notify when a peer connects.
    pub notify_on_connect: bool,
    /// Notify when a peer starts an activity.
    pub notify_on_activity_start: bool,
}

impl UserSettings {
    /// Whether any notification category is enabled on any channel.
    pub fn notifications_enabled(&self) -> bool {
        self.output != NotificationOutput::Off
            && (self.notify_on_connect || self.notify_on_activity_start)
    }
}

impl From<&AppConfig> for UserSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.account.api_key.trim().to_string(),
            profile: config.account.profile.trim().to_string(),
            show_offline: config.display.show_offline,
            output: config.notifications.output,
            notify_on_connect: config.notifications.on_connect,
            notify_on_activity_start: config.notifications.on_activity_start,
        }
    }
}

/// Provides the current settings snapshot.
pub trait SettingsSource: Send + Sync + std::fmt::Debug + 'static {
    /// Current settings.
    fn snapshot(&self) -> UserSettings;
}

/// Settings held in memory and replaceable at runtime by the host.
#[derive(Debug)]
pub struct SharedSettings {
    inner: RwLock<UserSettings>,
}

impl SharedSettings {
    /// Create from an initial snapshot.
    pub fn new(initial: UserSettings) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    /// Apply an edit; visible to the next cycle.
    pub fn update(&self, edit: impl FnOnce(&mut UserSettings)) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        edit(&mut guard);
    }
}

impl SettingsSource for SharedSettings {
    fn snapshot(&self) -> UserSettings {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
