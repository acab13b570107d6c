//! Notification dispatcher: routes rendered notifications to output channels.

use std::sync::Arc;

use tracing::{debug, info};

use rosterwatch_core::config::NotificationOutput;
use rosterwatch_core::traits::{NotificationChannel, UserSettings};
use rosterwatch_core::types::{Notification, PeerId, PeerPresence, PresenceState, TransitionKind};

use crate::engine::Transition;
use crate::formatter::NotificationFormatter;

/// Placeholder peer name used by the test notification.
pub const TEST_PEER_NAME: &str = "FriendName";

/// Formats transitions and hands them to the banner and toast channels
/// selected by the output mode.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    formatter: NotificationFormatter,
    banner: Arc<dyn NotificationChannel>,
    toast: Arc<dyn NotificationChannel>,
}

impl NotificationDispatcher {
    /// Create a dispatcher over the two output channels.
    pub fn new(
        formatter: NotificationFormatter,
        banner: Arc<dyn NotificationChannel>,
        toast: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            formatter,
            banner,
            toast,
        }
    }

    /// Render `transition` and deliver it to every channel `output` selects.
    ///
    /// Returns the rendered notification, or `None` when output is off.
    pub fn dispatch(
        &self,
        transition: &Transition,
        output: NotificationOutput,
    ) -> Option<Notification> {
        if output == NotificationOutput::Off {
            return None;
        }

        let notification = self.formatter.format(transition);
        for channel in self.channels(output) {
            debug!(channel = channel.name(), peer = %notification.peer_id, "Delivering notification");
            channel.deliver(&notification);
        }
        info!(peer = %notification.peer_id, kind = ?notification.kind, "Notification sent");
        Some(notification)
    }

    /// Send a sample connect notification for a placeholder peer.
    ///
    /// Follows the same gating as real notifications: nothing is sent when
    /// output is off or both categories are disabled.
    pub fn send_test_notification(&self, settings: &UserSettings) -> Option<Notification> {
        if !settings.notifications_enabled() {
            debug!("Test notification skipped, notifications disabled");
            return None;
        }

        let transition = Transition {
            peer: PeerPresence {
                id: PeerId(0),
                display_name: TEST_PEER_NAME.to_string(),
                state: PresenceState::Online,
                activity: None,
                avatar_ref: None,
            },
            kind: TransitionKind::Connect,
        };
        self.dispatch(&transition, settings.output)
    }

    fn channels(&self, output: NotificationOutput) -> Vec<&Arc<dyn NotificationChannel>> {
        let mut selected = Vec::with_capacity(2);
        if output.sends_banner() {
            selected.push(&self.banner);
        }
        if output.sends_toast() {
            selected.push(&self.toast);
        }
        selected
    }
}
