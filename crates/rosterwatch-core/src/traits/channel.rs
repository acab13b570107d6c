//! Notification output channel.

use crate::types::Notification;

/// One notification output (in-application banner, OS toast, ...).
pub trait NotificationChannel: Send + Sync + std::fmt::Debug + 'static {
    /// Short channel name for logs.
    fn name(&self) -> &str;

    /// Show the notification. Failures are the channel's to log.
    fn deliver(&self, notification: &Notification);
}
