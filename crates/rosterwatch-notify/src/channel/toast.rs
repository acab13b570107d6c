//! OS-level toast output.

use std::sync::Arc;

use tracing::{info, warn};

use rosterwatch_core::result::AppResult;
use rosterwatch_core::traits::NotificationChannel;
use rosterwatch_core::types::Notification;

/// Platform toast backend.
pub trait DesktopToaster: Send + Sync + std::fmt::Debug + 'static {
    /// Show a toast with a title, a body line, and an optional image.
    fn show(&self, title: &str, body: &str, image: Option<&str>) -> AppResult<()>;
}

/// Toaster for headless runs: writes the toast to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogToaster;

impl DesktopToaster for LogToaster {
    fn show(&self, title: &str, body: &str, image: Option<&str>) -> AppResult<()> {
        info!(title, body, image, "Toast");
        Ok(())
    }
}

/// Channel adapter over a [`DesktopToaster`].
#[derive(Debug, Clone)]
pub struct ToastChannel {
    toaster: Arc<dyn DesktopToaster>,
}

impl ToastChannel {
    /// Wrap a toaster.
    pub fn new(toaster: Arc<dyn DesktopToaster>) -> Self {
        Self { toaster }
    }
}

impl NotificationChannel for ToastChannel {
    fn name(&self) -> &str {
        "toast"
    }

    fn deliver(&self, notification: &Notification) {
        if let Err(e) = self.toaster.show(
            &notification.toast_title,
            &notification.toast_body,
            notification.avatar.as_deref(),
        ) {
            warn!(peer = %notification.peer_id, error = %e, "Toast failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rosterwatch_core::error::AppError;
    use rosterwatch_core::types::{PeerId, TransitionKind};

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingToaster {
        shown: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl DesktopToaster for RecordingToaster {
        fn show(&self, title: &str, body: &str, _image: Option<&str>) -> AppResult<()> {
            if self.fail {
                return Err(AppError::internal("no notification service"));
            }
            self.shown
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn notification() -> Notification {
        Notification {
            peer_id: PeerId(1),
            kind: TransitionKind::Connect,
            banner_text: "Alice is now Online".into(),
            toast_title: "Alice".into(),
            toast_body: "Now Online".into(),
            avatar: None,
        }
    }

    #[test]
    fn test_toast_uses_title_and_body() {
        let toaster = Arc::new(RecordingToaster::default());
        ToastChannel::new(toaster.clone()).deliver(&notification());
        assert_eq!(
            *toaster.shown.lock().unwrap(),
            vec![("Alice".to_string(), "Now Online".to_string())]
        );
    }

    #[test]
    fn test_toast_failure_is_swallowed() {
        let toaster = Arc::new(RecordingToaster {
            fail: true,
            ..Default::default()
        });
        ToastChannel::new(toaster).deliver(&notification());
    }
}
