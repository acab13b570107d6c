//! UI change detection.

use std::fmt::Write;

use rosterwatch_core::types::PresenceView;

/// Signature recorded after an empty roster was published.
const EMPTY_SIGNATURE: &str = "empty";

/// Deterministic fingerprint of everything the UI shows.
///
/// Counts first, then one record per online row, a `#` separator, then one
/// record per offline row.
pub fn signature(view: &PresenceView) -> String {
    let mut out = String::with_capacity(64 + 96 * (view.online.len() + view.offline.len()));
    let counts = view.counts;
    let _ = write!(out, "o={}|g={}|f={}|", counts.online, counts.in_game, counts.offline);

    for row in &view.online {
        let _ = write!(
            out,
            "{}|{}|{}|{}|{}|",
            row.id,
            row.state.as_str(),
            row.state_label,
            row.activity.as_deref().unwrap_or_default(),
            row.avatar.as_deref().unwrap_or_default(),
        );
    }
    out.push('#');
    for row in &view.offline {
        let _ = write!(
            out,
            "{}|{}|{}|",
            row.id,
            row.avatar.as_deref().unwrap_or_default(),
            row.state_label,
        );
    }
    out
}

/// Remembers the last published signature.
#[derive(Debug, Clone, Default)]
pub struct SignatureDebouncer {
    last: Option<String>,
}

impl SignatureDebouncer {
    /// Create a debouncer with nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `view` and report whether it differs from the last one.
    pub fn should_publish(&mut self, view: &PresenceView) -> bool {
        let next = signature(view);
        if self.last.as_deref() == Some(next.as_str()) {
            return false;
        }
        self.last = Some(next);
        true
    }

    /// Forget the last signature; the next view is always published.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Record that an empty roster was shown.
    pub fn mark_empty(&mut self) {
        self.last = Some(EMPTY_SIGNATURE.to_string());
    }

    /// Last recorded signature.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
