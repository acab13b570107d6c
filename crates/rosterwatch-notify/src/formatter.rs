//! Notification message formatting.

use rosterwatch_core::locale::{self, Strings};
use rosterwatch_core::types::{Notification, PeerPresence, TransitionKind};

use crate::engine::Transition;

/// Renders transitions into per-channel text.
///
/// The banner carries the peer name inside its single line; the toast uses
/// the name as its title and leaves it out of the body.
#[derive(Debug, Clone, Default)]
pub struct NotificationFormatter {
    strings: Strings,
}

impl NotificationFormatter {
    /// Create a formatter over a string table.
    pub fn new(strings: Strings) -> Self {
        Self { strings }
    }

    /// String table in use.
    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    /// Render a transition for every channel.
    pub fn format(&self, transition: &Transition) -> Notification {
        let peer = &transition.peer;
        let name = self.display_name(peer);
        let state = self.strings.state_label(peer.state);
        let activity = peer
            .activity
            .as_deref()
            .unwrap_or_else(|| self.strings.get(locale::ACTIVITY_FALLBACK));

        let (banner_key, toast_key) = match transition.kind {
            TransitionKind::Connect => (locale::BANNER_CONNECT, locale::TOAST_CONNECT),
            TransitionKind::ActivityStart => (locale::BANNER_ACTIVITY, locale::TOAST_ACTIVITY),
        };

        Notification {
            peer_id: peer.id,
            kind: transition.kind,
            banner_text: self.strings.render(banner_key, name, state, activity),
            toast_title: name.to_string(),
            toast_body: self.strings.render(toast_key, name, state, activity),
            avatar: peer.avatar_ref.clone(),
        }
    }

    fn display_name<'a>(&'a self, peer: &'a PeerPresence) -> &'a str {
        let name = peer.display_name.trim();
        if name.is_empty() {
            self.strings.get(locale::PEER_FALLBACK_NAME)
        } else {
            name
        }
    }
}
