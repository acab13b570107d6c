//! Rendered notifications.

use serde::{Deserialize, Serialize};

use super::id::PeerId;

/// Category of a qualifying presence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Offline to any connected state.
    Connect,
    /// Entered the in-game state or started a named activity.
    ActivityStart,
}

/// A notification rendered for every output channel.
///
/// The banner shows a single line with the peer name inside it; the toast
/// uses the peer name as its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Peer the notification is about.
    pub peer_id: PeerId,
    /// Transition that triggered it.
    pub kind: TransitionKind,
    /// In-application banner text.
    pub banner_text: String,
    /// OS toast title.
    pub toast_title: String,
    /// OS toast body.
    pub toast_body: String,
    /// Avatar reference shown next to the text.
    pub avatar: Option<String>,
}
