//! Shared domain types.

pub mod id;
pub mod notification;
pub mod presence;
pub mod view;

pub use id::PeerId;
pub use notification::{Notification, TransitionKind};
pub use presence::{PeerPresence, PresenceState, RemotePresence};
pub use view::{BoardUpdate, PeerEntry, PresenceCounts, PresenceView, SelfProfile};
