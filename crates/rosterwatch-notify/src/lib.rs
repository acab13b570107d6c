//! # rosterwatch-notify
//!
//! Decides when a presence change is worth telling the user about and
//! delivers it:
//!
//! - [`HistoryStore`]: last observed state per peer plus the baseline flag
//! - [`NotificationEngine`]: transition classification, cooldown, and the
//!   one-notification-per-cycle policy
//! - [`NotificationFormatter`]: localized banner and toast text
//! - [`NotificationDispatcher`]: routes to the configured output channels
//! - [`channel`]: in-application banner and OS toast outputs

pub mod channel;
pub mod dispatcher;
pub mod engine;
pub mod formatter;
pub mod history;

pub use dispatcher::NotificationDispatcher;
pub use engine::{NotificationEngine, Transition};
pub use formatter::NotificationFormatter;
pub use history::{HistoryStore, PeerHistory};
