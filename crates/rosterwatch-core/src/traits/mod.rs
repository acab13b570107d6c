//! Collaborator traits the engine talks through.
//!
//! Each external concern (remote API, image download, UI layer, output
//! channels, clock, user settings) sits behind one of these so the engine
//! can be driven by fakes in tests.

pub mod channel;
pub mod clock;
pub mod remote;
pub mod settings;
pub mod sink;

pub use channel::NotificationChannel;
pub use clock::{Clock, SystemClock};
pub use remote::{AvatarSource, PresenceApi};
pub use settings::{SettingsSource, SharedSettings, UserSettings};
pub use sink::PresenceSink;
