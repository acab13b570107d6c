//! Notification output channels.

pub mod banner;
pub mod toast;

pub use banner::{BannerChannel, BannerState};
pub use toast::{DesktopToaster, LogToaster, ToastChannel};
