//! On-disk avatar cache.

pub mod manager;
pub mod store;

pub use manager::{AvatarCache, DownloadBudget};
pub use store::AvatarStore;
