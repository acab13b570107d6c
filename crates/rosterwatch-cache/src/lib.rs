//! # rosterwatch-cache
//!
//! Caches that keep the refresh cycle cheap:
//!
//! - **identity**: profile reference to canonical id, in memory via
//!   [moka](https://crates.io/crates/moka) with a long TTL
//! - **roster**: peer ids of the primary account, refreshed on a multi-hour TTL
//! - **avatar**: peer images on disk with bounded background downloads and a
//!   periodic expiry sweep

pub mod avatar;
pub mod identity;
pub mod roster;

pub use avatar::{AvatarCache, AvatarStore, DownloadBudget};
pub use identity::IdentityResolver;
pub use roster::RosterCache;
