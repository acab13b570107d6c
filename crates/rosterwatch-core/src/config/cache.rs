//! Identity, roster, and avatar cache configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Cache lifetimes and avatar download limits.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CacheConfig {
    /// Hours a resolved profile reference stays cached.
    #[serde(default = "default_identity_ttl")]
    #[validate(range(min = 1))]
    pub identity_ttl_hours: u64,
    /// Hours the roster stays cached before it is fetched again.
    #[serde(default = "default_roster_ttl")]
    #[validate(range(min = 1))]
    pub roster_ttl_hours: u64,
    /// Directory holding one image file per peer.
    #[serde(default = "default_avatar_dir")]
    pub avatar_dir: String,
    /// Days after which a cached avatar is deleted by the sweep.
    #[serde(default = "default_avatar_max_age")]
    #[validate(range(min = 1))]
    pub avatar_max_age_days: u64,
    /// Hours between two avatar sweeps.
    #[serde(default = "default_avatar_sweep")]
    #[validate(range(min = 1))]
    pub avatar_sweep_hours: u64,
    /// Maximum concurrent avatar downloads.
    #[serde(default = "default_avatar_concurrency")]
    #[validate(range(min = 1, max = 16))]
    pub avatar_concurrency: usize,
    /// Maximum avatar downloads scheduled by one refresh cycle.
    #[serde(default = "default_avatar_per_cycle")]
    #[validate(range(min = 1, max = 64))]
    pub avatar_downloads_per_cycle: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            identity_ttl_hours: default_identity_ttl(),
            roster_ttl_hours: default_roster_ttl(),
            avatar_dir: default_avatar_dir(),
            avatar_max_age_days: default_avatar_max_age(),
            avatar_sweep_hours: default_avatar_sweep(),
            avatar_concurrency: default_avatar_concurrency(),
            avatar_downloads_per_cycle: default_avatar_per_cycle(),
        }
    }
}

fn default_identity_ttl() -> u64 {
    24
}

fn default_roster_ttl() -> u64 {
    6
}

fn default_avatar_dir() -> String {
    "data/avatars".to_string()
}

fn default_avatar_max_age() -> u64 {
    30
}

fn default_avatar_sweep() -> u64 {
    24
}

fn default_avatar_concurrency() -> usize {
    2
}

fn default_avatar_per_cycle() -> usize {
    4
}
