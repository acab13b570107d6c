//! Remote presence service configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Largest id batch the presence endpoint accepts.
pub const MAX_PRESENCE_BATCH: usize = 100;

/// Remote endpoint and request limits.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoteConfig {
    /// Base URL of the remote web API.
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    #[validate(range(min = 1, max = 120))]
    pub timeout_seconds: u64,
    /// Ids per presence request.
    #[serde(default = "default_batch_size")]
    #[validate(range(min = 1, max = 100))]
    pub batch_size: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_batch_size() -> usize {
    MAX_PRESENCE_BATCH
}
