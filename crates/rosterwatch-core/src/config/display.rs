//! Display list configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Controls how the online and offline lists are shaped.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DisplayConfig {
    /// Whether the offline list is computed and published.
    #[serde(default)]
    pub show_offline: bool,
    /// Maximum number of online peers shown.
    #[serde(default = "default_max_online")]
    #[validate(range(min = 1, max = 200))]
    pub max_online: usize,
    /// Maximum number of offline peers shown.
    #[serde(default = "default_max_offline")]
    #[validate(range(max = 500))]
    pub max_offline: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_offline: false,
            max_online: default_max_online(),
            max_offline: default_max_offline(),
        }
    }
}

fn default_max_online() -> usize {
    15
}

fn default_max_offline() -> usize {
    40
}
