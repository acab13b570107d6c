//! Remote account configuration.

use serde::{Deserialize, Serialize};

/// Credentials for the remote presence service and the primary profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Remote API key.
    #[serde(default)]
    pub api_key: String,
    /// Primary profile reference: a numeric id, a profile URL, or a vanity name.
    #[serde(default)]
    pub profile: String,
}
