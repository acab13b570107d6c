//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod account;
pub mod cache;
pub mod display;
pub mod logging;
pub mod notifications;
pub mod polling;
pub mod remote;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::account::AccountConfig;
use self::cache::CacheConfig;
use self::display::DisplayConfig;
use self::logging::LoggingConfig;
use self::notifications::NotificationConfig;
use self::polling::PollingConfig;
use self::remote::RemoteConfig;

use crate::error::AppError;

pub use self::notifications::NotificationOutput;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Remote API credentials and the primary profile reference.
    #[serde(default)]
    pub account: AccountConfig,
    /// Display list settings.
    #[serde(default)]
    #[validate(nested)]
    pub display: DisplayConfig,
    /// Notification settings.
    #[serde(default)]
    #[validate(nested)]
    pub notifications: NotificationConfig,
    /// Refresh scheduling settings.
    #[serde(default)]
    #[validate(nested)]
    pub polling: PollingConfig,
    /// Identity, roster, and avatar cache settings.
    #[serde(default)]
    #[validate(nested)]
    pub cache: CacheConfig,
    /// Remote presence service settings.
    #[serde(default)]
    #[validate(nested)]
    pub remote: RemoteConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Overrides for localized strings, keyed by string id.
    #[serde(default)]
    pub strings: HashMap<String, String>,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base configuration file with an environment-specific
    /// overlay and environment variables prefixed with `ROSTERWATCH__`.
    pub fn load(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ROSTERWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }
}
