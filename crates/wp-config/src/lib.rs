//! # wp-config
//!
//! Layered configuration loading for Waypoint using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WAYPOINT_*` prefix, `__` as separator)
//! 2. Project-level `.waypoint/config.toml`
//! 3. User-level `~/.config/waypoint/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WAYPOINT_AI__API_KEY` -> `ai.api_key`,
//! `WAYPOINT_AI__RETRY__MAX_RETRIES` -> `ai.retry.max_retries`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use wp_config::WaypointConfig;
//!
//! let config = WaypointConfig::load_with_dotenv().expect("config");
//! if config.ai.is_configured() {
//!     println!("model: {}", config.ai.model);
//! }
//! ```

mod ai;
mod chat;
mod database;
mod error;
mod notify;

pub use ai::{AiConfig, RetrySettings};
pub use chat::ChatConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use notify::NotifyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WaypointConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl WaypointConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".waypoint/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("WAYPOINT_").split("__"))
    }

    /// Reject values that would make the pipeline misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.retry.base_delay_ms > self.ai.retry.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "ai.retry.base_delay_ms".into(),
                reason: format!(
                    "{} exceeds ai.retry.max_delay_ms ({})",
                    self.ai.retry.base_delay_ms, self.ai.retry.max_delay_ms
                ),
            });
        }
        if self.chat.history_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chat.history_window".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.database.path.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "database".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("waypoint").join("config.toml"))
    }

    /// Load `.env` from the crate's workspace root or the current directory.
    fn load_dotenv() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
