//! # tcm-config
//!
//! Layered configuration loading for TCM using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TCM_*` prefix, `__` as separator)
//! 2. Project-level `./tcm.toml`
//! 3. User-level `~/.config/tcm/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `TCM_SERVER__PORT` -> `server.port`,
//! `TCM_AUTH__USERS__ADMIN` -> `auth.users.admin`, and so on.
//!
//! Environment keys are lowercased, so `TCM_AUTH__USERS__Admin` defines the
//! user `admin`. Usernames with capitals must be set in `tcm.toml` under
//! `[auth.users]`, where keys keep their case.
//!
//! ```no_run
//! use tcm_config::TcmConfig;
//!
//! let config = TcmConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod app;
mod auth;
mod database;
mod error;
mod server;

pub use app::AppConfig;
pub use auth::{AuthConfig, DEFAULT_SECRET_KEY, DEFAULT_SESSION_SECRET};
pub use database::{DatabaseConfig, DatabaseTarget};
pub use error::ConfigError;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = "tcm.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TcmConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl TcmConfig {
    /// Load configuration from TOML files and environment variables, then
    /// validate it.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load `.env` from the current directory (if present), then [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("TCM_").split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tcm").join("config.toml"))
    }

    /// Reject values that would make the server unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be greater than 0"));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }
        if self.auth.session_timeout == 0 {
            return Err(ConfigError::invalid(
                "auth.session_timeout",
                "must be greater than 0",
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        Ok(())
    }
}
