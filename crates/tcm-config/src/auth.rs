//! Placeholder authentication settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_SECRET_KEY: &str = "change-me-in-production";
pub const DEFAULT_SESSION_SECRET: &str = "change-me-in-production-use-a-different-secret";

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

fn default_session_secret() -> String {
    DEFAULT_SESSION_SECRET.to_string()
}

const fn default_session_timeout() -> u64 {
    3600
}

const fn default_log_failed_logins() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    #[serde(default = "default_session_secret")]
    pub session_secret: String,

    /// Session cookie lifetime, in seconds.
    #[serde(default = "default_session_timeout")]
    pub session_timeout: u64,

    #[serde(default = "default_log_failed_logins")]
    pub log_failed_logins: bool,

    /// Username to password. Empty means nobody can log in.
    ///
    /// Usernames from `TCM_AUTH__USERS__<NAME>` arrive lowercased; use
    /// `tcm.toml` for mixed-case names.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            session_secret: default_session_secret(),
            session_timeout: default_session_timeout(),
            log_failed_logins: default_log_failed_logins(),
            users: BTreeMap::new(),
        }
    }
}

impl AuthConfig {
    /// True while either secret still has its shipped placeholder value.
    #[must_use]
    pub fn uses_default_secrets(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY || self.session_secret == DEFAULT_SESSION_SECRET
    }
}
