//! Database location settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_url() -> String {
    "tcm.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// A file path, `:memory:`, a `sqlite:` URL, or a remote `libsql://` URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Auth token for remote databases.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth_token: String::new(),
        }
    }
}

/// Where the database lives, resolved from [`DatabaseConfig::url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    Local(PathBuf),
    Remote { url: String, auth_token: String },
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_remote(&self) -> bool {
        ["libsql://", "https://", "http://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }

    /// Resolve the URL. `sqlite:` and `sqlite://` prefixes are stripped, and
    /// any `?query` suffix on a local path is dropped.
    #[must_use]
    pub fn target(&self) -> DatabaseTarget {
        if self.is_remote() {
            return DatabaseTarget::Remote {
                url: self.url.clone(),
                auth_token: self.auth_token.clone(),
            };
        }
        let path = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))
            .unwrap_or(&self.url);
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path == ":memory:" {
            DatabaseTarget::Memory
        } else {
            DatabaseTarget::Local(PathBuf::from(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target(url: &str) -> DatabaseTarget {
        DatabaseConfig {
            url: url.into(),
            auth_token: "tok".into(),
        }
        .target()
    }

    #[test]
    fn resolves_local_paths() {
        assert_eq!(target("tcm.db"), DatabaseTarget::Local("tcm.db".into()));
        assert_eq!(
            target("sqlite:///var/lib/tcm.db"),
            DatabaseTarget::Local("/var/lib/tcm.db".into())
        );
        assert_eq!(
            target("sqlite:./data/tcm.db?mode=rwc"),
            DatabaseTarget::Local("./data/tcm.db".into())
        );
    }

    #[test]
    fn resolves_memory() {
        assert_eq!(target(":memory:"), DatabaseTarget::Memory);
        assert_eq!(target("sqlite::memory:"), DatabaseTarget::Memory);
    }

    #[test]
    fn resolves_remote() {
        assert_eq!(
            target("libsql://tcm-prod.turso.io"),
            DatabaseTarget::Remote {
                url: "libsql://tcm-prod.turso.io".into(),
                auth_token: "tok".into(),
            }
        );
    }
}
