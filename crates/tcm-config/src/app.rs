//! Application-level settings.

use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "Test Case Management".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Display name, shown in page titles and the navigation bar.
    #[serde(default = "default_name")]
    pub name: String,

    /// Raises the default log level to `debug`.
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            debug: false,
        }
    }
}
