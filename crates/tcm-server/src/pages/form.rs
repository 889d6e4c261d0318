//! Urlencoded form bodies with repeated keys.
//!
//! Checkbox groups such as `tag_ids` arrive as the same key many times, so
//! forms are extracted as a flat list of pairs and read through [`FormFields`].

use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    #[must_use]
    pub const fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value for `key`, or `""`.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map_or("", |(_, v)| v.as_str())
    }

    /// First value for `key` with surrounding whitespace removed; `None` when empty.
    #[must_use]
    pub fn opt(&self, key: &str) -> Option<String> {
        let value = self.get(key).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Every integer value for `key`. Unparseable entries are dropped.
    #[must_use]
    pub fn ids(&self, key: &str) -> Vec<i64> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .filter_map(|(_, v)| v.trim().parse().ok())
            .collect()
    }

    /// Parse `key` as `T`. Missing or empty values give `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns the raw value when it does not parse.
    pub fn parse_or_default<T>(&self, key: &str) -> Result<T, String>
    where
        T: FromStr + Default,
    {
        let raw = self.get(key).trim();
        if raw.is_empty() {
            return Ok(T::default());
        }
        raw.parse().map_err(|_| raw.to_string())
    }
}

/// Lenient query parameter parsing for page filters: anything that does not
/// parse is treated as absent.
pub fn lenient<T: FromStr>(value: Option<&str>) -> Option<T> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}
