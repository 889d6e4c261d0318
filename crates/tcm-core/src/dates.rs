//! Flexible date parsing for project start/end dates.
//!
//! Forms submit `YYYY-MM-DD`; API clients may send full RFC 3339 timestamps
//! or naive `YYYY-MM-DDTHH:MM[:SS]` values. Naive values are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::CoreError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date or datetime string.
///
/// # Errors
///
/// Returns `CoreError::Validation("Invalid date format.")` if no format matches.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, CoreError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::validation("Invalid date format."))
}

/// Parse an optional form field. Empty input yields `None`.
pub fn parse_optional_date(s: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(s).map(Some)
    }
}

/// `YYYY-MM-DD`, the value format of `<input type="date">`.
#[must_use]
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Serde adapters that accept any format understood by [`parse_date`].
pub mod serde_flexible {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error as _};

    /// For `Option<DateTime<Utc>>` fields: null or missing is `None`.
    pub fn deserialize_option<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(d)?
            .map(|s| super::parse_date(&s).map_err(D::Error::custom))
            .transpose()
    }

    /// For `Option<Option<DateTime<Utc>>>` patch fields used with
    /// `#[serde(default)]`: missing is `None`, null is `Some(None)`.
    pub fn deserialize_nullable<'de, D>(d: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_option(d).map(Some)
    }
}
