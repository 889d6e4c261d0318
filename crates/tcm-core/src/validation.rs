//! Field-level validation shared by API bodies and HTML forms.

use chrono::{DateTime, Utc};

use crate::errors::CoreError;

pub const TITLE_MAX: usize = 200;
pub const NAME_MAX: usize = 200;
pub const USER_MAX: usize = 100;
pub const CATEGORY_MAX: usize = 50;
pub const TAG_VALUE_MAX: usize = 100;
pub const TAG_DESCRIPTION_MAX: usize = 500;

#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Length limits count characters, not bytes.
pub fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn check_optional_max_len(field: &str, value: Option<&str>, max: usize) -> Result<(), CoreError> {
    value.map_or(Ok(()), |v| check_max_len(field, v, max))
}

/// End may equal start but never precede it.
pub fn check_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), CoreError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(CoreError::validation("End date must be after start date."))
        }
        _ => Ok(()),
    }
}

#[must_use]
pub fn empty_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Remove duplicate ids, keeping the first occurrence of each.
#[must_use]
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn max_len_counts_chars() {
        assert!(check_max_len("value", &"é".repeat(100), TAG_VALUE_MAX).is_ok());
        let err = check_max_len("value", &"é".repeat(101), TAG_VALUE_MAX).unwrap_err();
        assert_eq!(err.to_string(), "value must be at most 100 characters");
    }

    #[test]
    fn date_range_allows_open_ends() {
        let d = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(check_date_range(Some(d), None).is_ok());
        assert!(check_date_range(None, Some(d)).is_ok());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup_ids(&[5, 2, 5, 9, 2]), vec![5, 2, 9]);
    }

    #[test]
    fn empty_string_becomes_none() {
        assert_eq!(empty_to_none(Some(String::new())), None);
        assert_eq!(empty_to_none(Some(" ".into())), Some(" ".into()));
    }
}
