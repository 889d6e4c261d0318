use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::enums::ProjectStatus;
use crate::errors::CoreError;
use crate::validation::{self, NAME_MAX, USER_MAX};

/// A named grouping of test cases.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ids of the associated test cases, ascending.
    #[serde(default)]
    pub testcase_ids: Vec<i64>,
}

/// Input for creating a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "dates::serde_flexible::deserialize_option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::serde_flexible::deserialize_option")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub testcase_ids: Vec<i64>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&mut self) -> Result<(), CoreError> {
        if validation::is_blank(&self.name) {
            return Err(CoreError::validation("Project name is required."));
        }
        validation::check_max_len("name", &self.name, NAME_MAX)?;
        validation::check_optional_max_len("created_by", self.created_by.as_deref(), USER_MAX)?;
        validation::check_optional_max_len("updated_by", self.updated_by.as_deref(), USER_MAX)?;
        validation::check_date_range(self.start_date, self.end_date)?;
        self.description = validation::empty_to_none(self.description.take());
        self.testcase_ids = validation::dedup_ids(&self.testcase_ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_plain_dates() {
        let input: NewProject = serde_json::from_str(
            r#"{"name":"Q3","start_date":"2024-07-01","end_date":"2024-09-30T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(
            input.start_date,
            Some(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            input.end_date,
            Some(Utc.with_ymd_and_hms(2024, 9, 30, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut input = NewProject::new("Q3");
        input.start_date = Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap());
        input.end_date = Some(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap());
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "End date must be after start date.");
    }

    #[test]
    fn validate_allows_equal_dates() {
        let day = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        let mut input = NewProject::new("Q3");
        input.start_date = Some(day);
        input.end_date = Some(day);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn validate_requires_name() {
        let mut input = NewProject::new("");
        assert_eq!(
            input.validate().unwrap_err().to_string(),
            "Project name is required."
        );
    }
}
