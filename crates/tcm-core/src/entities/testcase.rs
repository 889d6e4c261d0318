use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Tag;
use crate::enums::{TestCasePriority, TestCaseStatus};
use crate::errors::CoreError;
use crate::validation::{self, TITLE_MAX, USER_MAX};

/// A test case with its tags loaded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestCase {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub preconditions: Option<String>,
    pub steps: String,
    pub expected_results: String,
    pub actual_results: Option<String>,
    pub status: TestCaseStatus,
    pub priority: TestCasePriority,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Input for creating a test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTestCase {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preconditions: Option<String>,
    pub steps: String,
    pub expected_results: String,
    #[serde(default)]
    pub actual_results: Option<String>,
    #[serde(default)]
    pub status: TestCaseStatus,
    #[serde(default)]
    pub priority: TestCasePriority,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

impl NewTestCase {
    pub fn new(
        title: impl Into<String>,
        steps: impl Into<String>,
        expected_results: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            steps: steps.into(),
            expected_results: expected_results.into(),
            ..Self::default()
        }
    }

    /// Check required fields and lengths, collapse duplicate tag ids and
    /// turn empty optional text into `None`.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        if validation::is_blank(&self.title)
            || validation::is_blank(&self.steps)
            || validation::is_blank(&self.expected_results)
        {
            return Err(CoreError::validation(
                "Title, steps, and expected results are required.",
            ));
        }
        validation::check_max_len("title", &self.title, TITLE_MAX)?;
        validation::check_optional_max_len("created_by", self.created_by.as_deref(), USER_MAX)?;
        validation::check_optional_max_len("updated_by", self.updated_by.as_deref(), USER_MAX)?;
        self.description = validation::empty_to_none(self.description.take());
        self.preconditions = validation::empty_to_none(self.preconditions.take());
        self.actual_results = validation::empty_to_none(self.actual_results.take());
        self.tag_ids = validation::dedup_ids(&self.tag_ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let input: NewTestCase = serde_json::from_str(
            r#"{"title":"Login","steps":"1. open","expected_results":"ok"}"#,
        )
        .unwrap();
        assert_eq!(input.status, TestCaseStatus::Draft);
        assert_eq!(input.priority, TestCasePriority::Medium);
        assert!(input.tag_ids.is_empty());
    }

    #[test]
    fn unknown_status_fails_to_deserialize() {
        let res: Result<NewTestCase, _> = serde_json::from_str(
            r#"{"title":"t","steps":"s","expected_results":"e","status":"done"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn validate_requires_steps() {
        let mut input = NewTestCase::new("Login", "  ", "ok");
        let err = input.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Title, steps, and expected results are required."
        );
    }

    #[test]
    fn validate_collapses_duplicate_tag_ids() {
        let mut input = NewTestCase::new("Login", "s", "e");
        input.tag_ids = vec![3, 1, 3, 1];
        input.description = Some(String::new());
        input.validate().unwrap();
        assert_eq!(input.tag_ids, vec![3, 1]);
        assert_eq!(input.description, None);
    }
}
