//! Test case update builder.

use serde::{Deserialize, Serialize};
use tcm_core::enums::{TestCasePriority, TestCaseStatus};
use tcm_core::errors::CoreError;
use tcm_core::validation::{self, TITLE_MAX, USER_MAX};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestCaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub preconditions: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_results: Option<String>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_results: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TestCaseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TestCasePriority>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_by: Option<Option<String>>,
    /// `None` leaves associations alone; `Some` replaces them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

fn normalise(field: &mut Option<Option<String>>) {
    if let Some(value) = field.take() {
        *field = Some(validation::empty_to_none(value));
    }
}

impl TestCaseUpdate {
    pub fn validate(&mut self) -> Result<(), CoreError> {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(validation::is_blank);
        if blank(&self.title) || blank(&self.steps) || blank(&self.expected_results) {
            return Err(CoreError::validation(
                "Title, steps, and expected results are required.",
            ));
        }
        validation::check_optional_max_len("title", self.title.as_deref(), TITLE_MAX)?;
        if let Some(Some(user)) = &self.updated_by {
            validation::check_max_len("updated_by", user, USER_MAX)?;
        }
        normalise(&mut self.description);
        normalise(&mut self.preconditions);
        normalise(&mut self.actual_results);
        normalise(&mut self.updated_by);
        if let Some(ids) = self.tag_ids.take() {
            self.tag_ids = Some(validation::dedup_ids(&ids));
        }
        Ok(())
    }
}

pub struct TestCaseUpdateBuilder(TestCaseUpdate);

impl TestCaseUpdateBuilder {
    pub fn new() -> Self {
        Self(TestCaseUpdate::default())
    }

    pub fn title(mut self, val: impl Into<String>) -> Self {
        self.0.title = Some(val.into());
        self
    }

    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    pub fn preconditions(mut self, val: Option<String>) -> Self {
        self.0.preconditions = Some(val);
        self
    }

    pub fn steps(mut self, val: impl Into<String>) -> Self {
        self.0.steps = Some(val.into());
        self
    }

    pub fn expected_results(mut self, val: impl Into<String>) -> Self {
        self.0.expected_results = Some(val.into());
        self
    }

    pub fn actual_results(mut self, val: Option<String>) -> Self {
        self.0.actual_results = Some(val);
        self
    }

    pub const fn status(mut self, val: TestCaseStatus) -> Self {
        self.0.status = Some(val);
        self
    }

    pub const fn priority(mut self, val: TestCasePriority) -> Self {
        self.0.priority = Some(val);
        self
    }

    pub fn updated_by(mut self, val: Option<String>) -> Self {
        self.0.updated_by = Some(val);
        self
    }

    pub fn tag_ids(mut self, val: Vec<i64>) -> Self {
        self.0.tag_ids = Some(val);
        self
    }

    pub fn build(self) -> TestCaseUpdate {
        self.0
    }
}

impl Default for TestCaseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn null_title_is_absent() {
        let update: TestCaseUpdate = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert_eq!(update.title, None);
    }

    #[test]
    fn serializes_only_changed_fields() {
        let update = TestCaseUpdateBuilder::new()
            .status(TestCaseStatus::Active)
            .tag_ids(vec![1, 1, 2])
            .build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"status": "active", "tag_ids": [1, 1, 2]}));
    }

    #[test]
    fn validate_dedups_tag_ids() {
        let mut update = TestCaseUpdateBuilder::new().tag_ids(vec![2, 2, 5]).build();
        update.validate().unwrap();
        assert_eq!(update.tag_ids, Some(vec![2, 5]));
    }

    #[test]
    fn empty_steps_rejected() {
        let mut update = TestCaseUpdateBuilder::new().steps("").build();
        assert!(update.validate().is_err());
    }
}
