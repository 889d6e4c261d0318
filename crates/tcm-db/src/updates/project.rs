//! Project update builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tcm_core::enums::ProjectStatus;
use tcm_core::errors::CoreError;
use tcm_core::validation::{self, NAME_MAX, USER_MAX};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(
        default,
        deserialize_with = "tcm_core::dates::serde_flexible::deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "tcm_core::dates::serde_flexible::deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_by: Option<Option<String>>,
    /// `None` leaves associations alone; `Some` replaces them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testcase_ids: Option<Vec<i64>>,
}

impl ProjectUpdate {
    /// Field-level checks. The date range is checked against stored values
    /// by the repository, since only one end may be changing.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        if self.name.as_deref().is_some_and(validation::is_blank) {
            return Err(CoreError::validation("Project name is required."));
        }
        validation::check_optional_max_len("name", self.name.as_deref(), NAME_MAX)?;
        if let Some(Some(user)) = &self.updated_by {
            validation::check_max_len("updated_by", user, USER_MAX)?;
        }
        if let Some(description) = self.description.take() {
            self.description = Some(validation::empty_to_none(description));
        }
        if let Some(ids) = self.testcase_ids.take() {
            self.testcase_ids = Some(validation::dedup_ids(&ids));
        }
        Ok(())
    }
}

pub struct ProjectUpdateBuilder(ProjectUpdate);

impl ProjectUpdateBuilder {
    pub fn new() -> Self {
        Self(ProjectUpdate::default())
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    pub const fn status(mut self, val: ProjectStatus) -> Self {
        self.0.status = Some(val);
        self
    }

    pub const fn start_date(mut self, val: Option<DateTime<Utc>>) -> Self {
        self.0.start_date = Some(val);
        self
    }

    pub const fn end_date(mut self, val: Option<DateTime<Utc>>) -> Self {
        self.0.end_date = Some(val);
        self
    }

    pub fn updated_by(mut self, val: Option<String>) -> Self {
        self.0.updated_by = Some(val);
        self
    }

    pub fn testcase_ids(mut self, val: Vec<i64>) -> Self {
        self.0.testcase_ids = Some(val);
        self
    }

    pub fn build(self) -> ProjectUpdate {
        self.0
    }
}

impl Default for ProjectUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
