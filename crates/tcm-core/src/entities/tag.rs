use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validation::{self, CATEGORY_MAX, TAG_DESCRIPTION_MAX, TAG_VALUE_MAX};

/// A `category:value` label attached to test cases.
///
/// `(category, value)` is unique and compared case-sensitively.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub category: String,
    pub value: String,
    pub description: Option<String>,
    pub is_predefined: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// `category:value`, the form tags are displayed in.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.category, self.value)
    }
}

/// Input for creating a tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTag {
    pub category: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_predefined")]
    pub is_predefined: bool,
}

const fn default_predefined() -> bool {
    true
}

impl NewTag {
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            description: None,
            is_predefined: true,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check required fields and length limits. Empty descriptions become `None`.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        if validation::is_blank(&self.category) || validation::is_blank(&self.value) {
            return Err(CoreError::validation("Category and value are required."));
        }
        validation::check_max_len("category", &self.category, CATEGORY_MAX)?;
        validation::check_max_len("value", &self.value, TAG_VALUE_MAX)?;
        self.description = validation::empty_to_none(self.description.take());
        if let Some(description) = &self.description {
            validation::check_max_len("description", description, TAG_DESCRIPTION_MAX)?;
        }
        Ok(())
    }
}
