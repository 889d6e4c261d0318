//! Tag update builder.

use serde::{Deserialize, Serialize};
use tcm_core::errors::CoreError;
use tcm_core::validation::{self, CATEGORY_MAX, TAG_DESCRIPTION_MAX, TAG_VALUE_MAX};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(
        default,
        deserialize_with = "tcm_core::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_predefined: Option<bool>,
}

impl TagUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.value.is_none()
            && self.description.is_none()
            && self.is_predefined.is_none()
    }

    pub fn validate(&mut self) -> Result<(), CoreError> {
        if self.category.as_deref().is_some_and(validation::is_blank)
            || self.value.as_deref().is_some_and(validation::is_blank)
        {
            return Err(CoreError::validation("Category and value are required."));
        }
        validation::check_optional_max_len("category", self.category.as_deref(), CATEGORY_MAX)?;
        validation::check_optional_max_len("value", self.value.as_deref(), TAG_VALUE_MAX)?;
        if let Some(description) = self.description.take() {
            let description = validation::empty_to_none(description);
            validation::check_optional_max_len(
                "description",
                description.as_deref(),
                TAG_DESCRIPTION_MAX,
            )?;
            self.description = Some(description);
        }
        Ok(())
    }
}

pub struct TagUpdateBuilder(TagUpdate);

impl TagUpdateBuilder {
    pub fn new() -> Self {
        Self(TagUpdate::default())
    }

    pub fn category(mut self, val: impl Into<String>) -> Self {
        self.0.category = Some(val.into());
        self
    }

    pub fn value(mut self, val: impl Into<String>) -> Self {
        self.0.value = Some(val.into());
        self
    }

    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    pub const fn is_predefined(mut self, val: bool) -> Self {
        self.0.is_predefined = Some(val);
        self
    }

    pub fn build(self) -> TagUpdate {
        self.0
    }
}

impl Default for TagUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_description_clears() {
        let update: TagUpdate = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert!(!update.is_empty());
    }

    #[test]
    fn empty_description_normalises_to_null() {
        let mut update = TagUpdateBuilder::new().description(Some(String::new())).build();
        update.validate().unwrap();
        assert_eq!(update.description, Some(None));
    }

    #[test]
    fn blank_value_is_rejected() {
        let mut update = TagUpdateBuilder::new().value(" ").build();
        assert!(update.validate().is_err());
    }
}
