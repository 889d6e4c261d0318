//! Status enums, priorities and entity types for TCM.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Statuses carry no transition rules: any value may move to any other value.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Generates `as_str`, `ALL`, `Display` and `FromStr` for a string-backed enum.
macro_rules! string_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Return the string representation used in SQL storage and forms.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    other => Err(CoreError::Validation(format!(
                        "'{other}' is not a valid {}",
                        $label
                    ))),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// TestCaseStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a test case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseStatus {
    #[default]
    Draft,
    Active,
    Deprecated,
    Archived,
}

string_enum!(TestCaseStatus, "test case status", {
    Draft => "draft",
    Active => "active",
    Deprecated => "deprecated",
    Archived => "archived",
});

// ---------------------------------------------------------------------------
// TestCasePriority
// ---------------------------------------------------------------------------

/// Priority of a test case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TestCasePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

string_enum!(TestCasePriority, "test case priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a project.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Archived,
}

string_enum!(ProjectStatus, "project status", {
    Planning => "planning",
    Active => "active",
    OnHold => "on_hold",
    Completed => "completed",
    Archived => "archived",
});

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// The three top-level entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[serde(rename = "testcase")]
    TestCase,
    Project,
    Tag,
}

string_enum!(EntityType, "entity type", {
    TestCase => "testcase",
    Project => "project",
    Tag => "tag",
});

impl EntityType {
    /// Singular human label used in error messages (`"Test case"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TestCase => "Test case",
            Self::Project => "Project",
            Self::Tag => "Tag",
        }
    }

    /// Plural human label used in error messages (`"Test cases"`).
    #[must_use]
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::TestCase => "Test cases",
            Self::Project => "Projects",
            Self::Tag => "Tags",
        }
    }

    /// Base path of the HTML pages for this entity.
    #[must_use]
    pub const fn page_path(self) -> &'static str {
        match self {
            Self::TestCase => "/testcases",
            Self::Project => "/projects",
            Self::Tag => "/tags",
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityAction
// ---------------------------------------------------------------------------

/// Whether a dashboard activity entry represents a creation or an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
}

string_enum!(ActivityAction, "activity action", {
    Created => "created",
    Updated => "updated",
});
