//! Response types returned by the JSON API and consumed by the HTML pages.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Project, Tag, TestCase};
use crate::enums::{ActivityAction, EntityType};

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// Response from `GET /api/tags`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TagListResponse {
    pub tags: Vec<Tag>,
    pub total: u64,
    pub skip: u32,
    pub limit: u32,
}

/// Response from `GET /api/testcases`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestCaseListResponse {
    pub testcases: Vec<TestCase>,
    pub total: u64,
    pub skip: u32,
    pub limit: u32,
}

/// Response from `GET /api/projects`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub total: u64,
    pub skip: u32,
    pub limit: u32,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A tag search hit with the number of test cases carrying it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TagHit {
    #[serde(flatten)]
    pub tag: Tag,
    pub testcase_count: u64,
}

/// Search results grouped by entity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    pub testcases: Vec<TestCase>,
    pub projects: Vec<Project>,
    pub tags: Vec<TagHit>,
    pub total: usize,
}

impl SearchResults {
    /// Build from the three groups, computing `total`.
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        testcases: Vec<TestCase>,
        projects: Vec<Project>,
        tags: Vec<TagHit>,
    ) -> Self {
        let total = testcases.len() + projects.len() + tags.len();
        Self {
            query: query.into(),
            testcases,
            projects,
            tags,
            total,
        }
    }

    #[must_use]
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// One row of the dashboard's recent-activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Activity {
    pub entity_type: EntityType,
    pub entity_id: i64,
    /// Title, project name, or `category:value` for tags.
    pub title: String,
    pub action: ActivityAction,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// Anything touched less than a minute after creation still counts as created.
    #[must_use]
    pub fn action_for(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> ActivityAction {
        if (updated_at - created_at).num_seconds() < 60 {
            ActivityAction::Created
        } else {
            ActivityAction::Updated
        }
    }

    /// Link to the entity's HTML page.
    #[must_use]
    pub fn link(&self) -> String {
        match self.entity_type {
            EntityType::Tag => format!("/tags/{}/edit", self.entity_id),
            other => format!("{}/{}", other.page_path(), self.entity_id),
        }
    }
}

/// Entity counts plus the merged activity feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardStats {
    pub testcase_count: u64,
    pub project_count: u64,
    pub tag_count: u64,
    pub recent_activity: Vec<Activity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn action_threshold_is_sixty_seconds() {
        let t = Utc::now();
        assert_eq!(
            Activity::action_for(t, t + Duration::seconds(59)),
            ActivityAction::Created
        );
        assert_eq!(
            Activity::action_for(t, t + Duration::seconds(60)),
            ActivityAction::Updated
        );
    }

    #[test]
    fn tag_links_point_at_edit_page() {
        let activity = Activity {
            entity_type: EntityType::Tag,
            entity_id: 4,
            title: "os:linux".into(),
            action: ActivityAction::Created,
            timestamp: Utc::now(),
        };
        assert_eq!(activity.link(), "/tags/4/edit");
        let activity = Activity {
            entity_type: EntityType::TestCase,
            ..activity
        };
        assert_eq!(activity.link(), "/testcases/4");
    }

    #[test]
    fn search_total_sums_groups() {
        let results = SearchResults::new("x", vec![], vec![], vec![]);
        assert_eq!(results.total, 0);
        assert_eq!(SearchResults::empty("q").query, "q");
    }
}
