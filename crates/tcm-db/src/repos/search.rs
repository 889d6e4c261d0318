//! Cross-entity substring search.

use tcm_core::entities::{Project, TestCase};
use tcm_core::enums::{EntityType, ProjectStatus, TestCaseStatus};
use tcm_core::responses::{SearchResults, TagHit};

use crate::error::DatabaseError;
use crate::helpers::{fold, get_count, like_pattern};
use crate::repos::project::{PROJECT_COLUMNS, collect_projects};
use crate::repos::tag::{TAG_COLUMNS, row_to_tag};
use crate::repos::testcase::{TESTCASE_COLUMNS, collect_testcases};
use crate::service::TcmService;

/// Results per entity group.
pub const SEARCH_GROUP_LIMIT: u32 = 50;

/// Parameters for [`TcmService::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: String,
    /// Restrict to one entity group.
    pub entity_type: Option<EntityType>,
    /// Applied to test cases and projects. A value that is not a valid status
    /// for one of them is ignored for that entity.
    pub status: Option<String>,
    /// Exact tag category.
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    fn includes(&self, entity: EntityType) -> bool {
        self.entity_type.is_none_or(|t| t == entity)
    }

    fn status_for<T: std::str::FromStr>(&self) -> Option<T> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
    }
}

impl TcmService {
    /// Case-insensitive substring search over test cases, projects and tags.
    /// Case folding covers all of Unicode, not just ASCII.
    ///
    /// An empty (or all-whitespace) query returns no results.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, DatabaseError> {
        let q = query.q.trim();
        if q.is_empty() {
            return Ok(SearchResults::empty(q));
        }
        let pattern = like_pattern(&fold(q));

        let conn = self.db().read().await;
        let testcases = if query.includes(EntityType::TestCase) {
            search_testcases(&conn, &pattern, query.status_for()).await?
        } else {
            Vec::new()
        };
        let projects = if query.includes(EntityType::Project) {
            search_projects(&conn, &pattern, query.status_for()).await?
        } else {
            Vec::new()
        };
        let tags = if query.includes(EntityType::Tag) {
            search_tags(&conn, &pattern, query.category.as_deref()).await?
        } else {
            Vec::new()
        };
        drop(conn);

        let results = SearchResults::new(q, testcases, projects, tags);
        tracing::debug!(query = q, total = results.total, "search");
        Ok(results)
    }
}

async fn search_testcases(
    conn: &libsql::Connection,
    pattern: &str,
    status: Option<TestCaseStatus>,
) -> Result<Vec<TestCase>, DatabaseError> {
    let mut params: Vec<libsql::Value> = vec![pattern.into()];
    let mut sql = format!(
        "SELECT {TESTCASE_COLUMNS} FROM testcases
         WHERE (title_folded LIKE ?1 ESCAPE '\\'
             OR description_folded LIKE ?1 ESCAPE '\\'
             OR steps_folded LIKE ?1 ESCAPE '\\')"
    );
    if let Some(status) = status {
        params.push(status.as_str().into());
        sql.push_str(&format!(" AND status = ?{}", params.len()));
    }
    params.push(i64::from(SEARCH_GROUP_LIMIT).into());
    sql.push_str(&format!(" ORDER BY updated_at DESC, id DESC LIMIT ?{}", params.len()));

    let rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    collect_testcases(conn, rows).await
}

async fn search_projects(
    conn: &libsql::Connection,
    pattern: &str,
    status: Option<ProjectStatus>,
) -> Result<Vec<Project>, DatabaseError> {
    let mut params: Vec<libsql::Value> = vec![pattern.into()];
    let mut sql = format!(
        "SELECT {PROJECT_COLUMNS} FROM projects
         WHERE (name_folded LIKE ?1 ESCAPE '\\'
             OR description_folded LIKE ?1 ESCAPE '\\')"
    );
    if let Some(status) = status {
        params.push(status.as_str().into());
        sql.push_str(&format!(" AND status = ?{}", params.len()));
    }
    params.push(i64::from(SEARCH_GROUP_LIMIT).into());
    sql.push_str(&format!(" ORDER BY updated_at DESC, id DESC LIMIT ?{}", params.len()));

    let rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    collect_projects(conn, rows).await
}

async fn search_tags(
    conn: &libsql::Connection,
    pattern: &str,
    category: Option<&str>,
) -> Result<Vec<TagHit>, DatabaseError> {
    let mut params: Vec<libsql::Value> = vec![pattern.into()];
    let mut sql = format!(
        "SELECT {TAG_COLUMNS},
                (SELECT COUNT(*) FROM testcase_tags tt WHERE tt.tag_id = tags.id)
         FROM tags
         WHERE (category_folded LIKE ?1 ESCAPE '\\'
             OR value_folded LIKE ?1 ESCAPE '\\'
             OR description_folded LIKE ?1 ESCAPE '\\')"
    );
    if let Some(category) = category.filter(|c| !c.is_empty()) {
        params.push(category.into());
        sql.push_str(&format!(" AND category = ?{}", params.len()));
    }
    params.push(i64::from(SEARCH_GROUP_LIMIT).into());
    sql.push_str(&format!(" ORDER BY category, value LIMIT ?{}", params.len()));

    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    let mut hits = Vec::new();
    while let Some(row) = rows.next().await? {
        hits.push(TagHit {
            tag: row_to_tag(&row)?,
            testcase_count: get_count(&row, 7)?,
        });
    }
    Ok(hits)
}
