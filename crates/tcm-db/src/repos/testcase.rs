//! Test case repository: CRUD, filtered listing and tag association.

use tcm_core::entities::{NewTestCase, Project, TestCase};
use tcm_core::enums::{EntityType, TestCasePriority, TestCaseStatus};
use tcm_core::pagination::Window;

use crate::TcmDb;
use crate::error::DatabaseError;
use crate::helpers::{fold, get_opt_string, like_pattern, now, parse_datetime, parse_enum};
use crate::repos::project::{PROJECT_COLUMNS_P, attach_testcase_ids, row_to_project};
use crate::repos::tag::{fetch_tag, tags_by_testcase};
use crate::repos::{TESTCASE_FOLDED, count, missing_ids, refresh_folded, where_clause};
use crate::service::{Paged, TcmService};
use crate::updates::testcase::TestCaseUpdate;

pub(crate) const TESTCASE_COLUMNS: &str = "id, title, description, preconditions, steps, \
     expected_results, actual_results, status, priority, created_by, updated_by, created_at, updated_at";

/// The same columns qualified with the `tc` alias, for joins.
pub(crate) const TESTCASE_COLUMNS_TC: &str = "tc.id, tc.title, tc.description, tc.preconditions, \
     tc.steps, tc.expected_results, tc.actual_results, tc.status, tc.priority, tc.created_by, \
     tc.updated_by, tc.created_at, tc.updated_at";

/// Filters for [`TcmService::list_testcases`]. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct TestCaseFilter {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    pub status: Option<TestCaseStatus>,
    pub priority: Option<TestCasePriority>,
    /// Only test cases carrying this tag.
    pub tag_id: Option<i64>,
}

/// Reads a test case row. Tags are loaded separately.
pub(crate) fn row_to_testcase(row: &libsql::Row) -> Result<TestCase, DatabaseError> {
    Ok(TestCase {
        id: row.get::<i64>(0)?,
        title: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        preconditions: get_opt_string(row, 3)?,
        steps: row.get::<String>(4)?,
        expected_results: row.get::<String>(5)?,
        actual_results: get_opt_string(row, 6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        priority: parse_enum(&row.get::<String>(8)?)?,
        created_by: get_opt_string(row, 9)?,
        updated_by: get_opt_string(row, 10)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
        tags: Vec::new(),
    })
}

/// Fill in `tags` for every test case with a single query.
pub(crate) async fn attach_tags(
    conn: &libsql::Connection,
    testcases: &mut [TestCase],
) -> Result<(), DatabaseError> {
    let ids: Vec<i64> = testcases.iter().map(|tc| tc.id).collect();
    let mut by_testcase = tags_by_testcase(conn, &ids).await?;
    for tc in testcases.iter_mut() {
        tc.tags = by_testcase.remove(&tc.id).unwrap_or_default();
    }
    Ok(())
}

/// Collect rows into test cases and load their tags.
pub(crate) async fn collect_testcases(
    conn: &libsql::Connection,
    mut rows: libsql::Rows,
) -> Result<Vec<TestCase>, DatabaseError> {
    let mut testcases = Vec::new();
    while let Some(row) = rows.next().await? {
        testcases.push(row_to_testcase(&row)?);
    }
    attach_tags(conn, &mut testcases).await?;
    Ok(testcases)
}

pub(crate) async fn fetch_testcase(
    conn: &libsql::Connection,
    id: i64,
) -> Result<TestCase, DatabaseError> {
    let rows = conn
        .query(
            &format!("SELECT {TESTCASE_COLUMNS} FROM testcases WHERE id = ?1"),
            [id],
        )
        .await?;
    collect_testcases(conn, rows)
        .await?
        .pop()
        .ok_or_else(|| DatabaseError::not_found(EntityType::TestCase, id))
}

async fn ensure_testcase_exists(conn: &libsql::Connection, id: i64) -> Result<(), DatabaseError> {
    if missing_ids(conn, "testcases", &[id]).await?.is_empty() {
        Ok(())
    } else {
        Err(DatabaseError::not_found(EntityType::TestCase, id))
    }
}

/// Fail with every unknown tag id before anything is written.
async fn ensure_tags_exist(conn: &libsql::Connection, tag_ids: &[i64]) -> Result<(), DatabaseError> {
    let missing = missing_ids(conn, "tags", tag_ids).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatabaseError::MissingIds {
            entity: EntityType::Tag,
            ids: missing,
        })
    }
}

async fn link_tags(
    conn: &libsql::Connection,
    testcase_id: i64,
    tag_ids: &[i64],
    ts: &str,
) -> Result<(), DatabaseError> {
    for tag_id in tag_ids {
        conn.execute(
            "INSERT INTO testcase_tags (testcase_id, tag_id, created_at) VALUES (?1, ?2, ?3)",
            libsql::params![testcase_id, *tag_id, ts],
        )
        .await?;
    }
    Ok(())
}

async fn is_tagged(
    conn: &libsql::Connection,
    testcase_id: i64,
    tag_id: i64,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT 1 FROM testcase_tags WHERE testcase_id = ?1 AND tag_id = ?2",
            libsql::params![testcase_id, tag_id],
        )
        .await?;
    Ok(rows.next().await?.is_some())
}

async fn touch(conn: &libsql::Connection, testcase_id: i64, ts: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE testcases SET updated_at = ?1 WHERE id = ?2",
        libsql::params![ts, testcase_id],
    )
    .await?;
    Ok(())
}

async fn create_testcase_in(
    conn: &libsql::Connection,
    input: &NewTestCase,
) -> Result<TestCase, DatabaseError> {
    ensure_tags_exist(conn, &input.tag_ids).await?;

    let (_, ts) = now();
    conn.execute(
        "INSERT INTO testcases (title, description, preconditions, steps, expected_results,
                                actual_results, status, priority, created_by, updated_by,
                                created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        libsql::params![
            input.title.as_str(),
            input.description.as_deref(),
            input.preconditions.as_deref(),
            input.steps.as_str(),
            input.expected_results.as_str(),
            input.actual_results.as_deref(),
            input.status.as_str(),
            input.priority.as_str(),
            input.created_by.as_deref(),
            input.updated_by.as_deref(),
            ts.as_str(),
            ts.as_str()
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();
    refresh_folded(conn, TESTCASE_FOLDED, Some(id)).await?;
    link_tags(conn, id, &input.tag_ids, &ts).await?;
    fetch_testcase(conn, id).await
}

async fn update_testcase_in(
    conn: &libsql::Connection,
    testcase_id: i64,
    update: &TestCaseUpdate,
) -> Result<TestCase, DatabaseError> {
    ensure_testcase_exists(conn, testcase_id).await?;

    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1;

    if let Some(ref title) = update.title {
        sets.push(format!("title = ?{idx}"));
        params.push(title.as_str().into());
        idx += 1;
    }
    if let Some(ref description) = update.description {
        sets.push(format!("description = ?{idx}"));
        params.push(description.as_deref().into());
        idx += 1;
    }
    if let Some(ref preconditions) = update.preconditions {
        sets.push(format!("preconditions = ?{idx}"));
        params.push(preconditions.as_deref().into());
        idx += 1;
    }
    if let Some(ref steps) = update.steps {
        sets.push(format!("steps = ?{idx}"));
        params.push(steps.as_str().into());
        idx += 1;
    }
    if let Some(ref expected) = update.expected_results {
        sets.push(format!("expected_results = ?{idx}"));
        params.push(expected.as_str().into());
        idx += 1;
    }
    if let Some(ref actual) = update.actual_results {
        sets.push(format!("actual_results = ?{idx}"));
        params.push(actual.as_deref().into());
        idx += 1;
    }
    if let Some(status) = update.status {
        sets.push(format!("status = ?{idx}"));
        params.push(status.as_str().into());
        idx += 1;
    }
    if let Some(priority) = update.priority {
        sets.push(format!("priority = ?{idx}"));
        params.push(priority.as_str().into());
        idx += 1;
    }
    if let Some(ref updated_by) = update.updated_by {
        sets.push(format!("updated_by = ?{idx}"));
        params.push(updated_by.as_deref().into());
        idx += 1;
    }

    if sets.is_empty() && update.tag_ids.is_none() {
        return fetch_testcase(conn, testcase_id).await;
    }

    let (_, ts) = now();
    if let Some(ref tag_ids) = update.tag_ids {
        ensure_tags_exist(conn, tag_ids).await?;
        conn.execute(
            "DELETE FROM testcase_tags WHERE testcase_id = ?1",
            [testcase_id],
        )
        .await?;
        link_tags(conn, testcase_id, tag_ids, &ts).await?;
    }

    sets.push(format!("updated_at = ?{idx}"));
    params.push(ts.as_str().into());
    idx += 1;

    params.push(testcase_id.into());
    let sql = format!("UPDATE testcases SET {} WHERE id = ?{idx}", sets.join(", "));
    conn.execute(&sql, libsql::params_from_iter(params)).await?;
    refresh_folded(conn, TESTCASE_FOLDED, Some(testcase_id)).await?;

    fetch_testcase(conn, testcase_id).await
}

async fn delete_testcase_in(conn: &libsql::Connection, testcase_id: i64) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM testcase_tags WHERE testcase_id = ?1",
        [testcase_id],
    )
    .await?;
    conn.execute(
        "DELETE FROM project_testcases WHERE testcase_id = ?1",
        [testcase_id],
    )
    .await?;
    let deleted = conn
        .execute("DELETE FROM testcases WHERE id = ?1", [testcase_id])
        .await?;
    if deleted == 0 {
        return Err(DatabaseError::not_found(EntityType::TestCase, testcase_id));
    }
    Ok(())
}

async fn add_tag_in(
    conn: &libsql::Connection,
    testcase_id: i64,
    tag_id: i64,
) -> Result<TestCase, DatabaseError> {
    ensure_testcase_exists(conn, testcase_id).await?;
    fetch_tag(conn, tag_id).await?;
    if is_tagged(conn, testcase_id, tag_id).await? {
        return Err(DatabaseError::AlreadyAssociated(format!(
            "Tag {tag_id} is already associated with test case {testcase_id}"
        )));
    }
    let (_, ts) = now();
    link_tags(conn, testcase_id, &[tag_id], &ts).await?;
    touch(conn, testcase_id, &ts).await?;
    fetch_testcase(conn, testcase_id).await
}

async fn remove_tag_in(
    conn: &libsql::Connection,
    testcase_id: i64,
    tag_id: i64,
) -> Result<TestCase, DatabaseError> {
    ensure_testcase_exists(conn, testcase_id).await?;
    if !is_tagged(conn, testcase_id, tag_id).await? {
        return Err(DatabaseError::NotAssociated(format!(
            "Tag {tag_id} is not associated with test case {testcase_id}"
        )));
    }
    conn.execute(
        "DELETE FROM testcase_tags WHERE testcase_id = ?1 AND tag_id = ?2",
        libsql::params![testcase_id, tag_id],
    )
    .await?;
    let (_, ts) = now();
    touch(conn, testcase_id, &ts).await?;
    fetch_testcase(conn, testcase_id).await
}

impl TcmService {
    /// Create a test case and link its tags. Any unknown tag id aborts the
    /// whole operation.
    pub async fn create_testcase(&self, mut input: NewTestCase) -> Result<TestCase, DatabaseError> {
        input.validate()?;
        let (_guard, tx) = self.db().begin().await?;
        let result = create_testcase_in(&tx, &input).await;
        let testcase = TcmDb::finish(tx, result).await?;
        tracing::debug!(id = testcase.id, tags = testcase.tags.len(), "created test case");
        Ok(testcase)
    }

    pub async fn get_testcase(&self, testcase_id: i64) -> Result<TestCase, DatabaseError> {
        let conn = self.db().read().await;
        fetch_testcase(&conn, testcase_id).await
    }

    /// Apply a partial update. A present `tag_ids` replaces the tag set.
    pub async fn update_testcase(
        &self,
        testcase_id: i64,
        mut update: TestCaseUpdate,
    ) -> Result<TestCase, DatabaseError> {
        update.validate()?;
        let (_guard, tx) = self.db().begin().await?;
        let result = update_testcase_in(&tx, testcase_id, &update).await;
        TcmDb::finish(tx, result).await
    }

    /// Delete a test case and its tag and project associations.
    pub async fn delete_testcase(&self, testcase_id: i64) -> Result<(), DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = delete_testcase_in(&tx, testcase_id).await;
        TcmDb::finish(tx, result).await
    }

    /// Test cases ordered by id descending, with the filtered total.
    pub async fn list_testcases(
        &self,
        filter: &TestCaseFilter,
        window: Window,
    ) -> Result<Paged<TestCase>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(like_pattern(&fold(search)).into());
            let n = params.len();
            conditions.push(format!(
                "(title_folded LIKE ?{n} ESCAPE '\\' OR description_folded LIKE ?{n} ESCAPE '\\')"
            ));
        }
        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(priority) = filter.priority {
            params.push(priority.as_str().into());
            conditions.push(format!("priority = ?{}", params.len()));
        }
        if let Some(tag_id) = filter.tag_id {
            params.push(tag_id.into());
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM testcase_tags tt WHERE tt.testcase_id = testcases.id AND tt.tag_id = ?{})",
                params.len()
            ));
        }

        let where_sql = where_clause(&conditions);
        let conn = self.db().read().await;
        let total = count(
            &conn,
            &format!("SELECT COUNT(*) FROM testcases {where_sql}"),
            params.clone(),
        )
        .await?;

        let limit_idx = params.len() + 1;
        params.push(i64::from(window.limit).into());
        params.push(i64::from(window.skip).into());
        let sql = format!(
            "SELECT {TESTCASE_COLUMNS} FROM testcases {where_sql}
             ORDER BY id DESC LIMIT ?{limit_idx} OFFSET ?{}",
            limit_idx + 1
        );
        let rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let items = collect_testcases(&conn, rows).await?;
        Ok(Paged { items, total })
    }

    /// Every test case, id descending. Used by the project page's picker.
    pub async fn all_testcases(&self) -> Result<Vec<TestCase>, DatabaseError> {
        let conn = self.db().read().await;
        let rows = conn
            .query(
                &format!("SELECT {TESTCASE_COLUMNS} FROM testcases ORDER BY id DESC"),
                (),
            )
            .await?;
        collect_testcases(&conn, rows).await
    }

    pub async fn count_testcases(&self) -> Result<u64, DatabaseError> {
        let conn = self.db().read().await;
        count(&conn, "SELECT COUNT(*) FROM testcases", Vec::new()).await
    }

    /// Link a tag to a test case.
    ///
    /// Fails with not-found if either side is missing, and with
    /// already-associated if the link exists.
    pub async fn add_tag_to_testcase(
        &self,
        testcase_id: i64,
        tag_id: i64,
    ) -> Result<TestCase, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = add_tag_in(&tx, testcase_id, tag_id).await;
        TcmDb::finish(tx, result).await
    }

    /// Unlink a tag from a test case. Fails with not-associated if there is no link.
    pub async fn remove_tag_from_testcase(
        &self,
        testcase_id: i64,
        tag_id: i64,
    ) -> Result<TestCase, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = remove_tag_in(&tx, testcase_id, tag_id).await;
        TcmDb::finish(tx, result).await
    }

    /// Projects that contain the test case, ordered by name.
    pub async fn projects_for_testcase(
        &self,
        testcase_id: i64,
    ) -> Result<Vec<Project>, DatabaseError> {
        let conn = self.db().read().await;
        ensure_testcase_exists(&conn, testcase_id).await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {PROJECT_COLUMNS_P} FROM projects p
                     JOIN project_testcases pt ON pt.project_id = p.id
                     WHERE pt.testcase_id = ?1
                     ORDER BY p.name"
                ),
                [testcase_id],
            )
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        attach_testcase_ids(&conn, &mut projects).await?;
        Ok(projects)
    }
}
