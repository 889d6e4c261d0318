//! Project repository: CRUD, listing and test case membership.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tcm_core::entities::{NewProject, Project, TestCase};
use tcm_core::enums::{EntityType, ProjectStatus};
use tcm_core::pagination::Window;
use tcm_core::validation;

use crate::TcmDb;
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, now, parse_datetime, parse_enum, parse_optional_datetime, placeholders,
    to_db_timestamp,
};
use crate::repos::testcase::{TESTCASE_COLUMNS_TC, collect_testcases};
use crate::repos::{PROJECT_FOLDED, count, missing_ids, refresh_folded, where_clause};
use crate::service::{Paged, TcmService};
use crate::updates::project::ProjectUpdate;

pub(crate) const PROJECT_COLUMNS: &str = "id, name, description, status, start_date, end_date, \
     created_by, updated_by, created_at, updated_at";

/// The same columns qualified with the `p` alias, for joins.
pub(crate) const PROJECT_COLUMNS_P: &str = "p.id, p.name, p.description, p.status, p.start_date, \
     p.end_date, p.created_by, p.updated_by, p.created_at, p.updated_at";

/// Filters for [`TcmService::list_projects`].
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
}

/// Reads a project row. Test case ids are loaded separately.
pub(crate) fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        start_date: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        end_date: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        created_by: get_opt_string(row, 6)?,
        updated_by: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
        testcase_ids: Vec::new(),
    })
}

/// Fill in `testcase_ids` for every project with a single query.
pub(crate) async fn attach_testcase_ids(
    conn: &libsql::Connection,
    projects: &mut [Project],
) -> Result<(), DatabaseError> {
    if projects.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
    let sql = format!(
        "SELECT project_id, testcase_id FROM project_testcases
         WHERE project_id IN ({}) ORDER BY testcase_id",
        placeholders(1, ids.len())
    );
    let params: Vec<libsql::Value> = ids.iter().map(|id| (*id).into()).collect();
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;

    let mut by_project: HashMap<i64, Vec<i64>> = HashMap::new();
    while let Some(row) = rows.next().await? {
        by_project
            .entry(row.get::<i64>(0)?)
            .or_default()
            .push(row.get::<i64>(1)?);
    }
    for project in projects.iter_mut() {
        project.testcase_ids = by_project.remove(&project.id).unwrap_or_default();
    }
    Ok(())
}

pub(crate) async fn collect_projects(
    conn: &libsql::Connection,
    mut rows: libsql::Rows,
) -> Result<Vec<Project>, DatabaseError> {
    let mut projects = Vec::new();
    while let Some(row) = rows.next().await? {
        projects.push(row_to_project(&row)?);
    }
    attach_testcase_ids(conn, &mut projects).await?;
    Ok(projects)
}

pub(crate) async fn fetch_project(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Project, DatabaseError> {
    let rows = conn
        .query(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            [id],
        )
        .await?;
    collect_projects(conn, rows)
        .await?
        .pop()
        .ok_or_else(|| DatabaseError::not_found(EntityType::Project, id))
}

async fn ensure_unique_name(
    conn: &libsql::Connection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id FROM projects WHERE name = ?1 AND id != ?2",
            libsql::params![name, exclude_id.unwrap_or(0)],
        )
        .await?;
    if rows.next().await?.is_some() {
        return Err(DatabaseError::Duplicate(format!(
            "Project with name '{name}' already exists"
        )));
    }
    Ok(())
}

async fn ensure_testcases_exist(
    conn: &libsql::Connection,
    testcase_ids: &[i64],
) -> Result<(), DatabaseError> {
    let missing = missing_ids(conn, "testcases", testcase_ids).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatabaseError::MissingIds {
            entity: EntityType::TestCase,
            ids: missing,
        })
    }
}

async fn link_testcases(
    conn: &libsql::Connection,
    project_id: i64,
    testcase_ids: &[i64],
    ts: &str,
) -> Result<(), DatabaseError> {
    for testcase_id in testcase_ids {
        conn.execute(
            "INSERT INTO project_testcases (project_id, testcase_id, created_at) VALUES (?1, ?2, ?3)",
            libsql::params![project_id, *testcase_id, ts],
        )
        .await?;
    }
    Ok(())
}

async fn contains_testcase(
    conn: &libsql::Connection,
    project_id: i64,
    testcase_id: i64,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT 1 FROM project_testcases WHERE project_id = ?1 AND testcase_id = ?2",
            libsql::params![project_id, testcase_id],
        )
        .await?;
    Ok(rows.next().await?.is_some())
}

fn opt_timestamp(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(to_db_timestamp)
}

async fn create_project_in(
    conn: &libsql::Connection,
    input: &NewProject,
) -> Result<Project, DatabaseError> {
    ensure_unique_name(conn, &input.name, None).await?;
    ensure_testcases_exist(conn, &input.testcase_ids).await?;

    let (_, ts) = now();
    conn.execute(
        "INSERT INTO projects (name, description, status, start_date, end_date,
                               created_by, updated_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            input.name.as_str(),
            input.description.as_deref(),
            input.status.as_str(),
            opt_timestamp(input.start_date),
            opt_timestamp(input.end_date),
            input.created_by.as_deref(),
            input.updated_by.as_deref(),
            ts.as_str(),
            ts.as_str()
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();
    refresh_folded(conn, PROJECT_FOLDED, Some(id)).await?;
    link_testcases(conn, id, &input.testcase_ids, &ts).await?;
    fetch_project(conn, id).await
}

async fn update_project_in(
    conn: &libsql::Connection,
    project_id: i64,
    update: &ProjectUpdate,
) -> Result<Project, DatabaseError> {
    let current = fetch_project(conn, project_id).await?;

    // The range is checked on the merged result, since only one end may change.
    let start = update.start_date.unwrap_or(current.start_date);
    let end = update.end_date.unwrap_or(current.end_date);
    validation::check_date_range(start, end)?;

    if let Some(ref name) = update.name {
        if *name != current.name {
            ensure_unique_name(conn, name, Some(project_id)).await?;
        }
    }

    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1;

    if let Some(ref name) = update.name {
        sets.push(format!("name = ?{idx}"));
        params.push(name.as_str().into());
        idx += 1;
    }
    if let Some(ref description) = update.description {
        sets.push(format!("description = ?{idx}"));
        params.push(description.as_deref().into());
        idx += 1;
    }
    if let Some(status) = update.status {
        sets.push(format!("status = ?{idx}"));
        params.push(status.as_str().into());
        idx += 1;
    }
    if let Some(start_date) = update.start_date {
        sets.push(format!("start_date = ?{idx}"));
        params.push(opt_timestamp(start_date).into());
        idx += 1;
    }
    if let Some(end_date) = update.end_date {
        sets.push(format!("end_date = ?{idx}"));
        params.push(opt_timestamp(end_date).into());
        idx += 1;
    }
    if let Some(ref updated_by) = update.updated_by {
        sets.push(format!("updated_by = ?{idx}"));
        params.push(updated_by.as_deref().into());
        idx += 1;
    }

    if sets.is_empty() && update.testcase_ids.is_none() {
        return Ok(current);
    }

    let (_, ts) = now();
    if let Some(ref testcase_ids) = update.testcase_ids {
        ensure_testcases_exist(conn, testcase_ids).await?;
        conn.execute(
            "DELETE FROM project_testcases WHERE project_id = ?1",
            [project_id],
        )
        .await?;
        link_testcases(conn, project_id, testcase_ids, &ts).await?;
    }

    sets.push(format!("updated_at = ?{idx}"));
    params.push(ts.as_str().into());
    idx += 1;

    params.push(project_id.into());
    let sql = format!("UPDATE projects SET {} WHERE id = ?{idx}", sets.join(", "));
    conn.execute(&sql, libsql::params_from_iter(params)).await?;
    refresh_folded(conn, PROJECT_FOLDED, Some(project_id)).await?;

    fetch_project(conn, project_id).await
}

async fn delete_project_in(conn: &libsql::Connection, project_id: i64) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM project_testcases WHERE project_id = ?1",
        [project_id],
    )
    .await?;
    let deleted = conn
        .execute("DELETE FROM projects WHERE id = ?1", [project_id])
        .await?;
    if deleted == 0 {
        return Err(DatabaseError::not_found(EntityType::Project, project_id));
    }
    Ok(())
}

async fn touch(conn: &libsql::Connection, project_id: i64, ts: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
        libsql::params![ts, project_id],
    )
    .await?;
    Ok(())
}

async fn add_testcase_in(
    conn: &libsql::Connection,
    project_id: i64,
    testcase_id: i64,
) -> Result<Project, DatabaseError> {
    fetch_project(conn, project_id).await?;
    if !missing_ids(conn, "testcases", &[testcase_id]).await?.is_empty() {
        return Err(DatabaseError::not_found(EntityType::TestCase, testcase_id));
    }
    if contains_testcase(conn, project_id, testcase_id).await? {
        return Err(DatabaseError::AlreadyAssociated(format!(
            "Test case {testcase_id} is already associated with project {project_id}"
        )));
    }
    let (_, ts) = now();
    link_testcases(conn, project_id, &[testcase_id], &ts).await?;
    touch(conn, project_id, &ts).await?;
    fetch_project(conn, project_id).await
}

async fn add_testcases_in(
    conn: &libsql::Connection,
    project_id: i64,
    testcase_ids: &[i64],
) -> Result<Project, DatabaseError> {
    let current = fetch_project(conn, project_id).await?;
    let mut ids = testcase_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(current);
    }
    ensure_testcases_exist(conn, &ids).await?;

    let linked: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| current.testcase_ids.contains(id))
        .collect();
    if !linked.is_empty() {
        return Err(DatabaseError::AlreadyAssociated(format!(
            "Test cases {linked:?} are already associated with project {project_id}"
        )));
    }

    let (_, ts) = now();
    link_testcases(conn, project_id, &ids, &ts).await?;
    touch(conn, project_id, &ts).await?;
    fetch_project(conn, project_id).await
}

async fn remove_testcase_in(
    conn: &libsql::Connection,
    project_id: i64,
    testcase_id: i64,
) -> Result<Project, DatabaseError> {
    fetch_project(conn, project_id).await?;
    if !contains_testcase(conn, project_id, testcase_id).await? {
        return Err(DatabaseError::NotAssociated(format!(
            "Test case {testcase_id} is not associated with project {project_id}"
        )));
    }
    conn.execute(
        "DELETE FROM project_testcases WHERE project_id = ?1 AND testcase_id = ?2",
        libsql::params![project_id, testcase_id],
    )
    .await?;
    let (_, ts) = now();
    touch(conn, project_id, &ts).await?;
    fetch_project(conn, project_id).await
}

impl TcmService {
    /// Create a project. The name must be unique and every test case id must exist.
    pub async fn create_project(&self, mut input: NewProject) -> Result<Project, DatabaseError> {
        input.validate()?;
        let (_guard, tx) = self.db().begin().await?;
        let result = create_project_in(&tx, &input).await;
        let project = TcmDb::finish(tx, result).await?;
        tracing::debug!(id = project.id, name = %project.name, "created project");
        Ok(project)
    }

    pub async fn get_project(&self, project_id: i64) -> Result<Project, DatabaseError> {
        let conn = self.db().read().await;
        fetch_project(&conn, project_id).await
    }

    pub async fn update_project(
        &self,
        project_id: i64,
        mut update: ProjectUpdate,
    ) -> Result<Project, DatabaseError> {
        update.validate()?;
        let (_guard, tx) = self.db().begin().await?;
        let result = update_project_in(&tx, project_id, &update).await;
        TcmDb::finish(tx, result).await
    }

    pub async fn delete_project(&self, project_id: i64) -> Result<(), DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = delete_project_in(&tx, project_id).await;
        TcmDb::finish(tx, result).await
    }

    /// Projects ordered by id descending, with the filtered total.
    pub async fn list_projects(
        &self,
        filter: &ProjectFilter,
        window: Window,
    ) -> Result<Paged<Project>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }

        let where_sql = where_clause(&conditions);
        let conn = self.db().read().await;
        let total = count(
            &conn,
            &format!("SELECT COUNT(*) FROM projects {where_sql}"),
            params.clone(),
        )
        .await?;

        let limit_idx = params.len() + 1;
        params.push(i64::from(window.limit).into());
        params.push(i64::from(window.skip).into());
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects {where_sql}
             ORDER BY id DESC LIMIT ?{limit_idx} OFFSET ?{}",
            limit_idx + 1
        );
        let rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let items = collect_projects(&conn, rows).await?;
        Ok(Paged { items, total })
    }

    pub async fn count_projects(&self) -> Result<u64, DatabaseError> {
        let conn = self.db().read().await;
        count(&conn, "SELECT COUNT(*) FROM projects", Vec::new()).await
    }

    /// The project's test cases with tags, id descending.
    pub async fn project_testcases(&self, project_id: i64) -> Result<Vec<TestCase>, DatabaseError> {
        let conn = self.db().read().await;
        fetch_project(&conn, project_id).await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {TESTCASE_COLUMNS_TC} FROM testcases tc
                     JOIN project_testcases pt ON pt.testcase_id = tc.id
                     WHERE pt.project_id = ?1
                     ORDER BY tc.id DESC"
                ),
                [project_id],
            )
            .await?;
        collect_testcases(&conn, rows).await
    }

    /// Add a test case to a project.
    ///
    /// Fails with not-found if either side is missing, and with
    /// already-associated if it is already a member.
    pub async fn add_testcase_to_project(
        &self,
        project_id: i64,
        testcase_id: i64,
    ) -> Result<Project, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = add_testcase_in(&tx, project_id, testcase_id).await;
        TcmDb::finish(tx, result).await
    }

    /// Link several test cases in one transaction. Either every id is linked
    /// or none is: an unknown id fails with [`DatabaseError::MissingIds`] and
    /// an existing link with [`DatabaseError::AlreadyAssociated`].
    /// Duplicate ids are linked once.
    pub async fn add_testcases_to_project(
        &self,
        project_id: i64,
        testcase_ids: &[i64],
    ) -> Result<Project, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = add_testcases_in(&tx, project_id, testcase_ids).await;
        let project = TcmDb::finish(tx, result).await?;
        tracing::debug!(project_id, linked = project.testcase_ids.len(), "linked test cases");
        Ok(project)
    }

    pub async fn remove_testcase_from_project(
        &self,
        project_id: i64,
        testcase_id: i64,
    ) -> Result<Project, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = remove_testcase_in(&tx, project_id, testcase_id).await;
        TcmDb::finish(tx, result).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tcm_core::entities::NewProject;
    use tcm_core::enums::ProjectStatus;
    use tcm_core::pagination::Window;

    use super::ProjectFilter;
    use crate::error::DatabaseError;
    use crate::test_support::{count_rows, make_project, make_testcase, test_service};
    use crate::updates::project::ProjectUpdateBuilder;

    #[tokio::test]
    async fn create_with_dates_and_testcases() {
        let svc = test_service().await;
        let a = make_testcase(&svc, "A", &[]).await;
        let b = make_testcase(&svc, "B", &[]).await;

        let mut input = NewProject::new("Release 1.0");
        input.start_date = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        input.end_date = Some(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap());
        input.testcase_ids = vec![b.id, a.id];
        let project = svc.create_project(input).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.testcase_ids, vec![a.id, b.id]);
        assert_eq!(project.start_date, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(svc.get_project(project.id).await.unwrap(), project);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let svc = test_service().await;
        make_project(&svc, "Release", &[]).await;
        let err = svc.create_project(NewProject::new("Release")).await.unwrap_err();
        assert_eq!(err.to_string(), "Project with name 'Release' already exists");
        assert_eq!(count_rows(&svc, "projects").await, 1);
    }

    #[tokio::test]
    async fn missing_testcases_abort_creation() {
        let svc = test_service().await;
        let mut input = NewProject::new("Ghost");
        input.testcase_ids = vec![99999];
        let err = svc.create_project(input).await.unwrap_err();
        assert_eq!(err.to_string(), "Test cases with IDs [99999] not found");
        assert_eq!(count_rows(&svc, "projects").await, 0);
    }

    #[tokio::test]
    async fn update_checks_merged_date_range() {
        let svc = test_service().await;
        let mut input = NewProject::new("Q1");
        input.start_date = Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        let project = svc.create_project(input).await.unwrap();

        let err = svc
            .update_project(
                project.id,
                ProjectUpdateBuilder::new()
                    .end_date(Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
                    .build(),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let cleared = svc
            .update_project(project.id, ProjectUpdateBuilder::new().start_date(None).build())
            .await
            .unwrap();
        assert_eq!(cleared.start_date, None);
    }

    #[tokio::test]
    async fn rename_checks_uniqueness() {
        let svc = test_service().await;
        let a = make_project(&svc, "A", &[]).await;
        make_project(&svc, "B", &[]).await;

        let err = svc
            .update_project(a.id, ProjectUpdateBuilder::new().name("B").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));

        let same = svc
            .update_project(
                a.id,
                ProjectUpdateBuilder::new()
                    .name("A")
                    .status(ProjectStatus::OnHold)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(same.status, ProjectStatus::OnHold);
    }

    #[tokio::test]
    async fn update_replaces_membership() {
        let svc = test_service().await;
        let a = make_testcase(&svc, "A", &[]).await;
        let b = make_testcase(&svc, "B", &[]).await;
        let project = make_project(&svc, "P", &[a.id]).await;

        let updated = svc
            .update_project(project.id, ProjectUpdateBuilder::new().testcase_ids(vec![b.id]).build())
            .await
            .unwrap();
        assert_eq!(updated.testcase_ids, vec![b.id]);

        let err = svc
            .update_project(
                project.id,
                ProjectUpdateBuilder::new().testcase_ids(vec![a.id, 4242]).build(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MissingIds { .. }));
        assert_eq!(svc.get_project(project.id).await.unwrap().testcase_ids, vec![b.id]);
    }

    #[tokio::test]
    async fn delete_cascades_to_membership() {
        let svc = test_service().await;
        let tc = make_testcase(&svc, "A", &[]).await;
        let project = make_project(&svc, "P", &[tc.id]).await;

        svc.delete_project(project.id).await.unwrap();
        assert_eq!(count_rows(&svc, "project_testcases").await, 0);
        assert_eq!(count_rows(&svc, "testcases").await, 1);
        assert!(svc.delete_project(project.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn membership_preconditions() {
        let svc = test_service().await;
        let tc = make_testcase(&svc, "A", &[]).await;
        let project = make_project(&svc, "P", &[]).await;

        let added = svc.add_testcase_to_project(project.id, tc.id).await.unwrap();
        assert_eq!(added.testcase_ids, vec![tc.id]);

        let err = svc.add_testcase_to_project(project.id, tc.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Test case {} is already associated with project {}", tc.id, project.id)
        );

        let members = svc.project_testcases(project.id).await.unwrap();
        assert_eq!(members.len(), 1);

        let removed = svc.remove_testcase_from_project(project.id, tc.id).await.unwrap();
        assert!(removed.testcase_ids.is_empty());

        let err = svc.remove_testcase_from_project(project.id, tc.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotAssociated(_)));

        assert!(svc.add_testcase_to_project(project.id, 999).await.unwrap_err().is_not_found());
        assert!(svc.add_testcase_to_project(999, tc.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn batch_membership_is_all_or_nothing() {
        let svc = test_service().await;
        let a = make_testcase(&svc, "A", &[]).await;
        let b = make_testcase(&svc, "B", &[]).await;
        let project = make_project(&svc, "P", &[]).await;

        let err = svc
            .add_testcases_to_project(project.id, &[a.id, 99_999])
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MissingIds { ref ids, .. } if *ids == vec![99_999]));
        assert!(svc.get_project(project.id).await.unwrap().testcase_ids.is_empty());

        let added = svc
            .add_testcases_to_project(project.id, &[b.id, a.id, b.id])
            .await
            .unwrap();
        assert_eq!(added.testcase_ids, vec![a.id, b.id]);

        let c = make_testcase(&svc, "C", &[]).await;
        let err = svc
            .add_testcases_to_project(project.id, &[c.id, a.id])
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyAssociated(_)));
        assert_eq!(svc.project_testcases(project.id).await.unwrap().len(), 2);

        assert!(svc.add_testcases_to_project(999, &[c.id]).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let svc = test_service().await;
        make_project(&svc, "Planned", &[]).await;
        let mut active = NewProject::new("Running");
        active.status = ProjectStatus::Active;
        svc.create_project(active).await.unwrap();

        let filter = ProjectFilter {
            status: Some(ProjectStatus::Active),
        };
        let page = svc.list_projects(&filter, Window::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Running");

        let all = svc
            .list_projects(&ProjectFilter::default(), Window::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.items[0].name, "Running");
    }
}
