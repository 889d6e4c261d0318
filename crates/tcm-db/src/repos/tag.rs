//! Tag repository: CRUD, category listing, and batched tag loading for test cases.

use std::collections::HashMap;

use tcm_core::entities::{NewTag, Tag};
use tcm_core::enums::EntityType;
use tcm_core::pagination::Window;

use crate::TcmDb;
use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, now, parse_datetime, placeholders};
use crate::repos::{TAG_FOLDED, count, refresh_folded, where_clause};
use crate::service::{Paged, TcmService};
use crate::updates::tag::TagUpdate;

pub(crate) const TAG_COLUMNS: &str =
    "id, category, value, description, is_predefined, created_at, updated_at";

/// Filters for [`TcmService::list_tags`].
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    /// Exact, case-sensitive category match.
    pub category: Option<String>,
}

pub(crate) fn row_to_tag(row: &libsql::Row) -> Result<Tag, DatabaseError> {
    row_to_tag_at(row, 0)
}

/// Read the seven tag columns starting at `offset`.
fn row_to_tag_at(row: &libsql::Row, offset: i32) -> Result<Tag, DatabaseError> {
    Ok(Tag {
        id: row.get::<i64>(offset)?,
        category: row.get::<String>(offset + 1)?,
        value: row.get::<String>(offset + 2)?,
        description: get_opt_string(row, offset + 3)?,
        is_predefined: get_bool(row, offset + 4)?,
        created_at: parse_datetime(&row.get::<String>(offset + 5)?)?,
        updated_at: parse_datetime(&row.get::<String>(offset + 6)?)?,
    })
}

pub(crate) async fn fetch_tag(conn: &libsql::Connection, id: i64) -> Result<Tag, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Tag, id))?;
    row_to_tag(&row)
}

/// Reject a `(category, value)` pair that another tag already uses.
async fn ensure_unique(
    conn: &libsql::Connection,
    category: &str,
    value: &str,
    exclude_id: Option<i64>,
) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id FROM tags WHERE category = ?1 AND value = ?2 AND id != ?3",
            libsql::params![category, value, exclude_id.unwrap_or(0)],
        )
        .await?;
    if rows.next().await?.is_some() {
        return Err(DatabaseError::Duplicate(format!(
            "Tag with category '{category}' and value '{value}' already exists"
        )));
    }
    Ok(())
}

/// Load the tags of every test case in `testcase_ids` in one query.
///
/// Tags within each test case are ordered by `(category, value)`.
pub(crate) async fn tags_by_testcase(
    conn: &libsql::Connection,
    testcase_ids: &[i64],
) -> Result<HashMap<i64, Vec<Tag>>, DatabaseError> {
    let mut by_testcase: HashMap<i64, Vec<Tag>> = HashMap::new();
    if testcase_ids.is_empty() {
        return Ok(by_testcase);
    }
    let sql = format!(
        "SELECT tt.testcase_id, t.id, t.category, t.value, t.description, t.is_predefined,
                t.created_at, t.updated_at
         FROM testcase_tags tt
         JOIN tags t ON t.id = tt.tag_id
         WHERE tt.testcase_id IN ({})
         ORDER BY t.category, t.value",
        placeholders(1, testcase_ids.len())
    );
    let params: Vec<libsql::Value> = testcase_ids.iter().map(|id| (*id).into()).collect();
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    while let Some(row) = rows.next().await? {
        let testcase_id = row.get::<i64>(0)?;
        by_testcase
            .entry(testcase_id)
            .or_default()
            .push(row_to_tag_at(&row, 1)?);
    }
    Ok(by_testcase)
}

async fn create_tag_in(conn: &libsql::Connection, input: &NewTag) -> Result<Tag, DatabaseError> {
    ensure_unique(conn, &input.category, &input.value, None).await?;
    let (_, ts) = now();
    conn.execute(
        "INSERT INTO tags (category, value, description, is_predefined, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            input.category.as_str(),
            input.value.as_str(),
            input.description.as_deref(),
            i64::from(input.is_predefined),
            ts.as_str(),
            ts.as_str()
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();
    refresh_folded(conn, TAG_FOLDED, Some(id)).await?;
    fetch_tag(conn, id).await
}

async fn update_tag_in(
    conn: &libsql::Connection,
    tag_id: i64,
    update: &TagUpdate,
) -> Result<Tag, DatabaseError> {
    let current = fetch_tag(conn, tag_id).await?;
    if update.is_empty() {
        return Ok(current);
    }

    let category = update.category.as_deref().unwrap_or(&current.category);
    let value = update.value.as_deref().unwrap_or(&current.value);
    if category != current.category || value != current.value {
        ensure_unique(conn, category, value, Some(tag_id)).await?;
    }

    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1;

    if let Some(ref category) = update.category {
        sets.push(format!("category = ?{idx}"));
        params.push(category.as_str().into());
        idx += 1;
    }
    if let Some(ref value) = update.value {
        sets.push(format!("value = ?{idx}"));
        params.push(value.as_str().into());
        idx += 1;
    }
    if let Some(ref description) = update.description {
        sets.push(format!("description = ?{idx}"));
        params.push(description.as_deref().into());
        idx += 1;
    }
    if let Some(is_predefined) = update.is_predefined {
        sets.push(format!("is_predefined = ?{idx}"));
        params.push(i64::from(is_predefined).into());
        idx += 1;
    }

    let (_, ts) = now();
    sets.push(format!("updated_at = ?{idx}"));
    params.push(ts.into());
    idx += 1;

    params.push(tag_id.into());
    let sql = format!("UPDATE tags SET {} WHERE id = ?{idx}", sets.join(", "));
    conn.execute(&sql, libsql::params_from_iter(params)).await?;
    refresh_folded(conn, TAG_FOLDED, Some(tag_id)).await?;

    fetch_tag(conn, tag_id).await
}

async fn delete_tag_in(conn: &libsql::Connection, tag_id: i64) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM testcase_tags WHERE tag_id = ?1", [tag_id])
        .await?;
    let deleted = conn
        .execute("DELETE FROM tags WHERE id = ?1", [tag_id])
        .await?;
    if deleted == 0 {
        return Err(DatabaseError::not_found(EntityType::Tag, tag_id));
    }
    Ok(())
}

pub(crate) async fn delete_all_tags_in(conn: &libsql::Connection) -> Result<u64, DatabaseError> {
    conn.execute("DELETE FROM testcase_tags", ()).await?;
    Ok(conn.execute("DELETE FROM tags", ()).await?)
}

impl TcmService {
    pub async fn create_tag(&self, mut input: NewTag) -> Result<Tag, DatabaseError> {
        input.validate()?;
        let (_guard, tx) = self.db().begin().await?;
        let result = create_tag_in(&tx, &input).await;
        let tag = TcmDb::finish(tx, result).await?;
        tracing::debug!(id = tag.id, label = %tag.label(), "created tag");
        Ok(tag)
    }

    pub async fn get_tag(&self, tag_id: i64) -> Result<Tag, DatabaseError> {
        let conn = self.db().read().await;
        fetch_tag(&conn, tag_id).await
    }

    pub async fn update_tag(
        &self,
        tag_id: i64,
        mut update: TagUpdate,
    ) -> Result<Tag, DatabaseError> {
        update.validate()?;
        let (_guard, tx) = self.db().begin().await?;
        let result = update_tag_in(&tx, tag_id, &update).await;
        TcmDb::finish(tx, result).await
    }

    /// Delete a tag and its test case associations.
    pub async fn delete_tag(&self, tag_id: i64) -> Result<(), DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = delete_tag_in(&tx, tag_id).await;
        TcmDb::finish(tx, result).await
    }

    /// Tags ordered by `(category, value)`, with the filtered total.
    pub async fn list_tags(
        &self,
        filter: &TagFilter,
        window: Window,
    ) -> Result<Paged<Tag>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(category.into());
            conditions.push(format!("category = ?{}", params.len()));
        }

        let where_sql = where_clause(&conditions);
        let conn = self.db().read().await;
        let total = count(
            &conn,
            &format!("SELECT COUNT(*) FROM tags {where_sql}"),
            params.clone(),
        )
        .await?;

        let limit_idx = params.len() + 1;
        params.push(i64::from(window.limit).into());
        params.push(i64::from(window.skip).into());
        let sql = format!(
            "SELECT {TAG_COLUMNS} FROM tags {where_sql}
             ORDER BY category, value LIMIT ?{limit_idx} OFFSET ?{}",
            limit_idx + 1
        );
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_tag(&row)?);
        }
        Ok(Paged { items, total })
    }

    /// Every tag, ordered by `(category, value)`. Used to populate form pickers.
    pub async fn all_tags(&self) -> Result<Vec<Tag>, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY category, value"),
                (),
            )
            .await?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next().await? {
            tags.push(row_to_tag(&row)?);
        }
        Ok(tags)
    }

    /// Distinct categories, alphabetical.
    pub async fn tag_categories(&self) -> Result<Vec<String>, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query("SELECT DISTINCT category FROM tags ORDER BY category", ())
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row.get::<String>(0)?);
        }
        Ok(categories)
    }

    pub async fn count_tags(&self) -> Result<u64, DatabaseError> {
        let conn = self.db().read().await;
        count(&conn, "SELECT COUNT(*) FROM tags", Vec::new()).await
    }

    /// Delete every tag. Returns the number removed.
    pub async fn delete_all_tags(&self) -> Result<u64, DatabaseError> {
        let (_guard, tx) = self.db().begin().await?;
        let result = delete_all_tags_in(&tx).await;
        TcmDb::finish(tx, result).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tokio::time::timeout;
    use tcm_core::entities::NewTag;
    use tcm_core::pagination::Window;

    use super::{TagFilter, create_tag_in};
    use crate::TcmDb;
    use crate::error::DatabaseError;
    use crate::test_support::{count_rows, make_tag, make_testcase, test_service};
    use crate::updates::tag::TagUpdateBuilder;

    #[tokio::test]
    async fn uncommitted_tag_is_never_read() {
        let svc = test_service().await;
        let (guard, tx) = svc.db().begin().await.unwrap();
        let pending = create_tag_in(&tx, &NewTag::new("os", "linux")).await.unwrap();

        let wait = Duration::from_millis(50);
        assert!(timeout(wait, svc.count_tags()).await.is_err());
        assert!(timeout(wait, svc.get_tag(pending.id)).await.is_err());

        let aborted: Result<(), DatabaseError> = Err(DatabaseError::NoResult);
        assert!(TcmDb::finish(tx, aborted).await.is_err());
        drop(guard);

        assert_eq!(svc.count_tags().await.unwrap(), 0);
        assert!(svc.get_tag(pending.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn create_and_get() {
        let svc = test_service().await;
        let tag = svc
            .create_tag(NewTag::new("priority", "high").with_description("High priority"))
            .await
            .unwrap();
        assert!(tag.id > 0);
        assert!(tag.is_predefined);
        assert_eq!(tag.created_at, tag.updated_at);

        let fetched = svc.get_tag(tag.id).await.unwrap();
        assert_eq!(fetched, tag);
        assert_eq!(fetched.description.as_deref(), Some("High priority"));
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected() {
        let svc = test_service().await;
        make_tag(&svc, "priority", "high").await;
        let err = svc
            .create_tag(NewTag::new("priority", "high"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
        assert_eq!(
            err.to_string(),
            "Tag with category 'priority' and value 'high' already exists"
        );
        assert_eq!(count_rows(&svc, "tags").await, 1);
    }

    #[tokio::test]
    async fn uniqueness_is_case_sensitive() {
        let svc = test_service().await;
        make_tag(&svc, "priority", "high").await;
        svc.create_tag(NewTag::new("priority", "High")).await.unwrap();
        svc.create_tag(NewTag::new("Priority", "high")).await.unwrap();
        assert_eq!(count_rows(&svc, "tags").await, 3);
    }

    #[tokio::test]
    async fn empty_description_is_stored_as_null() {
        let svc = test_service().await;
        let tag = svc
            .create_tag(NewTag::new("os", "linux").with_description(""))
            .await
            .unwrap();
        assert_eq!(tag.description, None);
    }

    #[tokio::test]
    async fn update_checks_duplicates_excluding_self() {
        let svc = test_service().await;
        let a = make_tag(&svc, "os", "linux").await;
        make_tag(&svc, "os", "macos").await;

        let same = svc
            .update_tag(a.id, TagUpdateBuilder::new().value("linux").build())
            .await
            .unwrap();
        assert_eq!(same.value, "linux");

        let err = svc
            .update_tag(a.id, TagUpdateBuilder::new().value("macos").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));

        let updated = svc
            .update_tag(
                a.id,
                TagUpdateBuilder::new()
                    .value("windows")
                    .is_predefined(false)
                    .description(Some("Windows".into()))
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.value, "windows");
        assert!(!updated.is_predefined);
        assert!(updated.updated_at >= a.updated_at);
    }

    #[tokio::test]
    async fn update_missing_tag_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .update_tag(404, TagUpdateBuilder::new().value("x").build())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_cascades_to_associations() {
        let svc = test_service().await;
        let tag = make_tag(&svc, "os", "linux").await;
        let tc = make_testcase(&svc, "Boots", &[tag.id]).await;
        assert_eq!(tc.tags.len(), 1);

        svc.delete_tag(tag.id).await.unwrap();
        assert_eq!(count_rows(&svc, "testcase_tags").await, 0);
        assert!(svc.get_tag(tag.id).await.unwrap_err().is_not_found());
        assert!(svc.get_testcase(tc.id).await.unwrap().tags.is_empty());

        assert!(svc.delete_tag(tag.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_filters_orders_and_paginates() {
        let svc = test_service().await;
        make_tag(&svc, "priority", "low").await;
        make_tag(&svc, "os", "windows").await;
        make_tag(&svc, "os", "linux").await;
        make_tag(&svc, "priority", "high").await;

        let all = svc
            .list_tags(&TagFilter::default(), Window::default())
            .await
            .unwrap();
        assert_eq!(all.total, 4);
        let labels: Vec<String> = all.items.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec!["os:linux", "os:windows", "priority:high", "priority:low"]
        );

        let filter = TagFilter {
            category: Some("priority".into()),
        };
        let page = svc
            .list_tags(&filter, Window { skip: 1, limit: 1 })
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].value, "low");
    }

    #[tokio::test]
    async fn categories_are_distinct_and_sorted() {
        let svc = test_service().await;
        make_tag(&svc, "priority", "low").await;
        make_tag(&svc, "browser", "chrome").await;
        make_tag(&svc, "priority", "high").await;
        assert_eq!(
            svc.tag_categories().await.unwrap(),
            vec!["browser".to_string(), "priority".to_string()]
        );
    }

    #[tokio::test]
    async fn delete_all_clears_table() {
        let svc = test_service().await;
        make_tag(&svc, "a", "1").await;
        make_tag(&svc, "a", "2").await;
        assert_eq!(svc.delete_all_tags().await.unwrap(), 2);
        assert_eq!(svc.count_tags().await.unwrap(), 0);
    }
}
