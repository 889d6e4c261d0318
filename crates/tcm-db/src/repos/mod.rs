//! Repository modules implementing the operations on each entity.
//!
//! Each module adds methods to `TcmService` via `impl TcmService` blocks.
//! Row readers take a `&libsql::Connection` so they work both on the shared
//! connection and inside a `libsql::Transaction`.

pub mod dashboard;
pub mod project;
pub mod search;
pub mod tag;
pub mod testcase;

use std::collections::HashSet;

use crate::error::DatabaseError;
use crate::helpers::{fold, placeholders};

/// A table and the text columns mirrored into lowercase `<column>_folded`
/// shadows for case-insensitive search.
pub(crate) type FoldedColumns = (&'static str, &'static [&'static str]);

pub(crate) const TESTCASE_FOLDED: FoldedColumns =
    ("testcases", &["title", "description", "steps"]);
pub(crate) const PROJECT_FOLDED: FoldedColumns = ("projects", &["name", "description"]);
pub(crate) const TAG_FOLDED: FoldedColumns = ("tags", &["category", "value", "description"]);

pub(crate) const FOLDED_TABLES: [FoldedColumns; 3] = [TESTCASE_FOLDED, PROJECT_FOLDED, TAG_FOLDED];

/// Recompute the folded shadows of one row, or of every row when `id` is
/// `None`. Called after each insert or update of a searchable table.
pub(crate) async fn refresh_folded(
    conn: &libsql::Connection,
    (table, columns): FoldedColumns,
    id: Option<i64>,
) -> Result<(), DatabaseError> {
    let mut sql = format!("SELECT id, {} FROM {table}", columns.join(", "));
    if id.is_some() {
        sql.push_str(" WHERE id = ?1");
    }
    let params: Vec<libsql::Value> = id.into_iter().map(Into::into).collect();
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;

    let mut pending = Vec::new();
    while let Some(row) = rows.next().await? {
        let mut values: Vec<libsql::Value> = Vec::with_capacity(columns.len() + 1);
        for (idx, _) in (1_i32..).zip(columns.iter()) {
            let text = row.get::<Option<String>>(idx)?;
            values.push(text.map(|t| fold(&t)).into());
        }
        values.push(row.get::<i64>(0)?.into());
        pending.push(values);
    }

    let sets: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column}_folded = ?{}", i + 1))
        .collect();
    let update = format!(
        "UPDATE {table} SET {} WHERE id = ?{}",
        sets.join(", "),
        columns.len() + 1
    );
    for values in pending {
        conn.execute(&update, libsql::params_from_iter(values)).await?;
    }
    Ok(())
}

/// Ids from `ids` that have no row in `table`, sorted ascending.
pub(crate) async fn missing_ids(
    conn: &libsql::Connection,
    table: &str,
    ids: &[i64],
) -> Result<Vec<i64>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id FROM {table} WHERE id IN ({})",
        placeholders(1, ids.len())
    );
    let params: Vec<libsql::Value> = ids.iter().map(|id| (*id).into()).collect();
    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;

    let mut found = HashSet::new();
    while let Some(row) = rows.next().await? {
        found.insert(row.get::<i64>(0)?);
    }
    let mut missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    missing.sort_unstable();
    missing.dedup();
    Ok(missing)
}

/// Run a `SELECT COUNT(*)` query.
pub(crate) async fn count(
    conn: &libsql::Connection,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<u64, DatabaseError> {
    let mut rows = conn.query(sql, libsql::params_from_iter(params)).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    crate::helpers::get_count(&row, 0)
}

/// `WHERE a AND b ...`, or nothing when there are no conditions.
pub(crate) fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}
