//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. `001` uses `IF NOT EXISTS` throughout and re-runs safely;
//! later migrations are gated on `PRAGMA user_version`.

use crate::TcmDb;
use crate::error::DatabaseError;
use crate::repos::{FOLDED_TABLES, refresh_folded};

/// Initial schema: 5 tables, 8 indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

/// Folded search columns, backfilled from existing rows.
const MIGRATION_002: &str = include_str!("../migrations/002_folded_search.sql");

/// `user_version` once every migration has been applied.
pub(crate) const SCHEMA_VERSION: i64 = 2;

impl TcmDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;

        if self.user_version().await? < SCHEMA_VERSION {
            self.apply_folded_search()
                .await
                .map_err(|e| DatabaseError::Migration(format!("002_folded_search: {e}")))?;
            tracing::info!(version = SCHEMA_VERSION, "applied folded search migration");
        }
        Ok(())
    }

    async fn apply_folded_search(&self) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction().await?;
        let result = async {
            tx.execute_batch(MIGRATION_002).await?;
            for table in FOLDED_TABLES {
                refresh_folded(&tx, table, None).await?;
            }
            tx.execute(&format!("PRAGMA user_version = {SCHEMA_VERSION}"), ())
                .await?;
            Ok::<(), DatabaseError>(())
        }
        .await;
        Self::finish(tx, result).await
    }

    pub(crate) async fn user_version(&self) -> Result<i64, DatabaseError> {
        let mut rows = self.conn.query("PRAGMA user_version", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
