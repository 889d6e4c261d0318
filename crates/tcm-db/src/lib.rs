//! # tcm-db
//!
//! libSQL storage for TCM: the database handle, embedded migrations, the
//! `TcmService` repository layer, update builders and predefined-tag seeding.
//!
//! One connection is shared by the whole service, guarded by an async
//! read/write lock. Each mutation holds the write side for the whole of its
//! transaction, so a failed multi-step write (for example a test case whose
//! tag ids do not all resolve) leaves nothing behind, and readers never see
//! a transaction that has not committed.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod seed;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::ops::Deref;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Central database handle.
pub struct TcmDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    lock: RwLock<()>,
}

/// The shared connection, borrowed for reading.
///
/// Writers wait until every `ReadConn` is dropped. Take one per public read
/// operation and pass `&conn` down; taking a second while holding the first
/// can deadlock behind a queued writer.
pub struct ReadConn<'a> {
    _guard: RwLockReadGuard<'a, ()>,
    conn: &'a libsql::Connection,
}

impl Deref for ReadConn<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

impl TcmDb {
    /// Open a local database file, or an in-memory one for `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        tracing::debug!(path, "opened local database");
        Self::init(db).await
    }

    /// Open a remote libSQL database over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        tracing::debug!(url, "opened remote database");
        Self::init(db).await
    }

    async fn init(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let tcm_db = Self {
            db,
            conn,
            lock: RwLock::new(()),
        };
        tcm_db.run_migrations().await?;
        Ok(tcm_db)
    }

    /// Borrow the connection for queries outside any write transaction.
    pub async fn read(&self) -> ReadConn<'_> {
        ReadConn {
            _guard: self.lock.read().await,
            conn: &self.conn,
        }
    }

    /// Take the write lock and open a transaction.
    ///
    /// Hold the returned guard until the transaction is passed to [`Self::finish`].
    pub(crate) async fn begin(
        &self,
    ) -> Result<(RwLockWriteGuard<'_, ()>, libsql::Transaction), DatabaseError> {
        let guard = self.lock.write().await;
        let tx = self.conn.transaction().await?;
        Ok((guard, tx))
    }

    /// Commit on `Ok`, roll back on `Err`.
    pub(crate) async fn finish<T>(
        tx: libsql::Transaction,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn test_db() -> TcmDb {
        TcmDb::open_local(":memory:").await.unwrap()
    }

    async fn tag_count(db: &TcmDb) -> i64 {
        let conn = db.read().await;
        let mut rows = conn.query("SELECT COUNT(*) FROM tags", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        row.get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "tags",
            "testcases",
            "projects",
            "testcase_tags",
            "project_testcases",
        ];
        for table in &tables {
            let mut rows = db
                .read()
                .await
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn foreign_keys_are_enabled() {
        let db = test_db().await;
        let mut rows = db.read().await.query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_rows() {
        let db = test_db().await;
        let (guard, tx) = db.begin().await.unwrap();
        tx.execute(
            "INSERT INTO tags (category, value, created_at, updated_at) VALUES ('a', 'b', 'x', 'x')",
            (),
        )
        .await
        .unwrap();
        let result: Result<(), DatabaseError> = Err(DatabaseError::NoResult);
        assert!(TcmDb::finish(tx, result).await.is_err());
        drop(guard);

        assert_eq!(tag_count(&db).await, 0);
    }

    #[tokio::test]
    async fn readers_wait_for_open_transaction() {
        let db = test_db().await;
        let (guard, tx) = db.begin().await.unwrap();
        tx.execute(
            "INSERT INTO tags (category, value, created_at, updated_at) VALUES ('a', 'b', 'x', 'x')",
            (),
        )
        .await
        .unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(50), db.read()).await;
        assert!(blocked.is_err(), "read must not start while a write is open");

        let result: Result<(), DatabaseError> = Err(DatabaseError::NoResult);
        assert!(TcmDb::finish(tx, result).await.is_err());
        drop(guard);
        assert_eq!(tag_count(&db).await, 0);
    }

    #[tokio::test]
    async fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcm.db");
        let path = path.to_str().unwrap();
        {
            let db = TcmDb::open_local(path).await.unwrap();
            db.read()
                .await
                .execute(
                    "INSERT INTO tags (category, value, created_at, updated_at) VALUES ('os', 'linux', 'x', 'x')",
                    (),
                )
                .await
                .unwrap();
        }
        let db = TcmDb::open_local(path).await.unwrap();
        assert_eq!(tag_count(&db).await, 1);
    }
}
