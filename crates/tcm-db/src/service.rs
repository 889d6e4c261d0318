//! Service layer wrapping the database handle.
//!
//! `TcmService` owns a `TcmDb`. All repository methods are implemented as
//! `impl TcmService` blocks under `repos/`.

use crate::TcmDb;
use crate::error::DatabaseError;

/// Repository facade shared by the HTTP handlers and the CLI.
pub struct TcmService {
    db: TcmDb,
}

impl TcmService {
    /// Create a service backed by a local file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(TcmDb::open_local(db_path).await?))
    }

    /// Create a service backed by a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn new_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(TcmDb::open_remote(url, auth_token).await?))
    }

    #[must_use]
    pub const fn from_db(db: TcmDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TcmDb {
        &self.db
    }
}

/// One page of a filtered list plus the filtered total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}
