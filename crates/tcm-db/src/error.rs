//! Database error types for tcm-db.

use tcm_core::enums::EntityType;
use tcm_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Not-found and validation failures raised by the repositories.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A uniqueness rule would be broken (tag `(category, value)`, project name).
    #[error("{0}")]
    Duplicate(String),

    /// Some referenced ids do not exist. Ids are sorted ascending.
    #[error("{} with IDs {ids:?} not found", entity.plural_label())]
    MissingIds { entity: EntityType, ids: Vec<i64> },

    /// The association being created already exists.
    #[error("{0}")]
    AlreadyAssociated(String),

    /// The association being removed does not exist.
    #[error("{0}")]
    NotAssociated(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    #[must_use]
    pub const fn not_found(entity_type: EntityType, id: i64) -> Self {
        Self::Core(CoreError::not_found(entity_type, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::validation(msg))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Core(CoreError::NotFound { .. }))
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Core(CoreError::Validation(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ids_lists_ids() {
        let err = DatabaseError::MissingIds {
            entity: EntityType::TestCase,
            ids: vec![4, 99999],
        };
        assert_eq!(err.to_string(), "Test cases with IDs [4, 99999] not found");
    }

    #[test]
    fn not_found_is_transparent() {
        let err = DatabaseError::not_found(EntityType::Project, 5);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Project with id 5 not found");
    }
}
