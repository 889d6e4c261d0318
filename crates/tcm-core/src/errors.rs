//! Cross-cutting error types for TCM.
//!
//! Storage-specific errors (`DatabaseError`) and configuration errors
//! (`ConfigError`) live in their own crates. The HTTP layer maps all of them
//! onto status codes in `tcm-server`.

use thiserror::Error;

use crate::enums::EntityType;

/// Errors that can be raised by any TCM crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("{} with id {id} not found", entity_type.label())]
    NotFound { entity_type: EntityType, id: i64 },

    /// Input failed validation (required field, length, enum value, date).
    #[error("{0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub const fn not_found(entity_type: EntityType, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
