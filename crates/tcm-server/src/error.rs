//! JSON API errors.
//!
//! Every failure renders as `{"detail": "<message>"}` with a status derived
//! from the underlying error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tcm_core::errors::CoreError;
use tcm_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed body, query string or path parameter.
    #[error("{0}")]
    Unprocessable(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

const fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Core(err) | Self::Database(DatabaseError::Core(err)) => core_status(err),
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(
                DatabaseError::Duplicate(_)
                | DatabaseError::MissingIds { .. }
                | DatabaseError::AlreadyAssociated(_),
            ) => StatusCode::BAD_REQUEST,
            Self::Database(DatabaseError::NotAssociated(_)) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tcm_core::enums::EntityType;

    #[rstest]
    #[case(DatabaseError::not_found(EntityType::Tag, 1), StatusCode::NOT_FOUND)]
    #[case(DatabaseError::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(DatabaseError::Duplicate("dup".into()), StatusCode::BAD_REQUEST)]
    #[case(
        DatabaseError::MissingIds { entity: EntityType::TestCase, ids: vec![9] },
        StatusCode::BAD_REQUEST
    )]
    #[case(DatabaseError::AlreadyAssociated("x".into()), StatusCode::BAD_REQUEST)]
    #[case(DatabaseError::NotAssociated("x".into()), StatusCode::NOT_FOUND)]
    #[case(DatabaseError::NoResult, StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_database_errors(#[case] err: DatabaseError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(err).status(), expected);
    }

    #[test]
    fn rejections_are_unprocessable() {
        let err = ApiError::Unprocessable("missing field `title`".into());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
