//! HTML error pages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tcm_core::enums::EntityType;
use tcm_core::errors::CoreError;
use tcm_db::error::DatabaseError;

use super::render::{escape, layout};

const BRAND: &str = "Test Case Management";

#[derive(Debug)]
pub enum PageError {
    NotFound(EntityType),
    Internal(DatabaseError),
}

pub type PageResult<T = Response> = Result<T, PageError>;

impl From<DatabaseError> for PageError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Core(CoreError::NotFound { entity_type, .. }) => {
                Self::NotFound(entity_type)
            }
            other => Self::Internal(other),
        }
    }
}

/// Split a failed write into a message for the re-rendered form or a page error.
pub fn form_message(err: DatabaseError) -> Result<String, PageError> {
    match err {
        DatabaseError::Core(CoreError::Validation(msg)) => Ok(msg),
        DatabaseError::Duplicate(msg)
        | DatabaseError::AlreadyAssociated(msg)
        | DatabaseError::NotAssociated(msg) => Ok(msg),
        err @ DatabaseError::MissingIds { .. } => Ok(err.to_string()),
        other => Err(PageError::from(other)),
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(entity) => {
                let content = format!(
                    r#"<section class="error-page"><h2>{label} not found</h2><p>The requested {lower} does not exist.</p><p><a class="btn" href="{path}">Back to {plural}</a></p></section>"#,
                    label = entity.label(),
                    lower = entity.label().to_lowercase(),
                    path = entity.page_path(),
                    plural = escape(entity.plural_label()),
                );
                (StatusCode::NOT_FOUND, layout(BRAND, "Not Found", &content)).into_response()
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "page request failed");
                let content = r#"<section class="error-page"><h2>Something went wrong</h2><p>The request could not be completed.</p><p><a class="btn" href="/dashboard">Back to dashboard</a></p></section>"#;
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    layout(BRAND, "Error", content),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = PageError::from(DatabaseError::not_found(EntityType::Project, 4));
        assert!(matches!(err, PageError::NotFound(EntityType::Project)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_errors_become_form_messages() {
        let msg = form_message(DatabaseError::Duplicate("taken".into())).unwrap();
        assert_eq!(msg, "taken");
        let msg = form_message(DatabaseError::MissingIds {
            entity: EntityType::Tag,
            ids: vec![3],
        })
        .unwrap();
        assert_eq!(msg, "Tags with IDs [3] not found");
        assert!(form_message(DatabaseError::NoResult).is_err());
    }

    #[test]
    fn other_errors_map_to_500() {
        let err = PageError::from(DatabaseError::NoResult);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
