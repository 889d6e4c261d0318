//! Server-rendered HTML pages.
//!
//! Forms post back to the page routes and redirect with a `success` or
//! `error` query message. Validation failures re-render the form with the
//! submitted values.

mod dashboard;
mod error;
mod form;
mod login;
mod projects;
mod render;
mod search;
mod tags;
mod testcases;

use axum::Router;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/login", get(login::login_form))
        .route("/api/auth/login", post(login::login))
        .route("/api/auth/logout", get(login::logout))
        .route("/search", get(search::search))
        .route("/testcases", get(testcases::list))
        .route(
            "/testcases/new",
            get(testcases::new_form).post(testcases::create),
        )
        .route("/testcases/{id}", get(testcases::view))
        .route(
            "/testcases/{id}/edit",
            get(testcases::edit_form).post(testcases::update),
        )
        .route("/testcases/{id}/delete", post(testcases::delete))
        .route("/projects", get(projects::list))
        .route(
            "/projects/new",
            get(projects::new_form).post(projects::create),
        )
        .route("/projects/{id}", get(projects::view))
        .route(
            "/projects/{id}/edit",
            get(projects::edit_form).post(projects::update),
        )
        .route("/projects/{id}/delete", post(projects::delete))
        .route("/projects/{id}/testcases", post(projects::add_testcases))
        .route(
            "/projects/{id}/testcases/{testcase_id}/remove",
            post(projects::remove_testcase),
        )
        .route("/tags", get(tags::list))
        .route("/tags/new", get(tags::new_form).post(tags::create))
        .route("/tags/{id}/edit", get(tags::edit_form).post(tags::update))
        .route("/tags/{id}/delete", post(tags::delete))
}

/// `success` / `error` messages carried through a redirect.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Flash {
    #[serde(default)]
    success: String,
    #[serde(default)]
    error: String,
}

impl Flash {
    fn render(&self) -> String {
        render::messages(&self.success, &self.error)
    }
}

fn page(state: &AppState, title: &str, content: &str) -> Html<String> {
    render::layout(&state.config.app.name, title, content)
}

/// 303 to `path` with one percent-encoded query message.
fn redirect_with(path: &str, key: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?{key}={}", urlencoding::encode(message))).into_response()
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn optional_text(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => render::escape(text),
        _ => r#"<span class="muted">Not provided</span>"#.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::http::header::LOCATION;
    use pretty_assertions::assert_eq;

    #[test]
    fn redirect_encodes_message() {
        let response = redirect_with("/tags", "success", "Tag created successfully");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/tags?success=Tag%20created%20successfully"
        );
    }

    #[test]
    fn optional_text_escapes_or_placeholders() {
        assert_eq!(optional_text(Some("a<b")), "a&lt;b");
        assert!(optional_text(None).contains("Not provided"));
        assert!(optional_text(Some("")).contains("Not provided"));
    }
}
