//! JSON API under `/api`, plus the root and health endpoints.

mod projects;
mod root;
mod search;
mod tags;
mod testcases;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root::index))
        .route("/health", get(root::health))
        .route("/api/tags", get(tags::list).post(tags::create))
        .route("/api/tags/categories", get(tags::categories))
        .route(
            "/api/tags/{id}",
            get(tags::get).patch(tags::update).delete(tags::delete),
        )
        .route("/api/testcases", get(testcases::list).post(testcases::create))
        .route(
            "/api/testcases/{id}",
            get(testcases::get)
                .patch(testcases::update)
                .delete(testcases::delete),
        )
        .route(
            "/api/testcases/{id}/tags/{tag_id}",
            post(testcases::add_tag).delete(testcases::remove_tag),
        )
        .route("/api/testcases/{id}/projects", get(testcases::projects))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get)
                .patch(projects::update)
                .delete(projects::delete),
        )
        .route("/api/projects/{id}/testcases", get(projects::testcases))
        .route(
            "/api/projects/{id}/testcases/{testcase_id}",
            post(projects::add_testcase).delete(projects::remove_testcase),
        )
        .route("/api/search", get(search::search))
}
