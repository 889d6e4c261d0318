//! # tcm-server
//!
//! HTTP surface of TCM: the JSON API under `/api`, the server-rendered
//! pages, the placeholder login and static assets under `/static`.
//!
//! [`build_router`] assembles everything around an [`AppState`]; the `tcm`
//! binary wraps it with configuration loading and the CLI.

mod api;
pub mod error;
pub mod extract;
mod pages;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, open_service};

/// Every route, with request tracing and static file serving.
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);
    Router::new()
        .merge(api::routes())
        .merge(pages::routes())
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
