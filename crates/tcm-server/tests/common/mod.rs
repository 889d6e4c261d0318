//! In-process app on an in-memory database, driven with `oneshot`.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, header};
use axum::response::Response;
use serde_json::Value;
use tcm_auth::InMemoryCredentialStore;
use tcm_config::TcmConfig;
use tcm_db::service::TcmService;
use tcm_server::{AppState, build_router};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub service: Arc<TcmService>,
}

pub async fn test_app() -> TestApp {
    let users = BTreeMap::from([("admin".to_string(), "admin123".to_string())]);
    let mut config = TcmConfig::default();
    config.database.url = ":memory:".to_string();
    config.auth.users = users.clone();
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../static").to_string();

    let service = TcmService::new_local(":memory:").await.unwrap();
    let state = AppState::new(service, config, Arc::new(InMemoryCredentialStore::new(users)));
    let service = Arc::clone(&state.service);
    TestApp {
        router: build_router(state),
        service,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn json(&self, method: Method, uri: &str, body: &Value) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.json(Method::POST, uri, body).await
    }

    /// POST an urlencoded form. `body` must already be encoded.
    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}
