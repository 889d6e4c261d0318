//! Placeholder login.
//!
//! The session cookie is `user_<name>` in plain text. Nothing checks it on
//! later requests; it only drives the redirect away from `/login`.

use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tcm_auth::{LoginAttempt, SessionCookie, clear_cookie, log_failed_login, username_from_cookie_header};

use super::render::{escape, messages};
use crate::extract::ClientInfo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Standalone page; the main layout's navigation makes no sense here.
fn login_page(brand: &str, username: &str, error: &str) -> Html<String> {
    let brand = escape(brand);
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sign In - {brand}</title>
<link rel="stylesheet" href="/static/css/styles.css">
</head>
<body class="login-body">
<main class="login-card">
<h1>{brand}</h1>
<h2>Sign In</h2>
{error}
<form method="post" action="/api/auth/login" class="entity-form">
<div class="form-group"><label for="username">Username</label><input type="text" name="username" id="username" value="{username}" required autofocus></div>
<div class="form-group"><label for="password">Password</label><input type="password" name="password" id="password" required></div>
<button type="submit" class="btn btn-primary">Sign In</button>
</form>
</main>
</body>
</html>"#,
        error = messages("", error),
        username = escape(username),
    ))
}

pub async fn login_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let signed_in = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(username_from_cookie_header)
        .is_some();
    if signed_in {
        return Redirect::to("/dashboard").into_response();
    }
    login_page(&state.config.app.name, "", "").into_response()
}

pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(err) = state.credentials.authenticate(&form.username, &form.password) {
        if state.config.auth.log_failed_logins {
            if let Some(reason) = err.failure_reason() {
                let attempt = LoginAttempt {
                    username: &form.username,
                    ip: &client.ip,
                    user_agent: &client.user_agent,
                };
                log_failed_login(&attempt, reason);
            }
        }
        return login_page(&state.config.app.name, &form.username, &err.to_string())
            .into_response();
    }

    let cookie = match SessionCookie::new(&form.username, state.config.auth.session_timeout) {
        Ok(cookie) => cookie,
        Err(err) => {
            tracing::warn!(error = %err, "cannot issue session cookie");
            return login_page(
                &state.config.app.name,
                "",
                "Invalid username or password",
            )
            .into_response();
        }
    };
    tracing::info!(username = cookie.username(), ip = %client.ip, "successful login");
    (
        [(SET_COOKIE, cookie.header_value())],
        Redirect::to("/dashboard"),
    )
        .into_response()
}

pub async fn logout() -> Response {
    ([(SET_COOKIE, clear_cookie())], Redirect::to("/login")).into_response()
}
