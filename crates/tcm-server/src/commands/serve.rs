use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tcm_auth::InMemoryCredentialStore;
use tcm_config::TcmConfig;
use tcm_server::{AppState, build_router, open_service};

use crate::cli::ServeArgs;

/// Handle `tcm serve`.
pub async fn handle(args: &ServeArgs, mut config: TcmConfig) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("invalid server settings")?;
    warn_insecure(&config);

    let service = open_service(&config.database.target())
        .await
        .context("failed to open database")?;
    let credentials = InMemoryCredentialStore::from_config(&config.auth);
    if credentials.is_empty() {
        tracing::warn!("auth.users is empty; nobody can sign in");
    }

    let addr = config.server.bind_addr();
    let state = AppState::new(service, config, Arc::new(credentials));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn warn_insecure(config: &TcmConfig) {
    if config.auth.uses_default_secrets() {
        tracing::warn!("auth.secret_key or auth.session_secret still has its placeholder value");
    }
    tracing::warn!(
        "session cookies are unsigned; the login is a placeholder and must not guard real data"
    );
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
