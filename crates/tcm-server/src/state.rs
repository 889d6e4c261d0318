//! Shared handler state.

use std::sync::Arc;

use tcm_auth::CredentialStore;
use tcm_config::{DatabaseTarget, TcmConfig};
use tcm_db::error::DatabaseError;
use tcm_db::service::TcmService;

/// Cloned into every handler by axum.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TcmService>,
    pub config: Arc<TcmConfig>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        service: TcmService,
        config: TcmConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
            credentials,
        }
    }
}

/// Open a `TcmService` for a resolved database target.
///
/// # Errors
///
/// Returns `DatabaseError` if the database cannot be opened or migrated.
pub async fn open_service(target: &DatabaseTarget) -> Result<TcmService, DatabaseError> {
    match target {
        DatabaseTarget::Memory => TcmService::new_local(":memory:").await,
        DatabaseTarget::Local(path) => TcmService::new_local(&path.to_string_lossy()).await,
        DatabaseTarget::Remote { url, auth_token } => TcmService::new_remote(url, auth_token).await,
    }
}
