//! Credential verification.
//!
//! The server only talks to [`CredentialStore`]; swapping the in-memory map
//! for a real identity provider means implementing this trait.

use std::collections::BTreeMap;

use tcm_config::AuthConfig;

use crate::error::{AuthError, FailureReason};

/// Checks a username and password.
pub trait CredentialStore: Send + Sync + 'static {
    /// Succeeds when the pair is valid. The error carries the rejection reason.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown user or a wrong password.
    fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError>;

    fn verify(&self, username: &str, password: &str) -> bool {
        self.authenticate(username, password).is_ok()
    }
}

/// Plaintext username-to-password map, loaded from `auth.users`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: BTreeMap<String, String>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub const fn new(users: BTreeMap<String, String>) -> Self {
        Self { users }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.users.clone())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.users.get(username) {
            None => Err(AuthError::InvalidCredentials(FailureReason::InvalidUsername)),
            Some(expected) if expected != password => {
                Err(AuthError::InvalidCredentials(FailureReason::InvalidPassword))
            }
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryCredentialStore {
        InMemoryCredentialStore::new(BTreeMap::from([
            ("admin".to_string(), "admin123".to_string()),
            ("tester".to_string(), "test123".to_string()),
        ]))
    }

    #[test]
    fn accepts_known_pair() {
        assert!(store().verify("admin", "admin123"));
        assert!(store().authenticate("tester", "test123").is_ok());
    }

    #[test]
    fn reports_reason() {
        let err = store().authenticate("nobody", "x").unwrap_err();
        assert_eq!(err.failure_reason(), Some(FailureReason::InvalidUsername));
        assert_eq!(err.to_string(), "Invalid username or password");

        let err = store().authenticate("admin", "wrong").unwrap_err();
        assert_eq!(err.failure_reason(), Some(FailureReason::InvalidPassword));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        assert!(!store().verify("Admin", "admin123"));
    }

    #[test]
    fn from_config_copies_users() {
        let mut config = AuthConfig::default();
        assert!(InMemoryCredentialStore::from_config(&config).is_empty());
        config.users.insert("qa".into(), "pw".into());
        let store = InMemoryCredentialStore::from_config(&config);
        assert_eq!(store.len(), 1);
        assert!(store.verify("qa", "pw"));
    }
}
