//! # tcm-auth
//!
//! Placeholder login for TCM.
//!
//! Credentials are checked through the [`CredentialStore`] trait; the shipped
//! [`InMemoryCredentialStore`] reads the `auth.users` map from configuration.
//! A successful login sets an unsigned `session=user_<name>` cookie
//! ([`SessionCookie`]). Failed attempts are logged with a sanitised username.

pub mod audit;
pub mod credentials;
pub mod error;
pub mod session;

pub use audit::{LoginAttempt, log_failed_login, sanitize_log_field};
pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use error::{AuthError, FailureReason};
pub use session::{SessionCookie, clear_cookie, username_from_cookie_header};
