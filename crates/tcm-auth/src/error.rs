use thiserror::Error;

/// Why a login attempt was rejected. Only ever logged, never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidUsername,
    InvalidPassword,
}

impl FailureReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUsername => "invalid_username",
            Self::InvalidPassword => "invalid_password",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The message is the same for both reasons so it does not reveal which
    /// usernames exist.
    #[error("Invalid username or password")]
    InvalidCredentials(FailureReason),

    #[error("username cannot be stored in a session cookie: {0:?}")]
    UnsafeUsername(String),
}

impl AuthError {
    #[must_use]
    pub const fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::InvalidCredentials(reason) => Some(*reason),
            Self::UnsafeUsername(_) => None,
        }
    }
}
