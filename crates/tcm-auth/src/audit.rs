//! Failed-login logging.

use crate::error::FailureReason;

/// Longest client-supplied value kept in a log line.
pub const MAX_LOGGED_FIELD: usize = 100;

/// Strip CR and LF so a client-supplied value cannot forge extra log lines,
/// then cap its length. Applied to the username and the user agent.
#[must_use]
pub fn sanitize_log_field(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\r' | '\n'))
        .take(MAX_LOGGED_FIELD)
        .collect()
}

/// Request details recorded with a failed login.
#[derive(Debug, Clone, Copy)]
pub struct LoginAttempt<'a> {
    pub username: &'a str,
    pub ip: &'a str,
    pub user_agent: &'a str,
}

pub fn log_failed_login(attempt: &LoginAttempt<'_>, reason: FailureReason) {
    tracing::warn!(
        username = %sanitize_log_field(attempt.username),
        ip = attempt.ip,
        reason = reason.as_str(),
        user_agent = %sanitize_log_field(attempt.user_agent),
        "failed login attempt"
    );
}
