//! The `session` cookie.
//!
//! The value is `user_<username>`, unsigned and unencrypted. Anyone can forge
//! it; the server warns about this at startup.

use crate::error::AuthError;

pub const SESSION_COOKIE: &str = "session";
const USER_PREFIX: &str = "user_";

/// A session for one user, rendered as a `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    username: String,
    max_age: u64,
}

impl SessionCookie {
    /// # Errors
    ///
    /// Returns `AuthError::UnsafeUsername` if the username contains characters
    /// that are not allowed in a cookie value.
    pub fn new(username: &str, max_age: u64) -> Result<Self, AuthError> {
        if username.is_empty() || !username.chars().all(is_cookie_octet) {
            return Err(AuthError::UnsafeUsername(username.to_string()));
        }
        Ok(Self {
            username: username.to_string(),
            max_age,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn header_value(&self) -> String {
        format!(
            "{SESSION_COOKIE}={USER_PREFIX}{}; HttpOnly; SameSite=Lax; Max-Age={}; Path=/",
            self.username, self.max_age
        )
    }
}

/// `Set-Cookie` value that expires the session immediately.
#[must_use]
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Max-Age=0; Path=/")
}

/// Username from a `Cookie` request header, if it carries a session.
#[must_use]
pub fn username_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.strip_prefix(USER_PREFIX))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// RFC 6265 `cookie-octet`: printable ASCII minus space, `"`, `,`, `;` and `\`.
const fn is_cookie_octet(c: char) -> bool {
    matches!(c, '\x21' | '\x23'..='\x2B' | '\x2D'..='\x3A' | '\x3C'..='\x5B' | '\x5D'..='\x7E')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn header_value_has_all_attributes() {
        let cookie = SessionCookie::new("admin", 3600).unwrap();
        assert_eq!(
            cookie.header_value(),
            "session=user_admin; HttpOnly; SameSite=Lax; Max-Age=3600; Path=/"
        );
    }

    #[rstest]
    #[case("")]
    #[case("two words")]
    #[case("semi;colon")]
    #[case("line\nbreak")]
    fn rejects_unsafe_usernames(#[case] username: &str) {
        assert!(SessionCookie::new(username, 60).is_err());
    }

    #[rstest]
    #[case("session=user_admin", Some("admin"))]
    #[case("theme=dark; session=user_qa.lead", Some("qa.lead"))]
    #[case("session=admin", None)]
    #[case("session=user_", None)]
    #[case("other=user_admin", None)]
    #[case("", None)]
    fn parses_cookie_header(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(username_from_cookie_header(header).as_deref(), expected);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_cookie().starts_with("session=;"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }
}
