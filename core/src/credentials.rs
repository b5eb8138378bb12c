//! Session identity attached to outbound requests.

use std::fmt;

use crate::error::ApiError;

#[derive(Clone, PartialEq, Eq)]
struct Session {
    login: String,
    cookie: String,
    csrf_token: String,
}

/// Login, session cookie and CSRF token for one authenticated session.
///
/// Immutable once built and shared read-only by every request the session
/// issues. The anonymous context carries nothing and makes the request builder
/// omit all auth headers, which is enough for public profile and board pages.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CredentialContext {
    session: Option<Session>,
}

impl CredentialContext {
    /// Builds an authenticated context. Every part must be non-empty.
    pub fn new(login: &str, cookie: &str, csrf_token: &str) -> Result<Self, ApiError> {
        for (name, value) in [("login", login), ("cookie", cookie), ("csrf token", csrf_token)] {
            if value.trim().is_empty() {
                return Err(ApiError::config(format!("{name} must not be empty")));
            }
        }
        Ok(Self {
            session: Some(Session {
                login: login.to_string(),
                cookie: cookie.to_string(),
                csrf_token: csrf_token.to_string(),
            }),
        })
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn login(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.login.as_str())
    }

    pub fn cookie(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.cookie.as_str())
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.csrf_token.as_str())
    }

    /// Login of an authenticated session, or a configuration error naming
    /// the operation that needed one.
    pub(crate) fn require_login(&self, operation: &str) -> Result<&str, ApiError> {
        self.login()
            .ok_or_else(|| ApiError::config(format!("{operation} requires an authenticated session")))
    }
}

impl fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.session {
            Some(session) => f
                .debug_struct("CredentialContext")
                .field("login", &session.login)
                .field("cookie", &"<redacted>")
                .field("csrf_token", &"<redacted>")
                .finish(),
            None => f.write_str("CredentialContext(anonymous)"),
        }
    }
}
