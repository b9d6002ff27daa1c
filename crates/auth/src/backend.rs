//! Session backend
//!
//! Owns the session configuration and turns tokens into cookies and back.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};

use crate::claims::SessionToken;
use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::jwt::{sign_session_jwt, validate_session_jwt};

/// Session backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for SessionBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.sessions.clone()
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SessionBackend {
    config: SessionConfig,
}

impl SessionBackend {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Default session lifetime when upstream reports none
    pub fn max_age(&self) -> chrono::Duration {
        self.config.max_age
    }

    pub fn encode(&self, token: &SessionToken, now: DateTime<Utc>) -> Result<String, AuthError> {
        sign_session_jwt(token, &self.config.secret, now)
    }

    /// Decode a cookie value; expired or tampered tokens are rejected
    pub fn decode(&self, raw: &str) -> Result<SessionToken, AuthError> {
        validate_session_jwt(raw, &self.config.secret)
    }

    /// Build the session cookie for a token, living as long as the token does
    pub fn session_cookie(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Cookie<'static>, AuthError> {
        let value = self.encode(token, now)?;
        let remaining = (token.expires - now.timestamp()).max(0);

        Ok(Cookie::build((self.config.cookie_name.clone(), value))
            .http_only(true)
            .secure(self.config.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(remaining))
            .build())
    }

    /// Removal cookie for sign-out
    pub fn clear_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), ""))
            .path("/")
            .max_age(time::Duration::ZERO)
            .build()
    }

    /// Read and validate the session from a cookie jar.
    ///
    /// An absent, tampered, or expired cookie yields `None`.
    pub fn read(&self, jar: &CookieJar) -> Option<SessionToken> {
        let cookie = jar.get(&self.config.cookie_name)?;
        self.decode(cookie.value()).ok()
    }
}
