//! Session cookie configuration

use chrono::Duration;
use growteam_common::Config;

/// Name of the cookie that carries the signed session token
pub const SESSION_COOKIE_NAME: &str = "growteam.session-token";

/// Session cookie configuration
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub max_age: Duration,
    pub secure_cookies: bool,
    pub cookie_name: String,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            max_age: Duration::days(30),
            secure_cookies: true,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let max_age = i64::try_from(config.session_max_age_secs)
            .map(Duration::seconds)
            .unwrap_or_else(|_| Duration::days(30));

        Self {
            secret: config.session_secret.clone(),
            max_age,
            secure_cookies: config.secure_cookies,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
        }
    }
}

impl std::fmt::Debug for SessionConfig {
    #[mutants::skip] // Field listing only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[REDACTED]")
            .field("max_age", &self.max_age)
            .field("secure_cookies", &self.secure_cookies)
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}
