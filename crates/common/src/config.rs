//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// Default session lifetime when upstream does not report `expires_in` (30 days)
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

/// Default request body ceiling for resume uploads (20 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct Config {
    /// Default upstream API base URL
    pub api_base_url: Option<String>,

    /// Per-host overrides in `host1=url1,host2=url2` form
    pub api_base_overrides: Option<String>,

    /// HS256 secret used to sign the session cookie
    pub session_secret: String,
    pub session_max_age_secs: u64,
    pub secure_cookies: bool,

    /// Upstream HTTP behaviour
    pub upstream_timeout_secs: u64,
    pub stream_idle_timeout_secs: u64,
    pub max_upload_bytes: usize,

    /// Runtime configuration
    pub cors_allowed_origins: Option<String>,
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    #[mutants::skip] // Field listing only; redaction is covered by test_config_debug_redacts_secret
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("api_base_overrides", &self.api_base_overrides)
            .field("session_secret", &"[REDACTED]")
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("secure_cookies", &self.secure_cookies)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("stream_idle_timeout_secs", &self.stream_idle_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET is required"))?;
        if session_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("SESSION_SECRET must not be empty"));
        }

        let config = Self {
            api_base_url: non_empty_var("API_BASE_URL"),
            api_base_overrides: non_empty_var("API_BASE_URL_OVERRIDES"),

            session_secret,
            session_max_age_secs: parsed_var("SESSION_MAX_AGE_SECS", DEFAULT_SESSION_MAX_AGE_SECS),
            secure_cookies: parsed_var("SECURE_COOKIES", true),

            upstream_timeout_secs: parsed_var("UPSTREAM_TIMEOUT_SECS", 15),
            stream_idle_timeout_secs: parsed_var("STREAM_IDLE_TIMEOUT_SECS", 120),
            max_upload_bytes: parsed_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),

            cors_allowed_origins: non_empty_var("CORS_ALLOWED_ORIGINS"),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "growteam=debug".to_string()),
            port: parsed_var("PORT", 3000),
        };

        if config.api_base_url.is_none() && config.api_base_overrides.is_none() {
            tracing::warn!(
                "Neither API_BASE_URL nor API_BASE_URL_OVERRIDES is set; every sign-in will fail"
            );
        }

        Ok(config)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparsable configuration value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "API_BASE_URL",
        "API_BASE_URL_OVERRIDES",
        "SESSION_SECRET",
        "SESSION_MAX_AGE_SECS",
        "SECURE_COOKIES",
        "STREAM_IDLE_TIMEOUT_SECS",
        "PORT",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_config_requires_session_secret() {
        clear_env();
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        env::set_var("SESSION_SECRET", "s3cret");

        let config = Config::from_env().unwrap();
        assert_eq!(config.session_max_age_secs, DEFAULT_SESSION_MAX_AGE_SECS);
        assert!(config.secure_cookies);
        assert_eq!(config.stream_idle_timeout_secs, 120);
        assert_eq!(config.port, 3000);
        assert!(config.api_base_url.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_reads_overrides_and_flags() {
        clear_env();
        env::set_var("SESSION_SECRET", "s3cret");
        env::set_var("API_BASE_URL", "https://api.example.com");
        env::set_var("API_BASE_URL_OVERRIDES", "a.com=https://a.api");
        env::set_var("SECURE_COOKIES", "false");
        env::set_var("PORT", "not-a-port");

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(
            config.api_base_overrides.as_deref(),
            Some("a.com=https://a.api")
        );
        assert!(!config.secure_cookies);
        assert_eq!(config.port, 3000);

        clear_env();
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = Config {
            api_base_url: None,
            api_base_overrides: None,
            session_secret: "super-secret-value".to_string(),
            session_max_age_secs: 60,
            secure_cookies: false,
            upstream_timeout_secs: 1,
            stream_idle_timeout_secs: 1,
            max_upload_bytes: 1,
            cors_allowed_origins: None,
            rust_log: "info".to_string(),
            port: 3000,
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
