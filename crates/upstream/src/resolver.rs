//! Per-host API base resolution
//!
//! Multi-tenant deployments serve several public hostnames from one process;
//! each hostname may talk to its own upstream. The override map is parsed
//! once at startup and never mutated afterwards.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HOST};

use crate::error::ConfigurationError;

const FORWARDED_HOST: &str = "x-forwarded-host";

/// Immutable host → upstream base URL map with a default fallback
#[derive(Debug, Clone, Default)]
pub struct ApiBaseResolver {
    default_base: Option<String>,
    overrides: HashMap<String, String>,
}

impl ApiBaseResolver {
    /// Build from the default base and the `host1=url1,host2=url2` override text.
    ///
    /// Malformed pairs are skipped with a warning so one bad entry cannot
    /// take down every other tenant.
    pub fn new(default_base: Option<&str>, overrides: Option<&str>) -> Self {
        let default_base = default_base.and_then(|raw| match normalize_base(raw) {
            Some(base) => Some(base),
            None => {
                tracing::warn!(value = raw, "Ignoring invalid default API base URL");
                None
            }
        });

        let mut map = HashMap::new();
        for pair in overrides.unwrap_or_default().split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }

            let Some((host, url)) = pair.split_once('=') else {
                tracing::warn!(entry = pair, "Ignoring API base override without '='");
                continue;
            };

            match (normalize_host(host), normalize_base(url)) {
                (Some(host), Some(base)) => {
                    map.insert(host, base);
                }
                _ => {
                    tracing::warn!(entry = pair, "Ignoring malformed API base override");
                }
            }
        }

        tracing::debug!(
            overrides = map.len(),
            has_default = default_base.is_some(),
            "API base resolver configured"
        );

        Self {
            default_base,
            overrides: map,
        }
    }

    /// Resolve the base URL for a request's host headers.
    ///
    /// `x-forwarded-host` wins over `host`. The host is matched as given
    /// (including port), then as a bare hostname, then the default applies.
    pub fn resolve(&self, headers: &HeaderMap) -> Result<String, ConfigurationError> {
        let candidate = headers
            .get(FORWARDED_HOST)
            .or_else(|| headers.get(HOST))
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next());

        self.resolve_host(candidate)
    }

    /// Resolve the base URL for an explicit host string
    pub fn resolve_host(&self, host: Option<&str>) -> Result<String, ConfigurationError> {
        let normalized = host.and_then(normalize_host);

        if let Some(host) = normalized.as_deref() {
            if let Some(base) = self.overrides.get(host) {
                return Ok(base.clone());
            }
            if let Some(base) = self.overrides.get(strip_port(host)) {
                return Ok(base.clone());
            }
        }

        self.default_base
            .clone()
            .ok_or(ConfigurationError { host: normalized })
    }
}

/// Lowercase, drop any scheme, path, query, or fragment, keep the port
fn normalize_host(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    let without_scheme = match lowered.split_once("://") {
        Some((_, rest)) => rest,
        None => lowered.as_str(),
    };
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.');

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literal, e.g. [::1]:3000
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

fn normalize_base(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let url = reqwest::Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    Some(trimmed.trim_end_matches('/').to_string())
}
