//! Grow My Team application composition root
//!
//! Composes the domain routers into a single application behind the route guard.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use growteam_auth::{SessionBackend, SessionConfig};
use growteam_candidates::CandidatesState;
use growteam_common::{Config, Error};
use growteam_sessions::{route_guard, SessionProviders, SessionsState, UpstreamHandle};
use growteam_upstream::{ApiBaseResolver, UpstreamClient};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let resolver = ApiBaseResolver::new(
        config.api_base_url.as_deref(),
        config.api_base_overrides.as_deref(),
    );
    let client = UpstreamClient::new(Duration::from_secs(config.upstream_timeout_secs))?;
    let upstream = UpstreamHandle::new(Arc::new(client), Arc::new(resolver));

    let sessions = SessionBackend::new(SessionConfig::from_config(config));

    let sessions_state = SessionsState {
        providers: SessionProviders::new(upstream.clone()),
        sessions: sessions.clone(),
    };
    let candidates_state = CandidatesState {
        upstream,
        idle_timeout: Duration::from_secs(config.stream_idle_timeout_secs),
    };

    // Build router: compose domain routers, then guard every path
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(growteam_sessions::routes().with_state(sessions_state))
        .merge(growteam_candidates::routes().with_state(candidates_state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware::from_fn_with_state(sessions, route_guard));

    Ok(app)
}

/// CORS for the configured browser origins; same-origin only when unset
pub fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Request body ceiling sized for resume uploads
pub fn body_limit_layer(max_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_bytes)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> Error {
    Error::NotFound("No such route".to_string())
}
