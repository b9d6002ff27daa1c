//! Sessions domain state and the route guard middleware

use axum::{
    extract::{FromRef, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use growteam_auth::{MaybeSession, SessionBackend};

use crate::domain::guard::{guard, GuardDecision};
use crate::domain::providers::SessionProviders;

/// Application state for the Sessions domain
#[derive(Clone)]
pub struct SessionsState {
    pub providers: SessionProviders,
    pub sessions: SessionBackend,
}

impl FromRef<SessionsState> for SessionBackend {
    fn from_ref(state: &SessionsState) -> Self {
        state.sessions.clone()
    }
}

/// Enforce the route guard on every request.
///
/// Install with `axum::middleware::from_fn_with_state(backend, route_guard)`;
/// the session is read through the backend passed as state.
pub async fn route_guard(
    MaybeSession(session): MaybeSession,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri();
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    match guard(target, session.as_ref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(
                path = %uri.path(),
                user_type = ?session.as_ref().map(|s| s.user_type),
                redirect = %to,
                "Route guard redirect"
            );
            Redirect::to(&to).into_response()
        }
    }
}
