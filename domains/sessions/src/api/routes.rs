//! Route definitions for Sessions domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, pin};
use super::middleware::SessionsState;

/// Create all Sessions domain API routes
pub fn routes() -> Router<SessionsState> {
    Router::new()
        .route("/api/auth/callback/{provider}", post(auth::sign_in))
        .route("/api/auth/session", get(auth::get_session))
        .route("/api/auth/signout", post(auth::sign_out))
        .route("/application/{id}/pin", post(pin::submit_pin))
}
