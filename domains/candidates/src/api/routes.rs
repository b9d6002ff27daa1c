//! Route definitions for Candidates domain API

use axum::{routing::post, Router};

use super::handlers::submissions;
use super::middleware::CandidatesState;

/// Create all Candidates domain API routes
pub fn routes() -> Router<CandidatesState> {
    Router::new()
        .route("/api/candidate/create", post(submissions::submit_candidate))
        .route("/api/candidate/apply", post(submissions::submit_candidate))
}
