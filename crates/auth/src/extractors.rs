//! Axum extractors for sessions
//!
//! Generic over any state `S` where `SessionBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::backend::SessionBackend;
use crate::claims::SessionToken;

/// Optional session: `None` when signed out, expired, or tampered
#[derive(Debug)]
pub struct MaybeSession(pub Option<SessionToken>);

impl<S> FromRequestParts<S> for MaybeSession
where
    SessionBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = SessionBackend::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeSession(backend.read(&jar)))
    }
}
