//! Session model for Grow My Team
//!
//! Provides the normalized user shape produced by every provider, the
//! callback pipeline that turns it into a signed session token, the
//! client-visible projection, and an axum extractor that works with any
//! domain state implementing `FromRef<S>` for `SessionBackend`.

mod backend;
mod callbacks;
mod claims;
mod config;
mod error;
mod extractors;
mod jwt;
mod types;

pub use backend::SessionBackend;
pub use callbacks::{jwt, session};
pub use claims::{ClientSession, SessionToken, SessionUser};
pub use config::{SessionConfig, SESSION_COOKIE_NAME};
pub use error::AuthError;
pub use extractors::MaybeSession;
pub use jwt::read_pin_action_claim;
pub use types::{
    is_sentinel_email, sentinel_email, NormalizedUser, Organisation, PinAction, UserType,
    SENTINEL_EMAIL_DOMAIN,
};
