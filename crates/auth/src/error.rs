//! Session errors

/// Session error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("session cookie is invalid or expired")]
    InvalidSession,
    #[error("failed to sign session token: {0}")]
    SessionEncoding(String),
}
