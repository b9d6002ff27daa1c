//! HTTP error type for the session endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by sign-in, session, and page handlers.
///
/// Denied logins are not errors; they redirect. These cover the cases a
/// browser cannot recover from on its own.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    /// No upstream API base for the request host
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session cookie could not be issued
    #[error("Session error: {0}")]
    Session(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Configuration(_) | Error::Session(_) | Error::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::Session(_) => "SESSION_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Browser-facing text; server faults are logged in full but described generically
    fn public_message(&self) -> String {
        match self {
            Error::NotFound(_) => self.to_string(),
            Error::Configuration(_) => "This site is not configured for sign-in".to_string(),
            Error::Session(_) | Error::Serialization(_) => {
                "The session could not be processed".to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}
