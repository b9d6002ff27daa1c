//! Submission proxy errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use growteam_upstream::ConfigurationError;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("malformed multipart body: {0}")]
    Multipart(String),

    /// Upstream refused the submission; `detail` is relayed to the browser
    #[error("upstream rejected submission with status {status}")]
    Upstream { status: u16, detail: Value },

    #[error("upstream returned an empty response")]
    EmptyBody,

    #[error("upstream request failed: {0}")]
    Request(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Validation { .. } | ProxyError::Multipart(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Request(_) => StatusCode::BAD_GATEWAY,
            ProxyError::EmptyBody | ProxyError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ProxyError::Upstream { detail, .. } => json!({ "detail": detail }),
            ProxyError::Validation { field, message } => {
                tracing::debug!(field = %field, message = %message, "Submission rejected");
                json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "field": field,
                        "message": message,
                    }
                })
            }
            ProxyError::Multipart(_) => json!({
                "error": {
                    "code": "INVALID_MULTIPART",
                    "message": self.to_string(),
                }
            }),
            ProxyError::EmptyBody | ProxyError::Request(_) | ProxyError::Configuration(_) => {
                tracing::error!(error = %self, "Submission proxy failed");
                let code = match &self {
                    ProxyError::EmptyBody => "EMPTY_UPSTREAM_RESPONSE",
                    ProxyError::Request(_) => "UPSTREAM_UNAVAILABLE",
                    _ => "CONFIGURATION_ERROR",
                };
                json!({
                    "error": {
                        "code": code,
                        "message": self.to_string(),
                    }
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
