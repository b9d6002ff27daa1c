//! Upstream client errors

use thiserror::Error;

/// No API base could be resolved for a request.
///
/// This is a deployment defect and must surface as a 500, never as a
/// denied login.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no API base URL configured for host {host:?} and no default set")]
pub struct ConfigurationError {
    pub host: Option<String>,
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Grant exchange returned non-2xx or a malformed body
    #[error("upstream grant exchange failed with status {status}")]
    AuthExchange { status: u16, body: String },

    /// Bearer-authenticated resource fetch returned non-2xx or a malformed body
    #[error("upstream resource request failed with status {status}")]
    Resource { status: u16, body: String },

    #[error("upstream request error: {0}")]
    Request(String),
}

impl UpstreamError {
    /// Upstream status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::AuthExchange { status, .. } | UpstreamError::Resource { status, .. } => {
                Some(*status)
            }
            UpstreamError::Request(_) => None,
        }
    }
}
