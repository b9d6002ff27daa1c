//! Grow My Team upstream API client
//!
//! Talks to the GetMe.video API on behalf of the session providers and the
//! submission proxy:
//! - Per-host API base resolution from an immutable override map
//! - Grant exchange (`password`, `custom:nonce`, `custom:pin`)
//! - Bearer-authenticated profile and application fetches
//! - Multipart resume submission returning the raw SSE response

pub mod client;
pub mod error;
pub mod grant;
pub mod profiles;
pub mod resolver;

pub use client::{UpstreamClient, SUBMISSION_PATH};
pub use error::{ConfigurationError, UpstreamError};
pub use grant::{Grant, Token};
pub use profiles::{
    flexible_id, flexible_id_opt, ApplicantProfile, ApplicationRecord, RecordRef, StaffProfile,
};
pub use resolver::ApiBaseResolver;

/// Upstream API operations.
///
/// Every call takes the API base resolved for the current request so one
/// client serves every tenant.
#[async_trait::async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Trade a credential for a bearer token
    async fn exchange_grant(&self, base: &str, grant: &Grant) -> Result<Token, UpstreamError>;

    /// `GET /user`
    async fn fetch_staff_profile(
        &self,
        base: &str,
        access_token: &str,
    ) -> Result<StaffProfile, UpstreamError>;

    /// `GET /v1/applicant`
    async fn fetch_applicant(
        &self,
        base: &str,
        access_token: &str,
    ) -> Result<ApplicantProfile, UpstreamError>;

    /// `GET /v1/applicant/application/{id}`
    async fn fetch_application(
        &self,
        base: &str,
        access_token: &str,
        application_id: &str,
    ) -> Result<ApplicationRecord, UpstreamError>;

    /// `POST /public/applicant` with a multipart body; the response is returned unread
    async fn submit_applicant(
        &self,
        base: &str,
        form: reqwest::multipart::Form,
    ) -> Result<reqwest::Response, UpstreamError>;
}
