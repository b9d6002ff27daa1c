//! Upstream HTTP Client Implementation
//!
//! Short calls (grant exchange, profile fetches) carry a per-request timeout.
//! The resume upload does not, since its response is a long-lived stream.

use std::time::Duration;

use growteam_common::mask_secret;
use reqwest::{multipart::Form, Response};
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;
use crate::grant::{Grant, Token};
use crate::profiles::{ApplicantProfile, ApplicationRecord, StaffProfile};
use crate::UpstreamApi;

/// Upstream path receiving resume submissions
pub const SUBMISSION_PATH: &str = "/public/applicant";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest upstream error body kept for diagnostics
const MAX_ERROR_BODY: usize = 512;

/// Real HTTP client for the upstream API
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    request_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(request_timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        Ok(Self {
            http,
            request_timeout,
        })
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        url: String,
        access_token: &str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                token = %mask_secret(access_token),
                "Upstream resource request rejected"
            );
            return Err(UpstreamError::Resource {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Upstream resource body malformed");
            UpstreamError::Resource {
                status: status.as_u16(),
                body: e.to_string(),
            }
        })
    }
}

#[async_trait::async_trait]
impl UpstreamApi for UpstreamClient {
    async fn exchange_grant(&self, base: &str, grant: &Grant) -> Result<Token, UpstreamError> {
        let url = join(base, grant.path());

        tracing::debug!(
            url = %url,
            grant_type = grant.grant_type(),
            subject = %grant.subject(),
            secret = %grant.masked_secret(),
            "Exchanging grant"
        );

        let response = self
            .http
            .post(&url)
            .json(&grant.body())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            tracing::warn!(
                grant_type = grant.grant_type(),
                subject = %grant.subject(),
                status = status.as_u16(),
                "Grant exchange rejected"
            );
            return Err(UpstreamError::AuthExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token = response.json::<Token>().await.map_err(|e| {
            tracing::warn!(
                grant_type = grant.grant_type(),
                error = %e,
                "Grant exchange returned a malformed token"
            );
            UpstreamError::AuthExchange {
                status: status.as_u16(),
                body: e.to_string(),
            }
        })?;

        tracing::debug!(
            grant_type = grant.grant_type(),
            token = %mask_secret(&token.access_token),
            expires_in = ?token.expires_in,
            "Grant exchanged"
        );
        Ok(token)
    }

    async fn fetch_staff_profile(
        &self,
        base: &str,
        access_token: &str,
    ) -> Result<StaffProfile, UpstreamError> {
        self.get_resource(join(base, "/user"), access_token).await
    }

    async fn fetch_applicant(
        &self,
        base: &str,
        access_token: &str,
    ) -> Result<ApplicantProfile, UpstreamError> {
        self.get_resource(join(base, "/v1/applicant"), access_token)
            .await
    }

    async fn fetch_application(
        &self,
        base: &str,
        access_token: &str,
        application_id: &str,
    ) -> Result<ApplicationRecord, UpstreamError> {
        let path = format!(
            "/v1/applicant/application/{}",
            urlencoding::encode(application_id)
        );
        self.get_resource(join(base, &path), access_token).await
    }

    async fn submit_applicant(&self, base: &str, form: Form) -> Result<Response, UpstreamError> {
        let url = join(base, SUBMISSION_PATH);
        tracing::debug!(url = %url, "Relaying applicant submission");

        self.http
            .post(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

async fn read_error_body(response: Response) -> String {
    let mut body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read response body".to_string());
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
