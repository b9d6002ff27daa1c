//! Resume submission proxy

use std::convert::Infallible;
use std::fmt::Display;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::Value;

use crate::api::middleware::CandidatesState;
use crate::domain::error::ProxyError;
use crate::domain::sse::SseRecord;
use crate::domain::submission::{Submission, SubmissionPart};

const INTERRUPTED_MESSAGE: &str = "The submission stream was interrupted";
const IDLE_MESSAGE: &str = "The submission stopped responding";

/// `POST /api/candidate/create` and `POST /api/candidate/apply`
///
/// Forwards the upload and pipes the upstream event stream back unchanged.
/// Dropping the response body (client gone) drops the upstream connection.
pub async fn submit_candidate(
    State(state): State<CandidatesState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ProxyError> {
    let submission = Submission::from_parts(read_parts(&mut multipart).await?);
    submission.check()?;

    let base = state.upstream.resolver.resolve(&headers)?;
    tracing::info!(
        position_id = ?submission.position_id(),
        has_resume = submission.has_resume(),
        "Relaying candidate submission"
    );

    let response = state
        .upstream
        .api
        .submit_applicant(&base, submission.into_form())
        .await
        .map_err(|e| ProxyError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let detail = upstream_detail(response).await;
        tracing::warn!(status = status.as_u16(), "Upstream rejected candidate submission");
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            detail,
        });
    }

    if status == reqwest::StatusCode::NO_CONTENT || response.content_length() == Some(0) {
        return Err(ProxyError::EmptyBody);
    }

    let body = relay(response.bytes_stream(), state.idle_timeout);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

async fn read_parts(multipart: &mut Multipart) -> Result<Vec<SubmissionPart>, ProxyError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::Multipart(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        if file_name.is_some() {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ProxyError::Multipart(e.body_text()))?;
            parts.push(SubmissionPart::File {
                name,
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ProxyError::Multipart(e.body_text()))?;
            parts.push(SubmissionPart::Text { name, value });
        }
    }

    Ok(parts)
}

/// Upstream `detail`, or the status text when the body has none
async fn upstream_detail(response: reqwest::Response) -> Value {
    let reason = response
        .status()
        .canonical_reason()
        .unwrap_or("Upstream error")
        .to_string();

    response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("detail").cloned())
        .filter(|detail| !detail.is_null())
        .unwrap_or(Value::String(reason))
}

/// Pass chunks through untouched.
///
/// A transport error or a silence longer than `idle` ends the stream with
/// one synthetic `error` record.
pub fn relay<S, E>(upstream: S, idle: Duration) -> impl Stream<Item = Result<Bytes, Infallible>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = std::pin::pin!(upstream);
        let mut relayed: usize = 0;

        loop {
            match tokio::time::timeout(idle, upstream.next()).await {
                Ok(Some(Ok(chunk))) => {
                    relayed += chunk.len();
                    yield Ok(chunk);
                }
                Ok(Some(Err(e))) => {
                    tracing::warn!(error = %e, relayed, "Upstream submission stream failed");
                    yield Ok(error_record(INTERRUPTED_MESSAGE));
                    break;
                }
                Ok(None) => {
                    tracing::debug!(relayed, "Upstream submission stream finished");
                    break;
                }
                Err(_) => {
                    tracing::warn!(idle_secs = idle.as_secs(), relayed, "Upstream submission stream idle");
                    yield Ok(error_record(IDLE_MESSAGE));
                    break;
                }
            }
        }
    }
}

/// Leading blank lines close any record the upstream left half-written
fn error_record(message: &str) -> Bytes {
    Bytes::from(format!("\n\n{}", SseRecord::error(message).encode()))
}
