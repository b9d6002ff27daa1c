//! Candidate submission integration tests
//!
//! Validation, upstream error mirroring, and stream relay through the full app.

use axum::http::{header, StatusCode};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{json_body, mount_submission_stream, TestApp};

mod test_validation {
    use super::*;

    #[tokio::test]
    async fn test_missing_resume_and_linkedin_rejected_before_upstream() {
        let app = TestApp::new().await;
        Mock::given(method("POST"))
            .and(path("/public/applicant"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.upstream)
            .await;

        let response = app
            .post_multipart("/api/candidate/create", &[("vacancyId", None, "12")])
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_linkedin_url_names_the_field() {
        let app = TestApp::new().await;

        let response = app
            .post_multipart(
                "/api/candidate/apply",
                &[
                    ("linkedInUrl", None, "https://example.com/in/cam"),
                    ("positionId", None, "p-4"),
                ],
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["field"], "linkedInUrl");
    }
}

mod test_upstream_errors {
    use super::*;

    #[tokio::test]
    async fn test_upstream_rejection_is_mirrored() {
        let app = TestApp::new().await;
        Mock::given(method("POST"))
            .and(path("/public/applicant"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({"detail": "Vacancy closed"})),
            )
            .expect(1)
            .mount(&app.upstream)
            .await;

        let response = app
            .post_multipart(
                "/api/candidate/create",
                &[("resume", Some("cv.pdf"), "%PDF-1.4"), ("vacancyId", None, "12")],
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await, json!({"detail": "Vacancy closed"}));
    }

    #[tokio::test]
    async fn test_empty_upstream_body_is_server_error() {
        let app = TestApp::new().await;
        Mock::given(method("POST"))
            .and(path("/public/applicant"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&app.upstream)
            .await;

        let response = app
            .post_multipart(
                "/api/candidate/create",
                &[("resume", Some("cv.pdf"), "%PDF-1.4"), ("vacancyId", None, "12")],
            )
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

mod test_stream_relay {
    use super::*;

    #[tokio::test]
    async fn test_stream_bytes_relayed_unchanged() {
        let app = TestApp::new().await;
        let sse = "event: info\ndata: {\"type\":\"info\",\"message\":\"Queued\"}\n\n";
        mount_submission_stream(&app.upstream, sse).await;

        let response = app
            .post_multipart(
                "/api/candidate/create",
                &[("resume", Some("cv.pdf"), "%PDF-1.4"), ("positionId", None, "12")],
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-cache");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(std::str::from_utf8(&bytes).unwrap(), sse);
    }
}
