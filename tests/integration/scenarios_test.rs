//! End-to-end scenarios
//!
//! Each scenario drives the composed application against a mock upstream API,
//! from sign-in or upload through to the guarded pages that follow.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use growteam_candidates::{consume_stream, NonceBootstrap, SubmissionOutcome};
use growteam_sessions::{
    RequestContext, SessionProvider, StaffCredentials, StaffProvider, UpstreamHandle,
};
use growteam_upstream::{ApiBaseResolver, UpstreamClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    json_body, location, mount_applicant_login, mount_pin_login, mount_submission_stream,
    session_cookie, unsigned_jwt, CapturedLogs, TestApp,
};

// E2E-1: a REFERENCES-scoped PIN session is sent back to PIN entry from the profiling test
#[tokio::test]
async fn test_references_pin_session_redirected_from_profiletest() {
    let app = TestApp::new().await;
    let access_token = unsigned_jwt(json!({"sub": "app-1", "pinAction": "REFERENCES"}));
    mount_pin_login(&app.upstream, "app-1", &access_token).await;

    let response = app
        .post_form(
            "/application/app-1/pin",
            "pin=123456&next=%2Fapplication%2Fapp-1%2Freferences",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/application/app-1/references")
    );
    let cookie = session_cookie(&response).expect("PIN sign-in should set a session");

    // In scope: the guard lets the request through to routing
    let response = app
        .get("/application/app-1/references", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Out of scope: back to PIN entry, carrying the original target
    let response = app
        .get("/application/app-1/profiletest", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/application/app-1/pin?next=%2Fapplication%2Fapp-1%2Fprofiletest")
    );

    // The session projection exposes the scope but not the token
    let session = json_body(app.get("/api/auth/session", Some(&cookie)).await).await;
    assert_eq!(session["user"]["userType"], "application");
    assert!(!session.to_string().contains(&access_token));
}

// E2E-2: resume upload stream yields three events and the nonce payload
#[tokio::test]
async fn test_resume_upload_stream_yields_nonce_payload() {
    let app = TestApp::new().await;
    mount_submission_stream(
        &app.upstream,
        concat!(
            "event: info\ndata: {\"type\":\"info\",\"message\":\"Uploading resume\"}\n\n",
            "event: progress\ndata: {\"type\":\"progress\",\"message\":\"Parsing\",\"progress\":50}\n\n",
            "event: success\ndata: {\"type\":\"success\",\"message\":\"Profile created\",\"data\":{\"id\":\"ap-9\",\"nonce\":\"n-9\"}}\n\n",
        ),
    )
    .await;

    let response = app
        .post_multipart(
            "/api/candidate/create",
            &[("resume", Some("cv.pdf"), "%PDF-1.4"), ("vacancyId", None, "12")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut progress = Vec::new();
    let outcome: SubmissionOutcome<NonceBootstrap> =
        consume_stream(response.into_body().into_data_stream(), |event| {
            progress.push(event.progress)
        })
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.events.len(), 3);
    assert_eq!(progress, vec![None, Some(50.0), None]);
    assert_eq!(
        outcome.payload,
        Some(NonceBootstrap {
            id: "ap-9".to_string(),
            nonce: "n-9".to_string(),
        })
    );
}

// E2E-3: a rejected staff login is denied quietly and never logs the secret
#[tokio::test]
async fn test_staff_rejection_denies_without_logging_secret() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&app.upstream)
        .await;

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = UpstreamClient::new(Duration::from_secs(5)).unwrap();
    let resolver = ApiBaseResolver::new(Some(&app.upstream.uri()), None);
    let provider = StaffProvider::new(UpstreamHandle::new(Arc::new(client), Arc::new(resolver)));

    let credentials = StaffCredentials {
        username: "rae@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
    };
    let headers = axum::http::HeaderMap::new();
    let result = provider
        .authorize(&credentials, &RequestContext { headers: &headers })
        .await;

    assert!(matches!(result, Ok(None)));
    let captured = logs.contents();
    assert!(captured.contains("Sign-in denied"));
    assert!(!captured.contains("correct-horse-battery"));
}

// E2E-4: the upload's nonce payload signs the applicant in
#[tokio::test]
async fn test_upload_payload_bootstraps_applicant_session() {
    let app = TestApp::new().await;
    mount_submission_stream(
        &app.upstream,
        "event: success\ndata: {\"id\":\"ap-9\",\"nonce\":\"n-9\"}\n\n",
    )
    .await;
    mount_applicant_login(&app.upstream, "ap-9", "n-9").await;

    let response = app
        .post_multipart(
            "/api/candidate/apply",
            &[
                ("linkedInUrl", None, "https://www.linkedin.com/in/cam"),
                ("positionId", None, "p-4"),
            ],
        )
        .await;
    let outcome: SubmissionOutcome<NonceBootstrap> =
        consume_stream(response.into_body().into_data_stream(), |_| {}).await;
    let credentials = outcome
        .payload
        .expect("stream should carry a nonce")
        .into_credentials();

    // Unauthenticated applicant pages bounce to the applicant login
    let response = app.get("/profile/edit", None).await;
    assert_eq!(location(&response).as_deref(), Some("/applicant/login"));

    let form = format!(
        "applicantId={}&nonce={}",
        credentials.applicant_id.as_deref().unwrap_or_default(),
        credentials.nonce
    );
    let response = app.post_form("/api/auth/callback/applicant", &form).await;
    assert_eq!(location(&response).as_deref(), Some("/dashboard"));
    let cookie = session_cookie(&response).expect("nonce sign-in should set a session");

    let response = app.get("/profile/edit", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let session = json_body(app.get("/api/auth/session", Some(&cookie)).await).await;
    assert_eq!(session["user"]["id"], "ap-9");
    assert_eq!(session["user"]["name"], "Cam");
}
