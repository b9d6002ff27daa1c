//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - A fully composed application pointed at a mock upstream API
//! - Request helpers for form posts, multipart uploads, and cookie sessions
//! - Upstream fixtures for each sign-in flow and the submission stream
//! - Log capture for asserting that secrets never reach the logs

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use growteam_common::Config;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MULTIPART_BOUNDARY: &str = "growteam-integration-boundary";

/// Application wired to a mock upstream API
pub struct TestApp {
    pub upstream: MockServer,
    pub router: Router,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let config = test_config(&upstream.uri());
        let router = growteam_app::create_app(&config).expect("application should build");

        Self {
            upstream,
            router,
            config,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// `fields` are `(name, filename, value)`; a filename makes the part a file
    pub async fn post_multipart(&self, uri: &str, fields: &[(&str, Option<&str>, &str)]) -> Response {
        let mut body = String::new();
        for (name, file_name, value) in fields {
            body.push_str(&format!("--{}\r\n", MULTIPART_BOUNDARY));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                    name, file_name
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));

        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

pub fn test_config(api_base_url: &str) -> Config {
    Config {
        api_base_url: Some(api_base_url.to_string()),
        api_base_overrides: None,
        session_secret: "integration-test-secret".to_string(),
        session_max_age_secs: 3600,
        secure_cookies: false,
        upstream_timeout_secs: 5,
        stream_idle_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
        cors_allowed_origins: None,
        rust_log: "debug".to_string(),
        port: 0,
    }
}

/// `name=value` of the session cookie set by a response
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(growteam_auth::SESSION_COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// JWT-shaped token with the given claims and a throwaway signature
pub fn unsigned_jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.c2lnbmF0dXJl", header, body)
}

fn token_response(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 900
    }))
}

/// Upstream accepting a PIN for `application_id` and issuing `access_token`
pub async fn mount_pin_login(server: &MockServer, application_id: &str, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/token"))
        .and(body_partial_json(json!({
            "grant_type": "custom:pin",
            "applicationId": application_id
        })))
        .respond_with(token_response(access_token))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/applicant/application/{}", application_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": application_id,
            "applicant": {"id": "ap-1"},
            "vacancy": {"id": 12}
        })))
        .mount(server)
        .await;
}

/// Upstream accepting the nonce grant for `applicant_id`
pub async fn mount_applicant_login(server: &MockServer, applicant_id: &str, nonce: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/token"))
        .and(body_partial_json(json!({
            "grant_type": "custom:nonce",
            "applicantId": applicant_id,
            "nonce": nonce
        })))
        .respond_with(token_response("applicant-access-token"))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/applicant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": applicant_id,
            "email": "cand@example.com",
            "firstname": "Cam"
        })))
        .mount(server)
        .await;
}

/// Upstream answering the resume upload with an SSE body
pub async fn mount_submission_stream(server: &MockServer, sse: &str) {
    Mock::given(method("POST"))
        .and(path("/public/applicant"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse.to_string()),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// In-memory log sink for `tracing_subscriber::fmt`
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let buffer = self.0.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
