//! Session endpoint integration tests
//!
//! Sign-in, session reads, sign-out, and per-host upstream selection.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{json_body, location, session_cookie, test_config, TestApp};

async fn mount_staff_login(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_partial_json(json!({"grant_type": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "email": "rae@example.com",
            "firstname": "Rae",
            "organisations": [{"id": 7, "name": "Acme"}]
        })))
        .mount(server)
        .await;
}

mod test_staff_sign_in {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_then_login_page_redirects_to_dashboard() {
        let app = TestApp::new().await;
        mount_staff_login(&app.upstream, "staff-token").await;

        let response = app
            .post_form(
                "/api/auth/callback/credentials",
                "username=rae%40example.com&password=pw&callbackUrl=%2Femployer%2Fjobs",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/employer/jobs"));
        let cookie = session_cookie(&response).unwrap();

        let response = app.get("/login", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_deref(), Some("/employer/dashboard"));

        let response = app.get("/employer/jobs", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_projection_shape() {
        let app = TestApp::new().await;
        mount_staff_login(&app.upstream, "staff-token").await;

        let response = app
            .post_form("/api/auth/callback/credentials", "username=rae&password=pw")
            .await;
        let cookie = session_cookie(&response).unwrap();

        let session = json_body(app.get("/api/auth/session", Some(&cookie)).await).await;
        assert_eq!(
            session["user"],
            json!({
                "id": "42",
                "name": "Rae",
                "email": "rae@example.com",
                "userType": "staff"
            })
        );
        assert!(session["expires"].is_string());
        assert!(!session.to_string().contains("staff-token"));
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let app = TestApp::new().await;
        mount_staff_login(&app.upstream, "staff-token").await;

        let response = app
            .post_form("/api/auth/callback/credentials", "username=rae&password=pw")
            .await;
        let cookie = session_cookie(&response).unwrap();

        let response = app
            .request(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/signout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(location(&response).as_deref(), Some("/"));
        let cleared = session_cookie(&response).unwrap();
        assert_eq!(cleared, format!("{}=", growteam_auth::SESSION_COOKIE_NAME));

        let response = app.get("/employer", Some(&cleared)).await;
        assert_eq!(location(&response).as_deref(), Some("/login"));
    }
}

mod test_tampering {
    use super::*;

    #[tokio::test]
    async fn test_cookie_signed_with_other_secret_is_ignored() {
        let app = TestApp::new().await;
        mount_staff_login(&app.upstream, "staff-token").await;

        let mut other = test_config(&app.upstream.uri());
        other.session_secret = "some-other-secret".to_string();
        let other_app = growteam_app::create_app(&other).unwrap();

        let response = other_app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/callback/credentials")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=rae&password=pw"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let foreign_cookie = session_cookie(&response).unwrap();

        let response = app.get("/employer/dashboard", Some(&foreign_cookie)).await;
        assert_eq!(location(&response).as_deref(), Some("/login"));
    }
}

mod test_api_base_resolution {
    use super::*;

    #[tokio::test]
    async fn test_forwarded_host_selects_tenant_upstream() {
        let default_upstream = MockServer::start().await;
        let tenant_upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&default_upstream)
            .await;
        mount_staff_login(&tenant_upstream, "tenant-token").await;

        let mut config = test_config(&default_upstream.uri());
        config.api_base_overrides = Some(format!("jobs.tenant.example={}", tenant_upstream.uri()));
        let app = growteam_app::create_app(&config).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/callback/credentials")
                    .header("x-forwarded-host", "Jobs.Tenant.Example:443")
                    .header(header::HOST, "internal:3000")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=rae&password=pw"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response).as_deref(), Some("/employer/dashboard"));
        assert!(session_cookie(&response).is_some());
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_server_error() {
        let upstream = MockServer::start().await;
        let mut config = test_config(&upstream.uri());
        config.api_base_url = None;
        config.api_base_overrides = Some(format!("known.example={}", upstream.uri()));
        let app = growteam_app::create_app(&config).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/callback/credentials")
                    .header(header::HOST, "unknown.example")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=rae&password=pw"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }
}
