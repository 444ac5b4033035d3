//! Session mediation: token extraction, verification and revocation over HTTP.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use common::TestApp;

#[tokio::test]
async fn test_missing_token() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/documents", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication Token Required");
    assert_eq!(body["error"]["code"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn test_garbage_token() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/documents", Some("invalidToken")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_bearer_header_accepted() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let request = Request::builder()
        .uri("/documents")
        .header("authorization", format!("Bearer {}", account.token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app.post("/users/logout", Some(&account.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout Successful");

    let (status, body) = app.get("/documents", Some(&account.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "REVOKED_TOKEN");

    let (status, _) = app.post("/users/logout", Some(&account.token), json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_invalidates_previous_token() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app.login(&account.email, &account.password).await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["token"].as_str().unwrap().to_string();
    assert_ne!(fresh, account.token);

    let (status, _) = app.get("/documents", Some(&account.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.get("/documents", Some(&fresh)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_change_keeps_session() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, _) = app
        .put(
            &format!("/users/{}", account.id),
            Some(&account.token),
            json!({ "password": "new password" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/documents", Some(&account.token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_propagated() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
