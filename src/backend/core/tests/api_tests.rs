//! End-to-end tests for the HTTP API.
//!
//! Tests cover:
//! - Signup and login, including credential errors
//! - User listing, lookup, update and deletion rules
//! - Admin account protection
//! - Document visibility and ownership
//! - Pagination parameters

mod common;

use axum::http::StatusCode;
use base64::Engine;
use serde_json::{json, Value};

use common::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

fn token_payload(token: &str) -> Value {
    let payload = token.split('.').nth(1).unwrap();
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_returns_token_and_public_fields() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/users",
            None,
            json!({
                "email": "A@X.com",
                "password": "pw123456",
                "firstName": "Ada",
                "lastName": "Lovelace"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "You have successfully signed up");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["roleId"], 2);
    assert!(body["token"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("activeToken").is_none());
}

#[tokio::test]
async fn test_signup_rejections() {
    let app = TestApp::new().await;
    let base = json!({
        "email": "b@x.com",
        "password": "pw123456",
        "firstName": "B",
        "lastName": "X"
    });

    let with = |key: &str, value: Value| {
        let mut body = base.clone();
        body[key] = value;
        body
    };

    let (status, body) = app.post("/users", None, with("id", json!(7))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID Cannot Be Changed");

    let (status, _) = app.post("/users", None, with("roleId", json!(1))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/users", None, with("roleId", json!(5))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Role");

    let (status, _) = app.post("/users", None, with("email", json!("not-an-email"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/users", None, with("password", json!("short"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/users", None, json!({ "email": "c@x.com", "password": "pw123456" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/users", None, base.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/users", None, with("email", json!("B@X.COM"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_with_regular_role_id_is_allowed() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/users",
            None,
            json!({
                "email": "r@x.com",
                "password": "pw123456",
                "firstName": "R",
                "lastName": "X",
                "roleId": 2
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["roleId"], 2);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;
    let (status, _) = app.post("/users", None, json!(["not", "an", "object"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_errors() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app.login(&account.email, "wrong password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Wrong Password");
    assert!(body.get("token").is_none());

    let (status, _) = app.login("nobody@x.com", "pw123456").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.post("/users/login", None, json!({ "email": account.email })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing Login Credentials");
}

#[tokio::test]
async fn test_login_token_payload_has_no_role_or_password() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app.login(&account.email, &account.password).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You have successfully logged in");

    let payload = token_payload(body["token"].as_str().unwrap());
    assert_eq!(payload["userId"], account.id);
    assert!(payload.get("roleId").is_none());
    assert!(payload.get("password").is_none());
}

#[tokio::test]
async fn test_password_change_flow() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/users",
            None,
            json!({
                "email": "a@x.com",
                "password": "pw123456",
                "firstName": "A",
                "lastName": "X"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = app.login("a@x.com", "bad password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .put(&format!("/users/{}", id), Some(&token), json!({ "password": "new password" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("password").is_none());

    let (status, _) = app.login("a@x.com", "pw123456").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login("a@x.com", "new password").await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_list_users_admin_only() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, _) = app.get("/users", Some(&account.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, body) = app.get("/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], account.id);
    assert!(users.iter().all(|u| u.get("password").is_none()));
    assert_eq!(body["pagination"]["totalCount"], 2);
}

#[tokio::test]
async fn test_list_users_search_and_pagination() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    for _ in 0..3 {
        app.signup().await;
    }

    let (status, body) = app.get("/users?limit=2", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["pageCount"], 2);

    let (status, body) = app.get("/users?limit=2&page=2", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["offset"], 2);
    assert_eq!(body["pagination"]["page"], 2);

    let (status, _) = app.get("/users?limit=2&page=9", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/users?offset=-1", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Offset");

    let (status, _) = app.get("/users?page=1&offset=0", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/users?search=docvault%20nomatch", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app.get("/users/1", Some(&account.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roleId"], 1);

    let (status, body) = app.get("/users/abc", Some(&account.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Bad Request");

    let (status, body) = app.get("/users/999", Some(&account.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resource(s) Not Found");
}

#[tokio::test]
async fn test_regular_user_cannot_touch_other_accounts() {
    let app = TestApp::new().await;
    let alice = app.signup().await;
    let bob = app.signup().await;

    let uri = format!("/users/{}", bob.id);
    let (status, _) = app.put(&uri, Some(&alice.token), json!({ "firstName": "Mallory" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&uri, Some(&alice.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.put("/users/999", Some(&alice.token), json!({ "firstName": "M" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_payload_rules() {
    let app = TestApp::new().await;
    let account = app.signup().await;
    let uri = format!("/users/{}", account.id);

    let (status, body) = app.put(&uri, Some(&account.token), json!({ "id": 99 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID Cannot Be Changed");

    let (status, _) = app.put(&uri, Some(&account.token), json!({ "roleId": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put(&uri, Some(&account.token), json!({ "roleId": 2 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.put(&uri, Some(&account.token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(&uri, Some(&account.token), json!({ "firstName": "  Grace  " }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Grace");
}

#[tokio::test]
async fn test_user_can_delete_self() {
    let app = TestApp::new().await;
    let account = app.signup().await;
    app.create_document(&account.token, "mine", "public").await;

    let (status, body) = app.delete(&format!("/users/{}", account.id), Some(&account.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User Deleted");

    let (status, _) = app.get("/documents", Some(&account.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = app.admin_token().await;
    let (_, body) = app.get("/documents", Some(&admin)).await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 0);
}

// ============================================================================
// Admin Protection
// ============================================================================

#[tokio::test]
async fn test_admin_accounts_cannot_be_deleted_or_demoted() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let account = app.signup().await;

    let (status, body) = app
        .put(&format!("/users/{}", account.id), Some(&admin), json!({ "roleId": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roleId"], 1);

    // The promoted user's existing token now carries admin rights.
    let (status, _) = app.get("/users", Some(&account.token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete("/users/1", Some(&account.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put("/users/1", Some(&account.token), json!({ "roleId": 2 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete("/users/1", Some(&admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put("/users/1", Some(&admin), json!({ "roleId": 2 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put("/users/1", Some(&account.token), json!({ "roleId": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.put("/users/1", Some(&admin), json!({ "roleId": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_can_update_and_delete_regular_users() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let account = app.signup().await;
    let uri = format!("/users/{}", account.id);

    let (status, body) = app.put(&uri, Some(&admin), json!({ "roleId": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roleId"], 2);

    let (status, _) = app.put(&uri, Some(&admin), json!({ "password": "admin set password" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.login(&account.email, "admin set password").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Documents
// ============================================================================

#[tokio::test]
async fn test_document_visibility() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let owner = app.signup().await;
    let peer = app.signup().await;

    let public = app.create_document(&owner.token, "public", "public").await;
    let private = app.create_document(&owner.token, "private", "private").await;
    let role = app.create_document(&owner.token, "role", "role").await;
    let admin_role = app.create_document(&admin, "admin role", "role").await;

    for id in [public, role] {
        let (status, _) = app.get(&format!("/documents/{}", id), Some(&peer.token)).await;
        assert_eq!(status, StatusCode::OK, "document {}", id);
    }
    for id in [private, admin_role] {
        let (status, _) = app.get(&format!("/documents/{}", id), Some(&peer.token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "document {}", id);
    }

    let (status, _) = app.get(&format!("/documents/{}", private), Some(&owner.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/documents/{}", private), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/documents", Some(&peer.token)).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![role, public]);
    assert_eq!(body["pagination"]["totalCount"], 2);

    let (_, body) = app.get("/documents", Some(&admin)).await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_user_documents_filtered_by_visibility() {
    let app = TestApp::new().await;
    let owner = app.signup().await;
    let peer = app.signup().await;

    app.create_document(&owner.token, "public", "public").await;
    app.create_document(&owner.token, "private", "private").await;

    let uri = format!("/users/{}/documents", owner.id);
    let (status, body) = app.get(&uri, Some(&peer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], owner.id);
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);

    let (_, body) = app.get(&uri, Some(&owner.token)).await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);

    let (status, _) = app.get("/users/999/documents", Some(&owner.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_ownership_rules() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let owner = app.signup().await;
    let peer = app.signup().await;
    let id = app.create_document(&owner.token, "draft", "public").await;
    let uri = format!("/documents/{}", id);

    let (status, _) = app.put(&uri, Some(&peer.token), json!({ "title": "stolen" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&peer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&uri, Some(&owner.token), json!({ "ownerId": peer.id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Document Owner Cannot Be Changed");

    let (status, _) = app.put(&uri, Some(&owner.token), json!({ "access": "secret" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(&uri, Some(&owner.token), json!({ "title": "final", "access": "private" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "final");
    assert_eq!(body["access"], "private");
    assert_eq!(body["ownerId"], owner.id);

    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri, Some(&owner.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_document_validation() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app
        .post("/documents", Some(&account.token), json!({ "title": "t", "content": "c" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["access"], "public");
    assert_eq!(body["ownerId"], account.id);

    let (status, _) = app.post("/documents", Some(&account.token), json!({ "title": "t" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/documents", Some(&account.token), json!({ "title": " ", "content": "c" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/documents/xyz", Some(&account.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_list_rejects_unaddressable_offset() {
    let app = TestApp::new().await;
    let account = app.signup().await;

    let (status, body) = app
        .get("/documents?limit=1&offset=18446744073709551615", Some(&account.token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Offset");

    let (status, body) = app
        .get("/documents?limit=100&page=18446744073709551615", Some(&account.token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Page");
}

#[tokio::test]
async fn test_document_search() {
    let app = TestApp::new().await;
    let account = app.signup().await;
    app.create_document(&account.token, "Quarterly report", "public").await;
    app.create_document(&account.token, "Shopping list", "public").await;

    let (status, body) = app.get("/documents?search=REPORT", Some(&account.token)).await;
    assert_eq!(status, StatusCode::OK);
    let docs = body["documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["title"], "Quarterly report");
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}
