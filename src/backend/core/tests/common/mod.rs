//! Shared harness: the full router over an in-memory store.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use docvault_core::api::{build_router, AppState};
use docvault_core::auth::TokenConfig;
use docvault_core::config::AdminConfig;
use docvault_core::store::{seed_admin, DynStore, MemoryStore};

pub const SECRET: &str = "integration-secret-integration-secret";
pub const ADMIN_EMAIL: &str = "admin@docvault.local";
pub const ADMIN_PASSWORD: &str = "admin set password";

pub struct TestApp {
    pub router: Router,
    pub store: DynStore,
}

/// A signed-up account.
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestApp {
    /// Router over a fresh store with the admin seeded as user 1.
    pub async fn new() -> Self {
        let store: DynStore = Arc::new(MemoryStore::new());
        let admin = AdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password: Some(ADMIN_PASSWORD.to_string()),
            ..AdminConfig::default()
        };
        seed_admin(store.as_ref(), &admin).await.unwrap();

        let state = AppState::new(store.clone(), TokenConfig::builder().secret(SECRET).build()).unwrap();
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("x-access-token", token);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post("/users/login", None, json!({ "email": email, "password": password }))
            .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Sign up a random regular user.
    pub async fn signup(&self) -> Account {
        let email = format!(
            "{}.{}",
            uuid::Uuid::new_v4().simple(),
            SafeEmail().fake::<String>()
        );
        let password = "pw123456".to_string();
        let first: String = FirstName().fake();
        let last: String = LastName().fake();

        let (status, body) = self
            .post(
                "/users",
                None,
                json!({
                    "email": email,
                    "password": password,
                    "firstName": first,
                    "lastName": last,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);

        Account {
            id: body["id"].as_i64().unwrap(),
            email: email.to_lowercase(),
            password,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a document owned by the token's user; returns its id.
    pub async fn create_document(&self, token: &str, title: &str, access: &str) -> i64 {
        let (status, body) = self
            .post(
                "/documents",
                Some(token),
                json!({ "title": title, "content": format!("{} body", title), "access": access }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }
}
