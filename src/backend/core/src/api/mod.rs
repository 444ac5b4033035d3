//! HTTP API.
//!
//! Routes:
//!
//! | Method | Path | Session |
//! |---|---|---|
//! | POST | /users | no |
//! | POST | /users/login | no |
//! | POST | /users/logout | yes |
//! | GET | /users | yes (admin) |
//! | GET, PUT, DELETE | /users/:id | yes |
//! | GET | /users/:id/documents | yes |
//! | GET, POST | /documents | yes |
//! | GET, PUT, DELETE | /documents/:id | yes |
//! | GET | /health, /metrics | no |

pub mod documents;
pub mod extract;
pub mod health;
pub mod users;

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::auth::{TokenConfig, TokenService};
use crate::error::Result;
use crate::middleware::SessionLayer;
use crate::store::DynStore;
use crate::telemetry::SensitiveFieldRedactor;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: DynStore, token_config: TokenConfig) -> Result<Self> {
        let tokens = Arc::new(TokenService::new(token_config, store.clone())?);
        Ok(Self { store, tokens })
    }
}

/// Build the router with all routes and middleware.
///
/// ```rust,ignore
/// let state = AppState::new(store, TokenConfig::from(&config.auth))?;
/// let app = build_router(state);
/// ```
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/logout", post(users::logout))
        .route(
            "/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/users/:id/documents", get(users::user_documents))
        .route(
            "/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/documents/:id",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        .route_layer(SessionLayer::new(state.tokens.clone()));

    let public = Router::new()
        .route("/users", post(users::signup))
        .route("/users/login", post(users::login))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::prometheus_metrics));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %SensitiveFieldRedactor::global().redact_uri(request.uri()),
            request_id = %request_id,
        )
    });

    public.merge(protected).with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(trace)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CompressionLayer::new())
            .layer(cors),
    )
}
