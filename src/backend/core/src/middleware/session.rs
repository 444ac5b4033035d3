//! Session mediation for protected routes.
//!
//! [`SessionLayer`] runs before every protected handler. It pulls the token
//! from the request, verifies it against the store through
//! [`TokenService::verify`], and attaches the resulting [`Actor`] to the
//! request extensions. Handlers take the [`Actor`] extractor and consult the
//! policy engine before mutating anything.
//!
//! Any failure ends the request with the matching error response; nothing is
//! retried.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::{
    fmt,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::debug;

use crate::auth::token::{Session, TokenService};
use crate::error::{DocvaultError, ErrorCode};
use crate::policy::Actor;
use crate::telemetry::{token_fingerprint, AuthMetrics};

/// Primary token header.
pub const TOKEN_HEADER: &str = "x-access-token";

// ═══════════════════════════════════════════════════════════════════════════════
// Request Stages
// ═══════════════════════════════════════════════════════════════════════════════

/// How far a request got through mediation. Recorded in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Unauthenticated,
    TokenExtracted,
    TokenValidated,
}

impl RequestStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::TokenExtracted => "token_extracted",
            Self::TokenValidated => "token_validated",
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the session token from `x-access-token`, else `Authorization: Bearer`.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let direct = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(token) = direct {
        return Some(token.to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").or_else(|| s.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Run the token through extraction and verification.
pub async fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> Result<Session, DocvaultError> {
    let mut stage = RequestStage::Unauthenticated;
    let result = mediate(tokens, headers, &mut stage).await;

    match &result {
        Ok(session) => {
            AuthMetrics::success();
            debug!(stage = %stage, actor = %session.actor, "Session verified");
        }
        Err(e) => {
            AuthMetrics::failure(failure_reason(e.code()));
            debug!(stage = %stage, code = %e.code(), "Session rejected");
        }
    }

    result
}

async fn mediate(
    tokens: &TokenService,
    headers: &HeaderMap,
    stage: &mut RequestStage,
) -> Result<Session, DocvaultError> {
    let token = extract_token(headers).ok_or_else(DocvaultError::authentication_required)?;
    *stage = RequestStage::TokenExtracted;

    let session = tokens.verify(&token).await.map_err(|e| {
        debug!(token = %token_fingerprint(&token), code = %e.code(), "Token verification failed");
        e
    })?;
    *stage = RequestStage::TokenValidated;

    Ok(session)
}

fn failure_reason(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::AuthenticationRequired => "missing",
        ErrorCode::InvalidToken => "invalid",
        ErrorCode::RevokedToken => "revoked",
        _ => "error",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer
// ═══════════════════════════════════════════════════════════════════════════════

/// Requires a valid session on every request it wraps.
#[derive(Clone)]
pub struct SessionLayer {
    tokens: Arc<TokenService>,
}

impl SessionLayer {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            tokens: self.tokens.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionService<S> {
    inner: S,
    tokens: Arc<TokenService>,
}

impl<S> Service<Request<Body>> for SessionService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let tokens = self.tokens.clone();
        // Swap so the clone that was polled ready is the one we call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match authenticate(&tokens, request.headers()).await {
                Ok(session) => {
                    request.extensions_mut().insert(session.actor);
                    request.extensions_mut().insert(session.claims);
                    inner.call(request).await
                }
                Err(e) => Ok(e.into_response()),
            }
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Axum Extractor
// ═══════════════════════════════════════════════════════════════════════════════

/// The verified actor of a protected request.
#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = DocvaultError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .copied()
            .ok_or_else(DocvaultError::authentication_required)
    }
}
