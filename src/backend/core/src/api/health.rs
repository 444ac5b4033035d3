//! Operational endpoints.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::error::DocvaultError;
use crate::telemetry::MetricsRegistry;

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, code) = match state.store.ping().await {
        Ok(()) => ("healthy", StatusCode::OK),
        Err(e) => {
            warn!(error = %e, backend = state.store.backend(), "Store ping failed");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "store": state.store.backend(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

/// `GET /metrics`
pub async fn prometheus_metrics() -> Result<impl IntoResponse, DocvaultError> {
    if !MetricsRegistry::is_installed() {
        return Err(DocvaultError::not_found().with_context("reason", "metrics disabled"));
    }

    Ok((
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        MetricsRegistry::render(),
    ))
}
