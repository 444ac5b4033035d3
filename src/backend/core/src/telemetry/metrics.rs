//! Prometheus metrics for authentication, policy decisions and errors.
//!
//! Counters are recorded through the `metrics` facade; when the exporter is
//! installed they are rendered at `GET /metrics`.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Installed Prometheus handle, set once by [`init_metrics`].
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,

    /// Global labels to add to all metrics
    #[serde(default)]
    pub global_labels: HashMap<String, String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            global_labels: HashMap::new(),
        }
    }
}

fn default_metrics_enabled() -> bool {
    true
}

/// Access to the process-wide exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRegistry;

impl MetricsRegistry {
    /// Whether an exporter has been installed.
    pub fn is_installed() -> bool {
        PROMETHEUS_HANDLE.get().is_some()
    }

    /// Render all metrics in Prometheus text format. Empty when not installed.
    pub fn render() -> String {
        PROMETHEUS_HANDLE
            .get()
            .map(|h| h.render())
            .unwrap_or_default()
    }
}

/// Initialize the metrics subsystem.
///
/// # Errors
///
/// Returns an error if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig, service_name: &str) -> anyhow::Result<()> {
    if !config.enabled {
        tracing::info!("Metrics disabled");
        return Ok(());
    }

    let mut builder = PrometheusBuilder::new();
    for (key, value) in &config.global_labels {
        builder = builder.add_global_label(key, value);
    }

    let handle = builder.install_recorder()?;
    let _ = PROMETHEUS_HANDLE.set(handle);

    register_metric_descriptions();

    tracing::info!(service_name = %service_name, "Metrics initialized");
    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!("docvault_errors_total", "Error responses by code and category");
    describe_counter!(
        "docvault_auth_failures_total",
        "Rejected requests on protected routes by reason"
    );
    describe_counter!(
        "docvault_auth_success_total",
        "Requests whose token was accepted"
    );
    describe_counter!(
        "docvault_policy_denials_total",
        "Access policy denials by rule"
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Recorders
// ═══════════════════════════════════════════════════════════════════════════════

/// Session authentication outcomes.
pub struct AuthMetrics;

impl AuthMetrics {
    pub fn success() {
        counter!("docvault_auth_success_total").increment(1);
    }

    /// `reason` is one of `missing`, `invalid`, `revoked`.
    pub fn failure(reason: &'static str) {
        counter!("docvault_auth_failures_total", "reason" => reason).increment(1);
    }
}

/// Access policy denials.
pub struct PolicyMetrics;

impl PolicyMetrics {
    pub fn denied(rule: &'static str) {
        counter!("docvault_policy_denials_total", "rule" => rule).increment(1);
    }
}
