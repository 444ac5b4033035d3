//! Telemetry: structured logging and Prometheus metrics.
//!
//! - **Logging**: JSON/pretty/compact output with sensitive data redaction
//! - **Metrics**: counters for authentication outcomes, policy denials and errors

pub mod logging;
pub mod metrics;

pub use logging::{
    init_logging, token_fingerprint, LogFormat, LoggingConfig, RedactionConfig,
    RedactionPattern, SensitiveFieldRedactor,
};
pub use metrics::{init_metrics, AuthMetrics, MetricsConfig, MetricsRegistry, PolicyMetrics};

use crate::config::Config;

/// Initialize logging and metrics from the application configuration.
///
/// Call once at startup, before anything logs.
pub fn init_telemetry(config: &Config) -> anyhow::Result<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics, env!("CARGO_PKG_NAME"))?;
    Ok(())
}
