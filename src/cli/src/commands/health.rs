//! Health check command.
//!
//! Queries the `/health` endpoint and displays server status.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct HealthArgs {
    /// Also fetch the Prometheus metrics exposition
    #[arg(short, long)]
    metrics: bool,
}

pub async fn execute(args: HealthArgs, client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: Value = client.get_public("/health").await?;
    let field = |key: &str| health.get(key).and_then(Value::as_str).map(str::to_string);

    match format {
        OutputFormat::Table => {
            let status = field("status").unwrap_or_else(|| "unknown".to_string());

            output::print_header("Server Health");
            output::print_detail("Status", &status);
            output::print_detail("API URL", client.base_url());
            for (label, key) in [("Version", "version"), ("Store", "store"), ("Timestamp", "timestamp")] {
                if let Some(value) = field(key) {
                    output::print_detail(label, &value);
                }
            }

            if status == "healthy" {
                output::print_success("Server operational");
            } else {
                output::print_error(&format!("Server status: {}", status));
            }
        }
        _ => output::print_item(&health, format)?,
    }

    if args.metrics {
        match client.get_text("/metrics").await {
            Ok(text) => {
                println!();
                print!("{}", text);
            }
            Err(e) => output::print_info(&format!("Metrics unavailable: {:#}", e)),
        }
    }

    Ok(())
}
