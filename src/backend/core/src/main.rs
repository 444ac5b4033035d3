//! Docvault Server - Main entry point

use clap::Parser;
use std::sync::Arc;

use docvault_core::{
    api::{self, AppState},
    auth::TokenConfig,
    config::Config,
    db::PgStore,
    store::{self, DynStore, MemoryStore},
    telemetry,
};

#[derive(Parser, Debug)]
#[command(name = "docvault-server", version, about = "Docvault document service")]
struct Args {
    /// TOML config file; environment variables (DOCVAULT__*) override it
    #[arg(short, long, env = "DOCVAULT_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    telemetry::init_telemetry(&config)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Docvault server");

    let store: DynStore = match config.database.url {
        Some(_) => {
            let pg = PgStore::connect(&config.database).await?;
            pg.migrate().await?;
            tracing::info!("Database migrations applied");
            Arc::new(pg)
        }
        None => {
            tracing::warn!("database.url not set; using the in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    store::seed_admin(store.as_ref(), &config.admin).await?;

    let state = AppState::new(store, TokenConfig::from(&config.auth))?;
    let app = api::build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
