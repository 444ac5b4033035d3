//! Docvault CLI - command-line client for the Docvault API server.
//!
//! Provides session, user, document, health, and configuration commands.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{auth, config, doc, health, user};
use output::OutputFormat;

/// Docvault - document management with role-based access
#[derive(Parser)]
#[command(
    name = "docvault",
    version,
    about = "Docvault - document management with role-based access",
    long_about = "CLI tool for managing Docvault sessions, users, and documents.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// API server URL
    #[arg(long, global = true, env = "DOCVAULT_API_URL")]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Signup, login, logout
    #[command(subcommand)]
    Auth(auth::AuthCommands),

    /// User management
    #[command(subcommand)]
    User(user::UserCommands),

    /// Document management
    #[command(subcommand)]
    Doc(doc::DocCommands),

    /// Check server health
    Health(health::HealthArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api_url = cli
        .api_url
        .clone()
        .or_else(config::load_api_url)
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let client = client::ApiClient::new(&api_url, config::load_token())?;
    let format = cli.output;

    let result = match cli.command {
        Commands::Auth(cmd) => auth::execute(cmd, &client, format).await,
        Commands::User(cmd) => user::execute(cmd, &client, format).await,
        Commands::Doc(cmd) => doc::execute(cmd, &client, format).await,
        Commands::Health(args) => health::execute(args, &client, format).await,
        Commands::Config(cmd) => config::execute(cmd, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
