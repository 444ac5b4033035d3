//! Session commands: signup, login, logout and whoami.
//!
//! A successful signup or login stores the returned token in the CLI config.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{config, UserInfo};
use crate::client::{ApiClient, ClientError};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "DOCVAULT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Log in and save the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "DOCVAULT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,
}

#[derive(Debug, Deserialize, Serialize)]
struct SignupResponse {
    message: String,
    #[serde(flatten)]
    user: UserInfo,
    token: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct LoginResponse {
    message: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(rename = "userId")]
    user_id: i64,
}

/// Read the user id from a token's payload without verifying it.
pub fn token_user_id(token: &str) -> Result<i64> {
    let payload = token.split('.').nth(1).context("Malformed session token")?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .context("Malformed session token")?;
    let claims: TokenPayload = serde_json::from_slice(&bytes).context("Malformed session token")?;
    Ok(claims.user_id)
}

pub async fn execute(cmd: AuthCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        AuthCommands::Signup {
            email,
            password,
            first_name,
            last_name,
        } => {
            let body = json!({
                "email": email,
                "password": password,
                "firstName": first_name,
                "lastName": last_name,
            });
            let resp: SignupResponse = client.post_public("/users", &body).await?;
            config::save_token(&resp.token)?;

            match format {
                OutputFormat::Table => {
                    output::print_success(&resp.message);
                    output::print_detail("ID", &resp.user.id.to_string());
                    output::print_detail("Email", &resp.user.email);
                }
                _ => output::print_item(&resp.user, format)?,
            }
        }

        AuthCommands::Login { email, password } => {
            let body = json!({ "email": email, "password": password });
            let resp: LoginResponse = client.post_public("/users/login", &body).await?;
            config::save_token(&resp.token)?;

            match format {
                OutputFormat::Table => output::print_success(&resp.message),
                _ => output::print_item(&json!({ "message": resp.message }), format)?,
            }
        }

        AuthCommands::Logout => {
            let result: Result<Value> = client.post("/users/logout", &json!({})).await;
            // The local token is dropped even when the server already revoked it.
            config::clear_token()?;
            let resp = result?;

            match format {
                OutputFormat::Table => output::print_success("Logged out"),
                _ => output::print_item(&resp, format)?,
            }
        }

        AuthCommands::Whoami => {
            let token = client.token().ok_or(ClientError::NotLoggedIn)?;
            let id = token_user_id(token)?;
            let user: UserInfo = client.get(&format!("/users/{}", id)).await?;

            match format {
                OutputFormat::Table => {
                    output::print_header("Current User");
                    output::print_detail("ID", &user.id.to_string());
                    output::print_detail("Email", &user.email);
                    output::print_detail("Name", &format!("{} {}", user.first_name, user.last_name));
                    output::print_detail("Role", user.role_name());
                }
                _ => output::print_item(&user, format)?,
            }
        }
    }

    Ok(())
}
