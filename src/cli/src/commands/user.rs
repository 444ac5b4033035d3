//! User management commands.

use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use super::doc::{DocumentInfo, DocumentRow};
use super::{list_query, PageInfo, UserInfo};
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users (admin only)
    List {
        #[arg(short, long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
        #[arg(short, long)]
        page: Option<u64>,
        /// Match against email and names
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a user
    Get { id: i64 },

    /// Update a user
    Update {
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Role id: 1 admin, 2 regular
        #[arg(long)]
        role: Option<i64>,
    },

    /// Delete a user
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// List a user's documents visible to you
    Documents { id: i64 },
}

#[derive(Debug, Deserialize, Serialize)]
struct UserList {
    users: Vec<UserInfo>,
    pagination: PageInfo,
}

#[derive(Debug, Deserialize, Serialize)]
struct UserDocuments {
    #[serde(flatten)]
    user: UserInfo,
    documents: Vec<DocumentInfo>,
}

#[derive(Debug, Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&UserInfo> for UserRow {
    fn from(u: &UserInfo) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: format!("{} {}", u.first_name, u.last_name),
            role: u.role_name().to_string(),
            created_at: output::short_time(&u.created_at),
        }
    }
}

pub async fn execute(cmd: UserCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        UserCommands::List {
            limit,
            offset,
            page,
            search,
        } => {
            let path = format!("/users{}", list_query(limit, offset, page, search.as_deref()));
            let resp: UserList = client.get(&path).await?;

            let rows: Vec<UserRow> = resp.users.iter().map(UserRow::from).collect();
            output::print_list(&rows, &resp, format)?;
            if format == OutputFormat::Table {
                output::print_info(&resp.pagination.summary());
            }
        }

        UserCommands::Get { id } => {
            let user: UserInfo = client.get(&format!("/users/{}", id)).await?;
            match format {
                OutputFormat::Table => print_user(&user),
                _ => output::print_item(&user, format)?,
            }
        }

        UserCommands::Update {
            id,
            email,
            password,
            first_name,
            last_name,
            role,
        } => {
            let mut body = Map::new();
            let fields = [
                ("email", email.map(Value::from)),
                ("password", password.map(Value::from)),
                ("firstName", first_name.map(Value::from)),
                ("lastName", last_name.map(Value::from)),
                ("roleId", role.map(Value::from)),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    body.insert(key.to_string(), value);
                }
            }

            let user: UserInfo = client.put(&format!("/users/{}", id), &body).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("User {} updated", id));
                    print_user(&user);
                }
                _ => output::print_item(&user, format)?,
            }
        }

        UserCommands::Delete { id, force } => {
            if !force {
                output::print_info(&format!(
                    "This will permanently delete user {} and their documents. Use --force to skip confirmation.",
                    id
                ));
                return Ok(());
            }

            let resp: Value = client.delete(&format!("/users/{}", id)).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!("User {} deleted", id)),
                _ => output::print_item(&resp, format)?,
            }
        }

        UserCommands::Documents { id } => {
            let resp: UserDocuments = client.get(&format!("/users/{}/documents", id)).await?;
            if format == OutputFormat::Table {
                output::print_header(&format!("Documents of {}", resp.user.email));
            }
            let rows: Vec<DocumentRow> = resp.documents.iter().map(DocumentRow::from).collect();
            output::print_list(&rows, &resp, format)?;
        }
    }

    Ok(())
}

fn print_user(user: &UserInfo) {
    output::print_header(&format!("User: {}", user.id));
    output::print_detail("Email", &user.email);
    output::print_detail("Name", &format!("{} {}", user.first_name, user.last_name));
    output::print_detail("Role", user.role_name());
    output::print_detail("Created", &user.created_at);
}
