//! Document commands.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use super::{list_query, PageInfo};
use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AccessArg {
    Public,
    Private,
    Role,
}

impl AccessArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Role => "role",
        }
    }
}

#[derive(Subcommand)]
pub enum DocCommands {
    /// List documents visible to you
    List {
        #[arg(short, long)]
        limit: Option<u64>,
        #[arg(long)]
        offset: Option<u64>,
        #[arg(short, long)]
        page: Option<u64>,
        /// Match against title and content
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a document
    Get { id: i64 },

    /// Create a document
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        #[arg(short, long, value_enum, default_value = "public")]
        access: AccessArg,
    },

    /// Update a document you own
    Update {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long, value_enum)]
        access: Option<AccessArg>,
    },

    /// Delete a document you own
    Delete {
        id: i64,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub access: String,
    pub owner_id: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Tabled)]
pub struct DocumentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Access")]
    access: String,
    #[tabled(rename = "Owner")]
    owner_id: i64,
    #[tabled(rename = "Updated")]
    updated_at: String,
}

impl From<&DocumentInfo> for DocumentRow {
    fn from(d: &DocumentInfo) -> Self {
        Self {
            id: d.id,
            title: output::truncate(&d.title, 40),
            access: d.access.clone(),
            owner_id: d.owner_id,
            updated_at: output::short_time(&d.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct DocumentList {
    documents: Vec<DocumentInfo>,
    pagination: PageInfo,
}

pub async fn execute(cmd: DocCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        DocCommands::List {
            limit,
            offset,
            page,
            search,
        } => {
            let path = format!("/documents{}", list_query(limit, offset, page, search.as_deref()));
            let resp: DocumentList = client.get(&path).await?;

            let rows: Vec<DocumentRow> = resp.documents.iter().map(DocumentRow::from).collect();
            output::print_list(&rows, &resp, format)?;
            if format == OutputFormat::Table {
                output::print_info(&resp.pagination.summary());
            }
        }

        DocCommands::Get { id } => {
            let doc: DocumentInfo = client.get(&format!("/documents/{}", id)).await?;
            match format {
                OutputFormat::Table => print_document(&doc),
                _ => output::print_item(&doc, format)?,
            }
        }

        DocCommands::Create {
            title,
            content,
            access,
        } => {
            let body = serde_json::json!({
                "title": title,
                "content": content,
                "access": access.as_str(),
            });
            let doc: DocumentInfo = client.post("/documents", &body).await?;

            match format {
                OutputFormat::Table => {
                    output::print_success("Document created");
                    output::print_detail("ID", &doc.id.to_string());
                    output::print_detail("Access", &doc.access);
                }
                _ => output::print_item(&doc, format)?,
            }
        }

        DocCommands::Update {
            id,
            title,
            content,
            access,
        } => {
            let mut body = Map::new();
            if let Some(title) = title {
                body.insert("title".into(), Value::from(title));
            }
            if let Some(content) = content {
                body.insert("content".into(), Value::from(content));
            }
            if let Some(access) = access {
                body.insert("access".into(), Value::from(access.as_str()));
            }

            let doc: DocumentInfo = client.put(&format!("/documents/{}", id), &body).await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Document {} updated", id));
                    print_document(&doc);
                }
                _ => output::print_item(&doc, format)?,
            }
        }

        DocCommands::Delete { id, force } => {
            if !force {
                output::print_info(&format!(
                    "This will permanently delete document {}. Use --force to skip confirmation.",
                    id
                ));
                return Ok(());
            }

            let resp: Value = client.delete(&format!("/documents/{}", id)).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!("Document {} deleted", id)),
                _ => output::print_item(&resp, format)?,
            }
        }
    }

    Ok(())
}

fn print_document(doc: &DocumentInfo) {
    output::print_header(&doc.title);
    output::print_detail("ID", &doc.id.to_string());
    output::print_detail("Access", &doc.access);
    output::print_detail("Owner", &doc.owner_id.to_string());
    output::print_detail("Updated", &doc.updated_at);
    println!();
    println!("{}", doc.content);
}
