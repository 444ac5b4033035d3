//! Persistence port.
//!
//! Handlers and the token service reach storage only through [`Store`]. Two
//! implementations ship with the crate: [`memory::MemoryStore`] for tests and
//! database-less runs, and [`crate::db::PgStore`] for PostgreSQL.

pub mod memory;
pub mod seed;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{
    Document, DocumentChanges, NewDocument, NewUser, User, UserChanges, UserQuery,
};

pub use memory::MemoryStore;
pub use seed::seed_admin;

/// Shared handle to the active store.
pub type DynStore = Arc<dyn Store>;

/// Storage operations for users, sessions and documents.
///
/// Implementations must:
/// - treat emails as unique, case-insensitively, reporting a clash as a
///   `ValidationError`
/// - return lists newest first
/// - fill `Document::owner_role` with the owner's current role
/// - delete a user's documents together with the user
#[async_trait]
pub trait Store: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// One page of matching users and the total number of matches.
    async fn list_users(&self, query: &UserQuery) -> Result<(Vec<User>, u64)>;

    /// Apply `changes`; `None` when the user does not exist.
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;

    /// Delete the user and its documents; `false` when nothing was deleted.
    async fn delete_user(&self, id: i64) -> Result<bool>;

    /// Replace the user's active token; `false` when the user does not exist.
    async fn set_active_token(&self, id: i64, token: Option<String>) -> Result<bool>;

    async fn user_count(&self) -> Result<u64>;

    // ─────────────────────────────────────────────────────────────────────────
    // Documents
    // ─────────────────────────────────────────────────────────────────────────

    async fn insert_document(&self, doc: NewDocument) -> Result<Document>;

    async fn find_document(&self, id: i64) -> Result<Option<Document>>;

    async fn list_documents(&self) -> Result<Vec<Document>>;

    async fn list_documents_by_owner(&self, owner_id: i64) -> Result<Vec<Document>>;

    async fn update_document(&self, id: i64, changes: DocumentChanges) -> Result<Option<Document>>;

    async fn delete_document(&self, id: i64) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────

    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Short name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
