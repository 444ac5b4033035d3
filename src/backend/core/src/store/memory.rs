//! In-memory [`Store`] used by tests and when no database is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::Store;
use crate::error::{DocvaultError, Result};
use crate::models::{
    Document, DocumentChanges, NewDocument, NewUser, User, UserChanges, UserQuery,
};
use crate::policy::Access;

/// Document row as stored; the owner's role is joined in on read.
#[derive(Debug, Clone)]
struct DocumentRecord {
    id: i64,
    title: String,
    content: String,
    access: Access,
    owner_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    documents: BTreeMap<i64, DocumentRecord>,
    next_user_id: i64,
    next_document_id: i64,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }

    fn join(&self, record: &DocumentRecord) -> Document {
        let owner_role = self
            .users
            .get(&record.owner_id)
            .map(|u| u.role)
            .unwrap_or_default();

        Document {
            id: record.id,
            title: record.title.clone(),
            content: record.content.clone(),
            access: record.access,
            owner_id: record.owner_id,
            owner_role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    fn documents_where(&self, keep: impl Fn(&DocumentRecord) -> bool) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .documents
            .values()
            .filter(|r| keep(r))
            .map(|r| self.join(r))
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        docs
    }
}

/// Process-local store guarded by a single `RwLock`.
///
/// Writes are serialized; concurrent token updates for the same user are
/// last-write-wins.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_user_id: 1,
                next_document_id: 1,
                ..State::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let mut state = self.state.write();
        if state.email_taken(&user.email, None) {
            return Err(DocvaultError::duplicate("users_email_key"));
        }

        let id = state.next_user_id;
        state.next_user_id += 1;

        let now = Utc::now();
        let stored = User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            active_token: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.state.read().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self, query: &UserQuery) -> Result<(Vec<User>, u64)> {
        let state = self.state.read();
        let mut matching: Vec<&User> = state.users.values().filter(|u| query.matches(u)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let mut state = self.state.write();
        if let Some(ref email) = changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(DocvaultError::duplicate("users_email_key"));
            }
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(first) = changes.first_name {
            user.first_name = first;
        }
        if let Some(last) = changes.last_name {
            user.last_name = last;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write();
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.documents.retain(|_, d| d.owner_id != id);
        Ok(true)
    }

    async fn set_active_token(&self, id: i64, token: Option<String>) -> Result<bool> {
        let mut state = self.state.write();
        match state.users.get_mut(&id) {
            Some(user) => {
                user.active_token = token;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn user_count(&self) -> Result<u64> {
        Ok(self.state.read().users.len() as u64)
    }

    async fn insert_document(&self, doc: NewDocument) -> Result<Document> {
        let mut state = self.state.write();
        if !state.users.contains_key(&doc.owner_id) {
            return Err(DocvaultError::entity_not_found("user", doc.owner_id));
        }

        let id = state.next_document_id;
        state.next_document_id += 1;

        let now = Utc::now();
        let record = DocumentRecord {
            id,
            title: doc.title,
            content: doc.content,
            access: doc.access,
            owner_id: doc.owner_id,
            created_at: now,
            updated_at: now,
        };
        let joined = state.join(&record);
        state.documents.insert(id, record);
        Ok(joined)
    }

    async fn find_document(&self, id: i64) -> Result<Option<Document>> {
        let state = self.state.read();
        Ok(state.documents.get(&id).map(|r| state.join(r)))
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.state.read().documents_where(|_| true))
    }

    async fn list_documents_by_owner(&self, owner_id: i64) -> Result<Vec<Document>> {
        Ok(self.state.read().documents_where(|d| d.owner_id == owner_id))
    }

    async fn update_document(&self, id: i64, changes: DocumentChanges) -> Result<Option<Document>> {
        let mut state = self.state.write();
        let Some(record) = state.documents.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(content) = changes.content {
            record.content = content;
        }
        if let Some(access) = changes.access {
            record.access = access;
        }
        record.updated_at = Utc::now();

        let record = record.clone();
        Ok(Some(state.join(&record)))
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().documents.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
