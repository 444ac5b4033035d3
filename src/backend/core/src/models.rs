//! Domain entities: users and documents, plus their insert/update shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::{Access, Actor, Role};

// ═══════════════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════════════

/// A stored user account.
///
/// Deliberately not `Serialize`: the password hash and active token must never
/// leave the server. Use [`User::to_public`] for responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub active_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The identity this user acts as once authenticated.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fields safe to return to any authenticated client.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role_id: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public projection of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user to be inserted. The store assigns `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// A partial update to a user. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
    }
}

/// Filter and window for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive terms; a user matches when any term is a substring of
    /// its first name, last name or email.
    pub search_terms: Vec<String>,
    pub limit: u64,
    pub offset: u64,
}

impl UserQuery {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            search_terms: Vec::new(),
            limit,
            offset,
        }
    }

    /// Split a raw `search` parameter on whitespace.
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search_terms = search
            .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default();
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        if self.search_terms.is_empty() {
            return true;
        }

        let first = user.first_name.to_lowercase();
        let last = user.last_name.to_lowercase();
        let email = user.email.to_lowercase();

        self.search_terms
            .iter()
            .any(|t| first.contains(t) || last.contains(t) || email.contains(t))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Documents
// ═══════════════════════════════════════════════════════════════════════════════

/// A stored document.
///
/// `owner_role` is the owner's current role, joined in by the store so that
/// visibility can be decided without another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub access: Access,
    pub owner_id: i64,
    #[serde(skip)]
    pub owner_role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Whether `search` (case-insensitive) occurs in the title or content.
    pub fn mentions(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub access: Access,
    pub owner_id: i64,
}

/// A partial update to a document. The owner is immutable.
#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub access: Option<Access>,
}

impl DocumentChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.access.is_none()
    }
}
