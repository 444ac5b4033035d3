//! Policy inputs: the acting identity and the user actions it can request.

use serde::Serialize;
use std::fmt;

use super::roles::Role;

/// The authenticated identity making a request.
///
/// Built by session verification with the role as currently stored, so a
/// promotion or demotion applies from the next request on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: i64,
    #[serde(rename = "roleId")]
    pub role: Role,
}

impl Actor {
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub const fn is(&self, user_id: i64) -> bool {
        self.id == user_id
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {} ({})", self.id, self.role)
    }
}

/// Mutations an actor can request on a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Change profile fields or password.
    Update,
    /// Change the account's role.
    ChangeRole,
    Delete,
}

impl UserAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::ChangeRole => "change_role",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
