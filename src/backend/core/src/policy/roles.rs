//! Roles and document visibility levels.
//!
//! | Role    | Wire id | Description                                        |
//! |---------|---------|----------------------------------------------------|
//! | Admin   | 1       | Sees every document, manages every regular account |
//! | Regular | 2       | Manages its own account and documents              |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Role
// ═══════════════════════════════════════════════════════════════════════════════

/// A user's role. Serialized as its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Role {
    Admin,
    #[default]
    Regular,
}

impl Role {
    /// Numeric id used on the wire and in the database.
    pub const fn id(self) -> i16 {
        match self {
            Self::Admin => 1,
            Self::Regular => 2,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Admin),
            2 => Some(Self::Regular),
            _ => None,
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Regular => "regular",
        }
    }

    pub fn all() -> [Role; 2] {
        [Self::Admin, Self::Regular]
    }
}

impl TryFrom<i64> for Role {
    type Error = String;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("unknown role id {}", id))
    }
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        i64::from(role.id())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Access
// ═══════════════════════════════════════════════════════════════════════════════

/// Visibility of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Any authenticated user.
    #[default]
    Public,
    /// Only the owner (and admins).
    Private,
    /// Users sharing the owner's role (and admins).
    Role,
}

impl Access {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Role => "role",
        }
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "role" => Ok(Self::Role),
            other => Err(format!("unknown access level '{}'", other)),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_ids() {
        assert_eq!(Role::Admin.id(), 1);
        assert_eq!(Role::Regular.id(), 2);
        assert_eq!(Role::from_id(1), Some(Role::Admin));
        assert_eq!(Role::from_id(10), None);
        assert_eq!(Role::default(), Role::Regular);
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "1");
        let role: Role = serde_json::from_str("2").unwrap();
        assert_eq!(role, Role::Regular);
        assert!(serde_json::from_str::<Role>("10").is_err());
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_access_parse() {
        assert_eq!("role".parse::<Access>().unwrap(), Access::Role);
        assert!("Public".parse::<Access>().is_err());
        assert_eq!(serde_json::to_string(&Access::Private).unwrap(), "\"private\"");
        assert_eq!(Access::default(), Access::Public);
    }
}
