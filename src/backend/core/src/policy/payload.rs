//! Validation of client-supplied user and document payloads.
//!
//! Payloads arrive as raw JSON objects so that forbidden keys (`id`,
//! `ownerId`) and badly typed values are reported precisely instead of being
//! silently dropped by deserialization.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use super::models::Actor;
use super::roles::{Access, Role};
use crate::auth::password::{MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};
use crate::error::{DocvaultError, Result};
use crate::telemetry::PolicyMetrics;

/// Email shape check: one `@`, no whitespace, a dot in the domain.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex")
});

// ═══════════════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════════════

/// A validated user payload. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

/// A complete sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl UserPayload {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
    }

    /// Require every field needed to create an account. A missing role
    /// defaults to regular.
    pub fn into_registration(self) -> Result<Registration> {
        Ok(Registration {
            email: self.email.ok_or_else(|| missing("email"))?,
            password: self.password.ok_or_else(|| missing("password"))?,
            first_name: self.first_name.ok_or_else(|| missing("firstName"))?,
            last_name: self.last_name.ok_or_else(|| missing("lastName"))?,
            role: self.role.unwrap_or_default(),
        })
    }
}

/// Validate a user creation (`actor = None`) or update payload.
///
/// - `id` is immutable: `ValidationError`.
/// - `roleId` must be 1 or 2: `ValidationError`.
/// - At creation, `roleId = 1` is `Forbidden`.
/// - On update, any `roleId` from a non-admin is `Forbidden`.
pub fn validate_user_mutation_payload(
    actor: Option<&Actor>,
    payload: &Map<String, Value>,
) -> Result<UserPayload> {
    if payload.contains_key("id") {
        return Err(DocvaultError::invalid_field("id", "User ID Cannot Be Changed"));
    }

    let role = match payload.get("roleId") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_i64()
                .and_then(Role::from_id)
                .ok_or_else(|| DocvaultError::invalid_field("roleId", "Invalid Role"))?,
        ),
    };

    if let Some(role) = role {
        match actor {
            None if role.is_admin() => {
                PolicyMetrics::denied("create_admin");
                return Err(DocvaultError::forbidden("Admin accounts cannot be created"));
            }
            Some(actor) if !actor.is_admin() => {
                PolicyMetrics::denied("change_role");
                return Err(DocvaultError::forbidden("Only admins can change roles"));
            }
            _ => {}
        }
    }

    let email = string_field(payload, "email")?
        .map(|e| e.trim().to_lowercase())
        .map(|e| {
            if EMAIL_REGEX.is_match(&e) {
                Ok(e)
            } else {
                Err(DocvaultError::invalid_field("email", "Invalid Email Address"))
            }
        })
        .transpose()?;

    let password = string_field(payload, "password")?
        .map(|p| {
            let len = p.chars().count();
            if (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
                Ok(p)
            } else {
                Err(DocvaultError::invalid_field(
                    "password",
                    format!(
                        "Password must be between {} and {} characters",
                        MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
                    ),
                ))
            }
        })
        .transpose()?;

    Ok(UserPayload {
        email,
        password,
        first_name: non_empty_field(payload, "firstName")?,
        last_name: non_empty_field(payload, "lastName")?,
        role,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Documents
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether a document payload creates or updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    Create,
    Update,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub access: Option<Access>,
}

impl DocumentPayload {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.access.is_none()
    }
}

/// Validate a document payload.
///
/// `id` and `ownerId` are immutable. `access` must name a known level. On
/// creation `title` and `content` are required; in any mode they may not be
/// blank.
pub fn validate_document_payload(
    payload: &Map<String, Value>,
    mode: PayloadMode,
) -> Result<DocumentPayload> {
    if payload.contains_key("id") {
        return Err(DocvaultError::invalid_field("id", "Document ID Cannot Be Changed"));
    }
    if payload.contains_key("ownerId") {
        return Err(DocvaultError::invalid_field(
            "ownerId",
            "Document Owner Cannot Be Changed",
        ));
    }

    let access = match payload.get("access") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_str()
                .and_then(|s| s.parse::<Access>().ok())
                .ok_or_else(|| DocvaultError::invalid_field("access", "Invalid Access Level"))?,
        ),
    };

    let title = non_empty_field(payload, "title")?;
    let content = string_field(payload, "content")?
        .map(|c| {
            if c.trim().is_empty() {
                Err(DocvaultError::invalid_field("content", "content cannot be empty"))
            } else {
                Ok(c)
            }
        })
        .transpose()?;

    if mode == PayloadMode::Create {
        if title.is_none() {
            return Err(missing("title"));
        }
        if content.is_none() {
            return Err(missing("content"));
        }
    }

    Ok(DocumentPayload {
        title,
        content,
        access,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Field helpers
// ─────────────────────────────────────────────────────────────────────────────

fn missing(field: &'static str) -> DocvaultError {
    DocvaultError::invalid_field(field, format!("{} is required", field))
}

fn string_field(payload: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DocvaultError::invalid_field(
            field,
            format!("{} must be a string", field),
        )),
    }
}

/// A trimmed string field that may not be blank when present.
fn non_empty_field(payload: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match string_field(payload, field)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Err(DocvaultError::invalid_field(
            field,
            format!("{} cannot be empty", field),
        )),
        Some(s) => Ok(Some(s.trim().to_string())),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
