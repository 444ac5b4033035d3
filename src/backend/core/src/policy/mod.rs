//! Access control for users and documents.
//!
//! This module provides:
//! - **Roles**: `Role::{Admin, Regular}` and document `Access` levels
//! - **Models**: the authenticated `Actor` and the `UserAction`s it can request
//! - **Engine**: pure allow/deny decisions with `enforce_*` wrappers mapping a
//!   denial to `Forbidden`
//! - **Payloads**: validation of client-supplied user and document bodies
//!
//! # Usage
//!
//! ```rust,ignore
//! use docvault_core::policy::{self, UserAction};
//!
//! let target = store.find_user(id).await?.ok_or_else(DocvaultError::not_found)?;
//! policy::enforce_modify_user(&actor, &target, UserAction::Delete)?;
//! store.delete_user(id).await?;
//! ```

pub mod engine;
pub mod models;
pub mod payload;
pub mod roles;

pub use engine::{
    can_list_users, can_modify_document, can_modify_user, can_touch_account, can_view_document,
    enforce_list_users, enforce_modify_document, enforce_modify_user, enforce_touch_account,
    enforce_view_document, filter_visible, PolicyDecision,
};
pub use models::{Actor, UserAction};
pub use payload::{
    validate_document_payload, validate_user_mutation_payload, DocumentPayload, PayloadMode,
    Registration, UserPayload,
};
pub use roles::{Access, Role};
