#![allow(clippy::result_large_err)]
//! # Docvault Core
//!
//! Document management with token sessions and an access policy.
//!
//! ## Architecture
//!
//! - **Auth**: argon2 password hashing and single-session JWTs
//! - **Policy**: pure allow/deny decisions over actors, users and documents
//! - **Store**: persistence trait with in-memory and PostgreSQL backends
//! - **Middleware**: session mediation that attaches the verified actor
//! - **API**: axum routes for users, documents and operations
//! - **Telemetry**: structured logging with redaction and Prometheus metrics

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod policy;
pub mod store;
pub mod telemetry;

pub use error::{DocvaultError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{build_router, AppState};
    pub use crate::auth::{Claims, Session, TokenConfig, TokenService};
    pub use crate::config::Config;
    pub use crate::error::{DocvaultError, ErrorCode, ErrorContext, Result};
    pub use crate::models::{Document, PublicUser, User};
    pub use crate::pagination::{ListQuery, OffsetPagination, PageMetadata};
    pub use crate::policy::{Access, Actor, PolicyDecision, Role, UserAction};
    pub use crate::store::{DynStore, MemoryStore, Store};
}
