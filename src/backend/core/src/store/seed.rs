//! Startup seeding of the administrator account.

use tracing::{info, warn};

use super::Store;
use crate::auth::password;
use crate::config::AdminConfig;
use crate::error::Result;
use crate::models::{NewUser, User};
use crate::policy::Role;

/// Create the configured admin account unless one with that email exists.
///
/// On an empty store the seeded admin receives id 1. Returns the created
/// user, or `None` when nothing was inserted.
pub async fn seed_admin(store: &dyn Store, admin: &AdminConfig) -> Result<Option<User>> {
    let Some(ref password) = admin.password else {
        warn!("admin.password not set; no administrator account seeded");
        return Ok(None);
    };

    let email = admin.email.trim().to_lowercase();
    if let Some(existing) = store.find_user_by_email(&email).await? {
        if !existing.is_admin() {
            warn!(user_id = existing.id, "Seed admin email belongs to a regular account");
        }
        return Ok(None);
    }

    let password_hash = password::hash_password(password)?;
    let user = store
        .insert_user(NewUser {
            email,
            password_hash,
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            role: Role::Admin,
        })
        .await?;

    info!(user_id = user.id, "Seeded administrator account");
    Ok(Some(user))
}
