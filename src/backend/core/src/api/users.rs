//! User, session and per-user document handlers.
//!
//! Every handler validates its input and consults the policy engine before
//! it touches the store, and performs at most one store mutation.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::extract::{PathId, ValidJson};
use super::AppState;
use crate::auth::password;
use crate::error::{DocvaultError, Result};
use crate::models::{Document, NewUser, PublicUser, UserChanges, UserQuery};
use crate::pagination::{ListQuery, PageMetadata};
use crate::policy::{self, Actor, UserAction};
use crate::telemetry::AuthMetrics;

// ═══════════════════════════════════════════════════════════════════════════════
// Responses
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<PublicUser>,
    pub pagination: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct UserDocumentsResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub documents: Vec<Document>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sessions
// ═══════════════════════════════════════════════════════════════════════════════

/// `POST /users`
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(body): ValidJson,
) -> Result<impl IntoResponse> {
    let registration = policy::validate_user_mutation_payload(None, &body)?.into_registration()?;
    let password_hash = password::hash_password_blocking(registration.password).await?;

    let user = state
        .store
        .insert_user(NewUser {
            email: registration.email,
            password_hash,
            first_name: registration.first_name,
            last_name: registration.last_name,
            role: registration.role,
        })
        .await?;
    let token = state.tokens.issue(&user).await?;

    info!(user_id = user.id, "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "You have successfully signed up",
            user: user.to_public(),
            token,
        }),
    ))
}

/// `POST /users/login`
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson,
) -> Result<Json<LoginResponse>> {
    let credential = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let (Some(email), Some(password)) = (credential("email"), credential("password")) else {
        return Err(DocvaultError::validation("Missing Login Credentials"));
    };

    let Some(user) = state.store.find_user_by_email(&email.trim().to_lowercase()).await? else {
        AuthMetrics::failure("unknown_email");
        return Err(DocvaultError::not_found());
    };

    if !password::verify_password_blocking(password, user.password_hash.clone()).await? {
        AuthMetrics::failure("wrong_password");
        return Err(DocvaultError::invalid_credentials());
    }

    let token = state.tokens.issue(&user).await?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "You have successfully logged in",
        token,
    }))
}

/// `POST /users/logout`
pub async fn logout(State(state): State<AppState>, actor: Actor) -> Result<Json<Value>> {
    state.tokens.revoke(actor.id).await?;
    info!(user_id = actor.id, "User logged out");
    Ok(Json(json!({ "message": "Logout Successful" })))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════════════

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListResponse>> {
    policy::enforce_list_users(&actor)?;
    let pagination = query.pagination()?;

    let user_query = UserQuery::new(pagination.limit, pagination.offset).with_search(query.search());
    let (users, total) = state.store.list_users(&user_query).await?;
    if users.is_empty() {
        return Err(DocvaultError::not_found());
    }

    Ok(Json(UserListResponse {
        users: users.iter().map(|u| u.to_public()).collect(),
        pagination: pagination.metadata(total),
    }))
}

/// `GET /users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    _actor: Actor,
    PathId(id): PathId,
) -> Result<Json<PublicUser>> {
    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;

    Ok(Json(user.to_public()))
}

/// `PUT /users/:id`
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    PathId(id): PathId,
    ValidJson(body): ValidJson,
) -> Result<Json<PublicUser>> {
    let payload = policy::validate_user_mutation_payload(Some(&actor), &body)?;
    if payload.is_empty() {
        return Err(DocvaultError::validation("No Fields To Update"));
    }
    policy::enforce_touch_account(&actor, id)?;

    let target = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;

    // A present roleId is a role change even when it repeats the current role.
    let role = payload.role;
    if role.is_some() {
        policy::enforce_modify_user(&actor, &target, UserAction::ChangeRole)?;
    }
    policy::enforce_modify_user(&actor, &target, UserAction::Update)?;

    let password_hash = match payload.password {
        Some(password) => Some(password::hash_password_blocking(password).await?),
        None => None,
    };

    let updated = state
        .store
        .update_user(
            id,
            UserChanges {
                email: payload.email,
                password_hash,
                first_name: payload.first_name,
                last_name: payload.last_name,
                role,
            },
        )
        .await?
        .ok_or_else(DocvaultError::not_found)?;

    info!(user_id = id, actor = %actor, "User updated");
    Ok(Json(updated.to_public()))
}

/// `DELETE /users/:id`
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    PathId(id): PathId,
) -> Result<Json<Value>> {
    policy::enforce_touch_account(&actor, id)?;

    let target = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;
    policy::enforce_modify_user(&actor, &target, UserAction::Delete)?;

    if !state.store.delete_user(id).await? {
        return Err(DocvaultError::not_found());
    }

    info!(user_id = id, actor = %actor, "User deleted");
    Ok(Json(json!({ "message": "User Deleted" })))
}

/// `GET /users/:id/documents`
pub async fn user_documents(
    State(state): State<AppState>,
    actor: Actor,
    PathId(id): PathId,
) -> Result<Json<UserDocumentsResponse>> {
    let owner = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;

    let documents = state.store.list_documents_by_owner(id).await?;

    Ok(Json(UserDocumentsResponse {
        user: owner.to_public(),
        documents: policy::filter_visible(&actor, documents),
    }))
}
