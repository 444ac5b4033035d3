//! Document handlers.

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
use crate::error::{DocvaultError, Result};
use crate::models::{Document, DocumentChanges, NewDocument};
use crate::pagination::{ListQuery, PageMetadata};
use crate::policy::{self, Actor, PayloadMode};

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
    pub pagination: PageMetadata,
}

/// `GET /documents`
///
/// Visibility is decided per document, so the window is applied after
/// filtering.
pub async fn list_documents(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<Json<DocumentListResponse>> {
    let pagination = query.pagination()?;

    let mut visible = policy::filter_visible(&actor, state.store.list_documents().await?);
    if let Some(search) = query.search() {
        visible.retain(|doc| doc.mentions(search));
    }

    Ok(Json(DocumentListResponse {
        documents: pagination.paginate_slice(&visible),
        pagination: pagination.metadata(visible.len() as u64),
    }))
}

/// `GET /documents/:id`
pub async fn get_document(
    State(state): State<AppState>,
    actor: Actor,
    PathId(id): PathId,
) -> Result<Json<Document>> {
    let doc = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;
    policy::enforce_view_document(&actor, &doc)?;

    Ok(Json(doc))
}

/// `POST /documents`
pub async fn create_document(
    State(state): State<AppState>,
    actor: Actor,
    ValidJson(body): ValidJson,
) -> Result<impl IntoResponse> {
    let payload = policy::validate_document_payload(&body, PayloadMode::Create)?;
    let (Some(title), Some(content)) = (payload.title, payload.content) else {
        return Err(DocvaultError::validation("Title and content are required"));
    };

    let doc = state
        .store
        .insert_document(NewDocument {
            title,
            content,
            access: payload.access.unwrap_or_default(),
            owner_id: actor.id,
        })
        .await?;

    info!(document_id = doc.id, actor = %actor, "Document created");
    Ok((StatusCode::CREATED, Json(doc)))
}

/// `PUT /documents/:id`
pub async fn update_document(
    State(state): State<AppState>,
    actor: Actor,
    PathId(id): PathId,
    ValidJson(body): ValidJson,
) -> Result<Json<Document>> {
    let payload = policy::validate_document_payload(&body, PayloadMode::Update)?;
    if payload.is_empty() {
        return Err(DocvaultError::validation("No Fields To Update"));
    }

    let doc = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;
    policy::enforce_modify_document(&actor, &doc)?;

    let updated = state
        .store
        .update_document(
            id,
            DocumentChanges {
                title: payload.title,
                content: payload.content,
                access: payload.access,
            },
        )
        .await?
        .ok_or_else(DocvaultError::not_found)?;

    info!(document_id = id, actor = %actor, "Document updated");
    Ok(Json(updated))
}

/// `DELETE /documents/:id`
pub async fn delete_document(
    State(state): State<AppState>,
    actor: Actor,
    PathId(id): PathId,
) -> Result<Json<Value>> {
    let doc = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(DocvaultError::not_found)?;
    policy::enforce_modify_document(&actor, &doc)?;

    if !state.store.delete_document(id).await? {
        return Err(DocvaultError::not_found());
    }

    info!(document_id = id, actor = %actor, "Document deleted");
    Ok(Json(json!({ "message": "Document Deleted" })))
}
