//! Request extractors that reject with [`DocvaultError`] instead of axum's
//! plain-text rejections.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde_json::{Map, Value};

use crate::error::DocvaultError;

/// A JSON object body.
///
/// A missing or non-JSON content type, malformed JSON, or a body that is not
/// an object is a `ValidationError`.
#[derive(Debug, Clone)]
pub struct ValidJson(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for ValidJson
where
    S: Send + Sync,
{
    type Rejection = DocvaultError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                DocvaultError::with_internal(
                    crate::error::ErrorCode::ValidationError,
                    "Invalid Request Body",
                    rejection.body_text(),
                )
            })?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DocvaultError::validation("Request body must be a JSON object")),
        }
    }
}

/// A numeric `:id` path segment. Anything else is "Bad Request".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = DocvaultError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| DocvaultError::bad_request())?;

        parse_id(&raw).map(Self)
    }
}

/// Parse a positive integer id.
pub fn parse_id(raw: &str) -> Result<i64, DocvaultError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DocvaultError::bad_request().with_context("id", raw)),
    }
}
