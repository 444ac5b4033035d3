//! Query-string parameters shared by list endpoints.

use serde::{Deserialize, Serialize};

use super::offset::OffsetPagination;
use crate::error::{DocvaultError, Result};

/// Raw `?limit=&offset=&page=&search=` parameters.
///
/// Numbers are kept as strings so that a malformed value produces the
/// field-specific message ("Invalid Limit") instead of a generic
/// deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,

    /// 1-based alias for `offset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// Parse and validate the window.
    pub fn pagination(&self) -> Result<OffsetPagination> {
        let mut builder = OffsetPagination::builder();

        if let Some(limit) = parse(self.limit.as_deref(), "limit", "Invalid Limit")? {
            builder = builder.limit(limit);
        }
        if let Some(offset) = parse(self.offset.as_deref(), "offset", "Invalid Offset")? {
            builder = builder.offset(offset);
        }
        if let Some(page) = parse(self.page.as_deref(), "page", "Invalid Page")? {
            builder = builder.page(page);
        }

        builder.build_validated()
    }

    /// The search string, if it has any non-blank content.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Blank values count as absent.
fn parse(raw: Option<&str>, field: &str, message: &'static str) -> Result<Option<u64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| DocvaultError::invalid_field(field, message)),
    }
}
