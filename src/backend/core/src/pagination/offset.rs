//! Offset pagination and page metadata.

use serde::{Deserialize, Serialize};

use crate::error::{DocvaultError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// Page Metadata
// ═══════════════════════════════════════════════════════════════════════════════

/// Metadata about one window of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Number of matching items across all pages.
    pub total_count: u64,
    pub limit: u64,
    pub offset: u64,
    /// Current page (1-indexed).
    pub page: u64,
    /// Number of pages at this limit; at least 1.
    pub page_count: u64,
}

impl PageMetadata {
    pub fn new(limit: u64, offset: u64, total_count: u64) -> Self {
        let limit = limit.max(1);

        Self {
            total_count,
            limit,
            offset,
            page: (offset / limit).saturating_add(1),
            page_count: total_count.div_ceil(limit).max(1),
        }
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total_count
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Offset Pagination
// ═══════════════════════════════════════════════════════════════════════════════

/// A validated `limit`/`offset` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPagination {
    pub limit: u64,
    pub offset: u64,
}

impl OffsetPagination {
    /// Create a window, clamping `limit` into `1..=MAX_PAGE_SIZE`.
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: limit.clamp(1, super::MAX_PAGE_SIZE),
            offset,
        }
    }

    pub fn builder() -> OffsetPaginationBuilder {
        OffsetPaginationBuilder::default()
    }

    /// Window for the 1-based `page`.
    pub fn for_page(page: u64, limit: u64) -> Self {
        let pagination = Self::new(limit, 0);
        Self {
            offset: page.saturating_sub(1).saturating_mul(pagination.limit),
            ..pagination
        }
    }

    pub fn metadata(&self, total_count: u64) -> PageMetadata {
        PageMetadata::new(self.limit, self.offset, total_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit < 1 || self.limit > super::MAX_PAGE_SIZE {
            return Err(DocvaultError::invalid_field("limit", "Invalid Limit"));
        }
        Ok(())
    }

    /// Apply the window to an in-memory list.
    pub fn paginate_slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX);
        if start >= items.len() {
            return Vec::new();
        }

        let end = start.saturating_add(self.limit as usize).min(items.len());
        items[start..end].to_vec()
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self::new(super::DEFAULT_PAGE_SIZE, 0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Largest offset a store can address (`BIGINT`).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Default)]
pub struct OffsetPaginationBuilder {
    limit: Option<u64>,
    offset: Option<u64>,
    page: Option<u64>,
}

impl OffsetPaginationBuilder {
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Build without checks. `page` wins over `offset`.
    pub fn build(self) -> OffsetPagination {
        let limit = self.limit.unwrap_or(super::DEFAULT_PAGE_SIZE);
        match self.page {
            Some(page) => OffsetPagination::for_page(page, limit),
            None => OffsetPagination::new(limit, self.offset.unwrap_or(0)),
        }
    }

    /// Build, rejecting out-of-range values and a `page` given with an `offset`.
    pub fn build_validated(self) -> Result<OffsetPagination> {
        if let Some(limit) = self.limit {
            if limit < 1 || limit > super::MAX_PAGE_SIZE {
                return Err(DocvaultError::invalid_field("limit", "Invalid Limit"));
            }
        }

        match (self.page, self.offset) {
            (Some(_), Some(_)) => Err(DocvaultError::invalid_field(
                "page",
                "Specify either page or offset, not both",
            )),
            (Some(0), None) => Err(DocvaultError::invalid_field("page", "Invalid Page")),
            (None, Some(offset)) if offset > MAX_OFFSET => {
                Err(DocvaultError::invalid_field("offset", "Invalid Offset"))
            }
            _ => {
                let pagination = self.build();
                if pagination.offset > MAX_OFFSET {
                    return Err(DocvaultError::invalid_field("page", "Invalid Page"));
                }
                Ok(pagination)
            }
        }
    }
}
