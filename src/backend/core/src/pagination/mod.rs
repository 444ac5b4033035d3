//! Limit/offset pagination for list endpoints.
//!
//! Clients send `limit` and `offset`, or `page` as a 1-based alias for
//! `offset = (page - 1) * limit`. Responses carry a [`PageMetadata`] block.
//!
//! ```rust,ignore
//! let pagination = ListQuery { limit: Some("5".into()), ..Default::default() }.pagination()?;
//! let items = pagination.paginate_slice(&visible);
//! let meta = pagination.metadata(visible.len() as u64);
//! ```

mod offset;
mod query;

pub use offset::{OffsetPagination, OffsetPaginationBuilder, PageMetadata, MAX_OFFSET};
pub use query::ListQuery;

/// Page size when `limit` is absent.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest accepted `limit`.
pub const MAX_PAGE_SIZE: u64 = 100;
