//! Generic list controllers: the client-side data-synchronization core.
//!
//! Every list-driven view is built on one of two controllers sharing the
//! same request/response contracts:
//!
//! - [`PagedCollection`]: numbered pages with total count, jump-to-page
//!   navigation, debounced search, and first-page caching. Page-replacing.
//! - [`InfiniteCollection`]: cursor-style scroll-to-load feed. Append-only,
//!   with retry for transient failures.
//!
//! Both guarantee last-issued-wins: a fetch that resolves after a newer one
//! was issued for the same controller is discarded, never applied. In-flight
//! requests are not cancelled; cancellation is logical.
//!
//! [`PageWindow`] is the externally-controlled counterpart of
//! [`PagedCollection`] for views whose data arrives from elsewhere; the two
//! are distinct types selected by the caller, not runtime branches of one.

mod infinite;
mod paged;
mod window;

pub use infinite::{CursorFetcher, InfiniteCollection, RetryPolicy};
pub use paged::PagedCollection;
pub use window::{PageSlot, PageWindow};

use async_trait::async_trait;
use devconnect_core::Error;
use devconnect_core::models::PageResult;

/// Parameters of one numbered-page request. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

/// Loading state of a list controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Errored,
}

/// A numbered-page data source: `(page, limit, search?) → PageResult`.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<T>, Error>;
}
