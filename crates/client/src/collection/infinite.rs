//! Append-only cursor feed with retry.
//!
//! Pages accumulate in load order and are flattened for display. Only the
//! first page's total is kept; `has_more` always reflects the most recent
//! page. A fetch that is already in flight makes further load requests
//! no-ops, and [`InfiniteCollection::reset`] bumps an epoch so a response
//! from before the reset is discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use devconnect_core::Error;
use devconnect_core::models::CursorPage;

/// A cursor-style data source addressed by zero-based page index.
#[async_trait]
pub trait CursorFetcher<T>: Send + Sync {
    async fn fetch_page(&self, page_index: u32) -> Result<CursorPage<T>, Error>;
}

/// Exponential-backoff retry for transient feed failures.
///
/// Client errors (4xx, invalid input) are never retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given zero-based failed attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

struct FeedState<T> {
    pages: Vec<Vec<T>>,
    total: Option<u64>,
    has_more: bool,
    fetching: bool,
    error: Option<String>,
    /// Bumped by [`InfiniteCollection::reset`]; responses from an earlier
    /// epoch are dropped.
    epoch: u64,
}

impl<T> FeedState<T> {
    fn fresh() -> Self {
        Self {
            pages: Vec::new(),
            total: None,
            has_more: true,
            fetching: false,
            error: None,
            epoch: 0,
        }
    }
}

/// Generic infinite-scroll controller over a [`CursorFetcher`].
pub struct InfiniteCollection<T> {
    fetcher: Arc<dyn CursorFetcher<T>>,
    retry: RetryPolicy,
    inner: Arc<Mutex<FeedState<T>>>,
}

impl<T> Clone for InfiniteCollection<T> {
    fn clone(&self) -> Self {
        Self { fetcher: self.fetcher.clone(), retry: self.retry, inner: self.inner.clone() }
    }
}

impl<T> InfiniteCollection<T>
where
    T: Clone + Send,
{
    pub fn new(fetcher: Arc<dyn CursorFetcher<T>>) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::default(),
            inner: Arc::new(Mutex::new(FeedState::fresh())),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FeedState<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All loaded items, flattened in load order.
    pub fn items(&self) -> Vec<T> {
        self.lock().pages.iter().flatten().cloned().collect()
    }

    /// The total reported by the first page, if any arrived yet.
    pub fn total(&self) -> Option<u64> {
        self.lock().total
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_fetching(&self) -> bool {
        self.lock().fetching
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn pages_loaded(&self) -> usize {
        self.lock().pages.len()
    }

    /// Discard all loaded pages and start over from the first page.
    /// An in-flight fetch keeps running but its result is discarded.
    pub fn reset(&self) {
        let mut st = self.lock();
        let epoch = st.epoch + 1;
        *st = FeedState::fresh();
        st.epoch = epoch;
    }

    /// Load the next page, retrying transient failures per the policy.
    ///
    /// A no-op while a fetch is in flight or once the feed is exhausted.
    pub async fn fetch_next_page(&self) {
        let (epoch, page_index) = {
            let mut st = self.lock();
            if st.fetching || !st.has_more {
                return;
            }
            st.fetching = true;
            st.error = None;
            (st.epoch, st.pages.len() as u32)
        };

        let result = self.fetch_with_retry(page_index).await;

        let mut st = self.lock();
        if st.epoch != epoch {
            tracing::debug!(page_index, "discarding feed page from before reset");
            return;
        }
        st.fetching = false;
        match result {
            Ok(page) => {
                if st.total.is_none() {
                    st.total = page.total;
                }
                st.has_more = page.has_more;
                st.pages.push(page.data);
            }
            Err(e) => {
                tracing::debug!(page_index, error = %e, "feed page failed");
                st.error = Some(e.to_string());
            }
        }
    }

    async fn fetch_with_retry(&self, page_index: u32) -> Result<CursorPage<T>, Error> {
        let mut attempt = 0;
        loop {
            match self.fetcher.fetch_page(page_index).await {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.retry.max_retries && e.is_retryable() => {
                    let delay = self.retry.delay(attempt);
                    tracing::debug!(page_index, attempt, ?delay, error = %e, "retrying feed page");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
