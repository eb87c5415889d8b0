//! Self-fetching numbered-page controller.
//!
//! Owns page number, page size, debounced search text, loading/error state
//! and total count, refetching on every trigger. Search input waits out a
//! debounce window and resets to page 1; clearing the search resets and
//! fetches immediately. The first unfiltered page is mirrored into the
//! attached cache; searches and later pages are never cached.
//!
//! At most one in-flight fetch's result is applied: each fetch gets a
//! sequence number and a response whose sequence is no longer current is
//! discarded.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use devconnect_core::KeyValueCache;

use super::{LoadState, PageFetcher, PageQuery, PageSlot, PageWindow};

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Snapshot mirrored into the cache for the first unfiltered page.
#[derive(Serialize, Deserialize)]
struct CachedPage<T> {
    items: Vec<T>,
    total: u64,
}

struct State<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    page_size: u32,
    search: String,
    load_state: LoadState,
    error: Option<String>,
    /// Sequence of the most recently issued fetch; stale responses compare
    /// against it and are dropped.
    issued: u64,
    /// Bumped on every keystroke so an aborted-but-racing debounce commit
    /// can tell it lost.
    search_gen: u64,
}

/// Generic paginated-list controller over a [`PageFetcher`].
pub struct PagedCollection<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    cache: Option<(KeyValueCache, String)>,
    debounce: Duration,
    inner: Arc<Mutex<State<T>>>,
    pending_search: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<T> Clone for PagedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            cache: self.cache.clone(),
            debounce: self.debounce,
            inner: self.inner.clone(),
            pending_search: self.pending_search.clone(),
        }
    }
}

impl<T> PagedCollection<T>
where
    T: Clone + Send + Serialize + DeserializeOwned + 'static,
{
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>) -> Self {
        Self {
            fetcher,
            cache: None,
            debounce: DEFAULT_DEBOUNCE,
            inner: Arc::new(Mutex::new(State {
                items: Vec::new(),
                total: 0,
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                search: String::new(),
                load_state: LoadState::Idle,
                error: None,
                issued: 0,
                search_gen: 0,
            })),
            pending_search: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_page_size(self, page_size: u32) -> Self {
        self.lock().page_size = page_size.max(1);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Mirror the first unfiltered page into `cache` under
    /// `<prefix>:page=1:limit=<n>`.
    pub fn with_cache(mut self, cache: KeyValueCache, prefix: impl Into<String>) -> Self {
        self.cache = Some((cache, prefix.into()));
        self
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    pub fn total(&self) -> u64 {
        self.lock().total
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn page_size(&self) -> u32 {
        self.lock().page_size
    }

    pub fn search(&self) -> String {
        self.lock().search.clone()
    }

    pub fn state(&self) -> LoadState {
        self.lock().load_state
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn total_pages(&self) -> u64 {
        let st = self.lock();
        PageWindow::with_state(st.page, st.page_size, st.total).total_pages()
    }

    /// The collapsed page-number display for the current state.
    pub fn page_numbers(&self) -> Vec<PageSlot> {
        let st = self.lock();
        PageWindow::with_state(st.page, st.page_size, st.total).slots()
    }

    /// Fetch at the current page/size/search. Also the external
    /// refetch trigger after a mutation elsewhere.
    pub async fn refetch(&self) {
        self.run_fetch().await;
    }

    /// Jump to a page and refetch.
    pub async fn set_page(&self, page: u32) {
        {
            let mut st = self.lock();
            if page < 1 || page == st.page {
                return;
            }
            st.page = page;
        }
        self.run_fetch().await;
    }

    /// Change the page size, reset to page 1, and refetch.
    pub async fn set_page_size(&self, page_size: u32) {
        {
            let mut st = self.lock();
            if page_size == 0 || page_size == st.page_size {
                return;
            }
            st.page_size = page_size;
            st.page = 1;
        }
        self.run_fetch().await;
    }

    /// Record a search keystroke.
    ///
    /// A non-empty search waits out the debounce window, then resets to
    /// page 1 and fetches; every further keystroke restarts the window. An
    /// empty search resets and fetches immediately.
    pub async fn set_search(&self, text: &str) {
        if let Some(handle) = self.take_pending() {
            handle.abort();
        }

        let search_gen = {
            let mut st = self.lock();
            st.search = text.to_string();
            st.search_gen += 1;
            st.search_gen
        };

        if text.trim().is_empty() {
            self.lock().page = 1;
            self.run_fetch().await;
            return;
        }

        let this = self.clone();
        let delay = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if this.lock().search_gen != search_gen {
                return;
            }
            this.lock().page = 1;
            this.run_fetch().await;
        });
        *self.pending_search.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Await a pending debounced search commit, if any.
    pub async fn settle(&self) {
        if let Some(handle) = self.take_pending() {
            let _ = handle.await;
        }
    }

    fn take_pending(&self) -> Option<JoinHandle<()>> {
        self.pending_search.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    fn cache_key(&self, query: &PageQuery) -> Option<String> {
        let (_, prefix) = self.cache.as_ref()?;
        (query.page == 1 && query.search.is_none())
            .then(|| format!("{prefix}:page={}:limit={}", query.page, query.limit))
    }

    async fn run_fetch(&self) {
        let (seq, query) = {
            let mut st = self.lock();
            st.issued += 1;
            st.load_state = LoadState::Loading;
            st.error = None;
            let search = st.search.trim();
            let query = PageQuery {
                page: st.page,
                limit: st.page_size,
                search: if search.is_empty() { None } else { Some(search.to_string()) },
            };
            (st.issued, query)
        };

        let cache_key = self.cache_key(&query);
        if let Some(key) = cache_key.as_deref()
            && let Some((cache, _)) = &self.cache
            && let Some(cached) = cache.get_as::<CachedPage<T>>(key)
        {
            let mut st = self.lock();
            if st.issued == seq {
                tracing::debug!(key, "serving page from cache");
                st.items = cached.items;
                st.total = cached.total;
                st.load_state = LoadState::Ready;
            }
            return;
        }

        let result = self.fetcher.fetch_page(&query).await;

        let mut st = self.lock();
        if st.issued != seq {
            tracing::debug!(seq, current = st.issued, "discarding stale page response");
            return;
        }

        match result {
            Ok(page) if page.success => {
                st.items = page.items;
                st.total = page.total;
                st.load_state = LoadState::Ready;
                if let Some(key) = cache_key.as_deref()
                    && let Some((cache, _)) = &self.cache
                {
                    let snapshot = CachedPage { items: st.items.clone(), total: st.total };
                    if let Err(e) = cache.set_json(key, &snapshot) {
                        tracing::warn!(key, error = %e, "failed to cache page");
                    }
                }
            }
            Ok(page) => {
                let message = page.error.unwrap_or_else(|| "failed to load data".into());
                Self::fail(&mut st, message);
            }
            Err(e) => Self::fail(&mut st, e.to_string()),
        }
    }

    fn fail(st: &mut State<T>, message: String) {
        tracing::debug!(%message, "page fetch failed");
        st.items.clear();
        st.total = 0;
        st.load_state = LoadState::Errored;
        st.error = Some(message);
    }
}
