//! Discussion-feed controller for one project.
//!
//! Composes an [`InfiniteCollection`] scoped to `(project_id, sort)`.
//! Mutations never splice results in locally: create and like go to the
//! server, then the feed is reset and refetched so the list always shows
//! server truth. Changing the sort order is a new query identity and
//! restarts pagination from the first page.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use devconnect_core::models::{Comment, CommentSort, CursorPage};
use devconnect_core::{Error, validation};

use crate::api::CommentsApi;
use crate::collection::{CursorFetcher, InfiniteCollection};
use crate::events::{AppEvent, EventBus};

const DEFAULT_PAGE_SIZE: u32 = 10;

/// The comment operations a thread needs; implemented by [`CommentsApi`],
/// stubbed in tests.
#[async_trait]
pub trait CommentsSource: Send + Sync {
    async fn list(
        &self,
        project_id: &str,
        page: u32,
        limit: u32,
        sort: CommentSort,
    ) -> Result<CursorPage<Comment>, Error>;
    async fn create(&self, project_id: &str, content: &str) -> Result<Comment, Error>;
    async fn toggle_like(&self, comment_id: &str) -> Result<(), Error>;
}

#[async_trait]
impl CommentsSource for CommentsApi {
    async fn list(
        &self,
        project_id: &str,
        page: u32,
        limit: u32,
        sort: CommentSort,
    ) -> Result<CursorPage<Comment>, Error> {
        CommentsApi::list(self, project_id, page, limit, sort).await
    }

    async fn create(&self, project_id: &str, content: &str) -> Result<Comment, Error> {
        CommentsApi::create(self, project_id, content).await
    }

    async fn toggle_like(&self, comment_id: &str) -> Result<(), Error> {
        CommentsApi::toggle_like(self, comment_id).await
    }
}

/// Adapts the 1-based comment listing to the feed's zero-based cursor
/// contract, reading the sort at request time.
struct CommentsFetcher {
    source: Arc<dyn CommentsSource>,
    project_id: String,
    sort: Arc<RwLock<CommentSort>>,
    limit: u32,
}

#[async_trait]
impl CursorFetcher<Comment> for CommentsFetcher {
    async fn fetch_page(&self, page_index: u32) -> Result<CursorPage<Comment>, Error> {
        let sort = *self.sort.read().unwrap_or_else(PoisonError::into_inner);
        self.source.list(&self.project_id, page_index + 1, self.limit, sort).await
    }
}

/// The comment feed of one project, with mutations that refetch.
pub struct CommentThread {
    source: Arc<dyn CommentsSource>,
    project_id: String,
    sort: Arc<RwLock<CommentSort>>,
    feed: InfiniteCollection<Comment>,
    bus: EventBus,
}

impl CommentThread {
    /// Rejects empty or sentinel (`"null"`/`"undefined"`) project ids
    /// before any request is made.
    pub fn new(
        source: Arc<dyn CommentsSource>,
        project_id: &str,
        bus: EventBus,
    ) -> Result<Self, Error> {
        Self::with_page_size(source, project_id, bus, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        source: Arc<dyn CommentsSource>,
        project_id: &str,
        bus: EventBus,
        page_size: u32,
    ) -> Result<Self, Error> {
        validation::validate_entity_id(project_id)?;
        let sort = Arc::new(RwLock::new(CommentSort::default()));
        let fetcher = CommentsFetcher {
            source: source.clone(),
            project_id: project_id.to_string(),
            sort: sort.clone(),
            limit: page_size.max(1),
        };
        Ok(Self {
            source,
            project_id: project_id.to_string(),
            sort,
            feed: InfiniteCollection::new(Arc::new(fetcher)),
            bus,
        })
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.feed.items()
    }

    pub fn total(&self) -> Option<u64> {
        self.feed.total()
    }

    pub fn has_more(&self) -> bool {
        self.feed.has_more()
    }

    pub fn is_fetching(&self) -> bool {
        self.feed.is_fetching()
    }

    pub fn error(&self) -> Option<String> {
        self.feed.error()
    }

    pub fn sort(&self) -> CommentSort {
        *self.sort.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the next page of the feed.
    pub async fn fetch_next_page(&self) {
        self.feed.fetch_next_page().await;
    }

    /// Create a comment, then refetch the feed so it shows server truth.
    /// Validation failures are reported without any network call.
    pub async fn create_comment(&self, content: &str) -> Result<Comment, Error> {
        validation::validate_comment(content)?;
        let created = self.source.create(&self.project_id, content).await?;
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Toggle the caller's like on a comment; counts come from the refetch,
    /// never from flipping local state.
    pub async fn toggle_like(&self, comment_id: &str) -> Result<(), Error> {
        validation::validate_entity_id(comment_id)?;
        self.source.toggle_like(comment_id).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Switch the sort order and restart pagination from the first page.
    /// A no-op when the order is unchanged.
    pub async fn set_sort(&self, sort: CommentSort) {
        {
            let mut current = self.sort.write().unwrap_or_else(PoisonError::into_inner);
            if *current == sort {
                return;
            }
            *current = sort;
        }
        self.feed.reset();
        self.feed.fetch_next_page().await;
    }

    async fn refresh_after_mutation(&self) {
        self.bus.publish(AppEvent::CommentsChanged { project_id: self.project_id.clone() });
        self.feed.reset();
        self.feed.fetch_next_page().await;
    }
}
