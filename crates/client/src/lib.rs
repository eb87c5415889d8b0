//! Client code for devconnect.
//!
//! This crate provides the HTTP client, typed endpoint wrappers, session
//! handling, and the list controllers that keep views synchronized with the
//! remote API.

pub mod api;
pub mod collection;
pub mod comments;
pub mod events;
pub mod http;
pub mod session;

pub use api::{AdminUserIndex, AuthApi, AuthEndpoints, CommentsApi, ProfileDirectory, ProjectsApi, UsersApi};
pub use collection::{
    CursorFetcher, InfiniteCollection, LoadState, PageFetcher, PageQuery, PageSlot, PageWindow,
    PagedCollection, RetryPolicy,
};
pub use comments::{CommentThread, CommentsSource};
pub use events::{AppEvent, EventBus};
pub use http::{HttpClient, HttpResponse};
pub use session::{
    AuthState, FileTokenStorage, MemoryTokenStorage, SessionStore, StoredTokens, TokenCell,
    TokenStorage,
};
