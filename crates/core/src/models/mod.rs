//! Data model for the devconnect platform.
//!
//! The remote API owns every record; the client holds read/write copies
//! only. Wire field names are snake_case and match the Rust field names, so
//! no renames are needed. Ordering of list payloads is server-defined and
//! preserved as-is; the client never re-sorts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A full user record (self profile or admin view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The partial user embedded in projects and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A published project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

/// A comment on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub is_liked: bool,
}

/// An entry in the public profile directory. Most fields are optional since
/// the directory exposes only what a user chose to fill in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An authenticated session. User and access token are set together or not
/// at all; there is no partially populated state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// The uniform contract every numbered-page fetch returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> PageResult<T> {
    pub fn ok(items: Vec<T>, total: u64) -> Self {
        Self { items, total, success: true, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { items: Vec::new(), total: 0, success: false, error: Some(message.into()) }
    }
}

/// The contract cursor-style (infinite scroll) fetches return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    pub has_more: bool,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Comment feed sort orders. Changing the sort is a new query identity and
/// restarts pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentSort {
    #[default]
    Newest,
    Oldest,
    Popular,
}

impl CommentSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentSort::Newest => "newest",
            CommentSort::Oldest => "oldest",
            CommentSort::Popular => "popular",
        }
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r#"{
        "id": "u-1",
        "email": "dev@example.com",
        "full_name": "Dev One",
        "username": "devone",
        "role": "admin",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-02T10:00:00Z"
    }"#;

    const PROJECT_JSON: &str = r#"{
        "id": "p-1",
        "user_id": "u-1",
        "title": "Terminal dashboard",
        "description": "A TUI for service health",
        "tech_stack": ["rust", "ratatui"],
        "github_url": "https://github.com/devone/dash",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z",
        "author": {"id": "u-1", "username": "devone"}
    }"#;

    #[test]
    fn test_deserialize_user() {
        let user: User = serde_json::from_str(USER_JSON).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.bio, None);
    }

    #[test]
    fn test_role_defaults_to_user() {
        let json = r#"{
            "id": "u-2",
            "email": "x@example.com",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_deserialize_project_with_partial_author() {
        let project: Project = serde_json::from_str(PROJECT_JSON).unwrap();
        assert_eq!(project.tech_stack, vec!["rust", "ratatui"]);
        assert_eq!(project.author.username.as_deref(), Some("devone"));
        assert_eq!(project.author.full_name, None);
        assert_eq!(project.demo_url, None);
    }

    #[test]
    fn test_comment_counters_default_to_zero() {
        let json = r#"{
            "id": "c-1",
            "content": "nice work",
            "author": {"id": "u-2"},
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.likes_count, 0);
        assert_eq!(comment.replies_count, 0);
        assert!(!comment.is_liked);
    }

    #[test]
    fn test_page_result_constructors() {
        let ok: PageResult<u32> = PageResult::ok(vec![1, 2], 47);
        assert!(ok.success);
        assert_eq!(ok.total, 47);

        let failed: PageResult<u32> = PageResult::failed("boom");
        assert!(!failed.success);
        assert!(failed.items.is_empty());
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_comment_sort_wire_format() {
        assert_eq!(CommentSort::Popular.as_str(), "popular");
        assert_eq!(serde_json::to_string(&CommentSort::Oldest).unwrap(), "\"oldest\"");
        let sort: CommentSort = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(sort, CommentSort::Newest);
    }
}
