//! Comment endpoints for a project's discussion feed.
//!
//! The listing is 1-based `page`/`limit` on the wire and is normalized into
//! the zero-based cursor contract the infinite controller speaks.

use devconnect_core::models::{Comment, CommentSort, CursorPage};
use devconnect_core::{Error, validation};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::http::HttpClient;

#[derive(Debug, Clone, Serialize)]
struct NewComment<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    success: bool,
    #[serde(default)]
    comment: Option<Comment>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LikeResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Typed access to the `/comments` endpoints.
#[derive(Debug, Clone)]
pub struct CommentsApi {
    http: HttpClient,
}

impl CommentsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `GET /comments/project/:id?page&limit&sort`, `page` 1-based.
    pub async fn list(
        &self,
        project_id: &str,
        page: u32,
        limit: u32,
        sort: CommentSort,
    ) -> Result<CursorPage<Comment>, Error> {
        validation::validate_entity_id(project_id)?;

        let qs = {
            let mut qs = form_urlencoded::Serializer::new(String::new());
            qs.append_pair("page", &page.to_string());
            qs.append_pair("limit", &limit.to_string());
            qs.append_pair("sort", sort.as_str());
            qs.finish()
        };

        let response = self
            .http
            .get::<CommentsResponse>(&format!("/comments/project/{project_id}?{qs}"))
            .await?;
        let body = response.data;
        Ok(CursorPage { data: body.comments, has_more: body.has_more, total: body.total })
    }

    pub async fn create(&self, project_id: &str, content: &str) -> Result<Comment, Error> {
        validation::validate_entity_id(project_id)?;
        validation::validate_comment(content)?;

        let request = NewComment { content };
        let response = self
            .http
            .post::<_, CommentResponse>(&format!("/comments/project/{project_id}"), Some(&request))
            .await?;
        super::require(response.data.success, response.data.error, response.data.comment, "comment")
    }

    /// `POST /comments/:id/like` toggles the caller's like. The updated
    /// counts are picked up by the refetch that follows, not from this
    /// response.
    pub async fn toggle_like(&self, comment_id: &str) -> Result<(), Error> {
        validation::validate_entity_id(comment_id)?;
        let response = self
            .http
            .post::<(), LikeResponse>(&format!("/comments/{comment_id}/like"), None)
            .await?;
        super::ensure(response.data.success, response.data.error, "toggle like")
    }
}
