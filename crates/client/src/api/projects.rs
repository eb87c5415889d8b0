//! Project endpoints: listing, detail, and authenticated CRUD.
//!
//! Mutations invalidate the cached listing pages and publish
//! [`AppEvent::ProjectsChanged`] so any live listing refetches.

use async_trait::async_trait;
use devconnect_core::models::{PageResult, Project};
use devconnect_core::{Error, KeyValueCache, validation};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::collection::{PageFetcher, PageQuery};
use crate::events::{AppEvent, EventBus};
use crate::http::HttpClient;

#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub tech_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    success: bool,
    #[serde(default)]
    projects: Option<Vec<Project>>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    success: bool,
    #[serde(default)]
    project: Option<Project>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Typed access to the `/projects` endpoints.
#[derive(Debug, Clone)]
pub struct ProjectsApi {
    http: HttpClient,
    cache: KeyValueCache,
    bus: EventBus,
}

impl ProjectsApi {
    pub fn new(http: HttpClient, cache: KeyValueCache, bus: EventBus) -> Self {
        Self { http, cache, bus }
    }

    /// `GET /projects?page&limit&search` normalized into a [`PageResult`].
    pub async fn list(&self, query: &PageQuery) -> Result<PageResult<Project>, Error> {
        let qs = {
            let mut qs = form_urlencoded::Serializer::new(String::new());
            qs.append_pair("page", &query.page.to_string());
            qs.append_pair("limit", &query.limit.to_string());
            if let Some(search) = query.search.as_deref() {
                qs.append_pair("search", search);
            }
            qs.finish()
        };

        let response = self
            .http
            .get::<ProjectsResponse>(&format!("/projects?{qs}"))
            .await?;
        let body = response.data;
        if body.success {
            Ok(PageResult::ok(body.projects.unwrap_or_default(), body.total.unwrap_or(0)))
        } else {
            Ok(PageResult::failed(body.error.unwrap_or_else(|| "failed to load projects".into())))
        }
    }

    pub async fn get(&self, id: &str) -> Result<Project, Error> {
        validation::validate_entity_id(id)?;
        let response = self.http.get::<ProjectResponse>(&format!("/projects/{id}")).await?;
        super::require(response.data.success, response.data.error, response.data.project, "project")
    }

    /// `GET /users/:id/projects` — every project published by one user.
    pub async fn by_user(&self, user_id: &str) -> Result<Vec<Project>, Error> {
        validation::validate_entity_id(user_id)?;
        let response = self
            .http
            .get::<ProjectsResponse>(&format!("/users/{user_id}/projects"))
            .await?;
        super::require(response.data.success, response.data.error, response.data.projects, "projects")
    }

    pub async fn create(&self, project: &NewProject) -> Result<Project, Error> {
        validation::validate_project_form(&project.title, &project.description, &project.tech_stack)?;
        for value in [&project.demo_url, &project.github_url, &project.image_url].into_iter().flatten() {
            validation::validate_optional_url(value)?;
        }

        let response = self.http.post::<_, ProjectResponse>("/projects", Some(project)).await?;
        let created = super::require(response.data.success, response.data.error, response.data.project, "project")?;
        self.invalidate_listings();
        Ok(created)
    }

    pub async fn update(&self, id: &str, update: &ProjectUpdate) -> Result<Project, Error> {
        validation::validate_entity_id(id)?;
        let response = self
            .http
            .put::<_, ProjectResponse>(&format!("/projects/{id}"), Some(update))
            .await?;
        let updated = super::require(response.data.success, response.data.error, response.data.project, "project")?;
        self.invalidate_listings();
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        validation::validate_entity_id(id)?;
        let response = self.http.delete::<DeleteResponse>(&format!("/projects/{id}")).await?;
        super::ensure(response.data.success, response.data.error, "delete project")?;
        self.invalidate_listings();
        Ok(())
    }

    /// Drop every cached `projects:*` page and tell listings to refetch.
    fn invalidate_listings(&self) {
        if let Err(e) = self.cache.invalidate_pattern("^projects:") {
            tracing::warn!(error = %e, "failed to invalidate project cache");
        }
        self.bus.publish(AppEvent::ProjectsChanged);
    }
}

#[async_trait]
impl PageFetcher<Project> for ProjectsApi {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<Project>, Error> {
        self.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_response_normalization() {
        let json = r#"{
            "success": true,
            "projects": [],
            "total": 47
        }"#;
        let body: ProjectsResponse = serde_json::from_str(json).unwrap();
        assert!(body.success);
        assert_eq!(body.total, Some(47));
        assert!(body.projects.unwrap().is_empty());
    }

    #[test]
    fn test_projects_response_failure_envelope() {
        let json = r#"{"success": false, "error": "database unavailable"}"#;
        let body: ProjectsResponse = serde_json::from_str(json).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("database unavailable"));
    }

    #[test]
    fn test_project_update_serializes_only_set_fields() {
        let update = ProjectUpdate { title: Some("New title".into()), ..Default::default() };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["title"], "New title");
    }
}
