//! User and profile endpoints.
//!
//! Three surfaces share this module: the public profile directory, the
//! signed-in user's own profile, and the admin user-management panel. The
//! directory and admin listings are offset-based on the wire; the adapters
//! convert from the page/limit contract the controllers speak.

use async_trait::async_trait;
use devconnect_core::models::{PageResult, User, UserProfile};
use devconnect_core::{Error, validation};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::collection::{PageFetcher, PageQuery};
use crate::events::{AppEvent, EventBus};
use crate::http::HttpClient;

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

/// Admin-side update of another user's account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<devconnect_core::models::Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfilesResponse {
    success: bool,
    #[serde(default)]
    profiles: Option<Vec<UserProfile>>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    success: bool,
    #[serde(default)]
    profile: Option<UserProfile>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    success: bool,
    #[serde(default)]
    users: Option<Vec<User>>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    success: bool,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn offset_query(query: &PageQuery) -> String {
    let offset = u64::from(query.page.saturating_sub(1)) * u64::from(query.limit);
    let mut qs = form_urlencoded::Serializer::new(String::new());
    qs.append_pair("limit", &query.limit.to_string());
    qs.append_pair("offset", &offset.to_string());
    if let Some(search) = query.search.as_deref() {
        qs.append_pair("search", search);
    }
    qs.finish()
}

/// Typed access to the profile and user-management endpoints.
#[derive(Debug, Clone)]
pub struct UsersApi {
    http: HttpClient,
    bus: EventBus,
}

impl UsersApi {
    pub fn new(http: HttpClient, bus: EventBus) -> Self {
        Self { http, bus }
    }

    /// Public directory: `GET /profiles?limit&offset&search`.
    pub async fn profiles(&self, query: &PageQuery) -> Result<PageResult<UserProfile>, Error> {
        let response = self
            .http
            .get::<ProfilesResponse>(&format!("/profiles?{}", offset_query(query)))
            .await?;
        let body = response.data;
        if body.success {
            Ok(PageResult::ok(body.profiles.unwrap_or_default(), body.total.unwrap_or(0)))
        } else {
            Ok(PageResult::failed(body.error.unwrap_or_else(|| "failed to load profiles".into())))
        }
    }

    /// The signed-in user's own profile.
    pub async fn profile(&self) -> Result<UserProfile, Error> {
        let response = self.http.get::<ProfileResponse>("/profile").await?;
        super::require(response.data.success, response.data.error, response.data.profile, "profile")
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, Error> {
        if let Some(username) = update.username.as_deref() {
            validation::validate_username(username)?;
        }
        for value in [&update.avatar_url, &update.website, &update.github_url, &update.linkedin_url]
            .into_iter()
            .flatten()
        {
            validation::validate_optional_url(value)?;
        }

        let response = self.http.put::<_, ProfileResponse>("/profile", Some(update)).await?;
        let profile = super::require(response.data.success, response.data.error, response.data.profile, "profile")?;
        self.bus.publish(AppEvent::ProfilesChanged);
        Ok(profile)
    }

    /// Admin: `GET /users?limit&offset&search`.
    pub async fn users(&self, query: &PageQuery) -> Result<PageResult<User>, Error> {
        let response = self
            .http
            .get::<UsersResponse>(&format!("/users?{}", offset_query(query)))
            .await?;
        let body = response.data;
        if body.success {
            Ok(PageResult::ok(body.users.unwrap_or_default(), body.total.unwrap_or(0)))
        } else {
            Ok(PageResult::failed(body.error.unwrap_or_else(|| "failed to load users".into())))
        }
    }

    /// Admin: one user's full record.
    pub async fn user(&self, id: &str) -> Result<User, Error> {
        validation::validate_entity_id(id)?;
        let response = self.http.get::<UserResponse>(&format!("/users/{id}")).await?;
        super::require(response.data.success, response.data.error, response.data.user, "user")
    }

    pub async fn update_user(&self, id: &str, update: &AdminUserUpdate) -> Result<User, Error> {
        validation::validate_entity_id(id)?;
        if let Some(email) = update.email.as_deref() {
            validation::validate_email(email)?;
        }
        if let Some(username) = update.username.as_deref() {
            validation::validate_username(username)?;
        }

        let response = self
            .http
            .put::<_, UserResponse>(&format!("/users/{id}"), Some(update))
            .await?;
        let user = super::require(response.data.success, response.data.error, response.data.user, "user")?;
        self.bus.publish(AppEvent::ProfilesChanged);
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), Error> {
        validation::validate_entity_id(id)?;
        let response = self.http.delete::<DeleteResponse>(&format!("/users/{id}")).await?;
        super::ensure(response.data.success, response.data.error, "delete user")?;
        self.bus.publish(AppEvent::ProfilesChanged);
        Ok(())
    }
}

/// Page-fetcher adapter for the public profile directory.
#[derive(Debug, Clone)]
pub struct ProfileDirectory(pub UsersApi);

#[async_trait]
impl PageFetcher<UserProfile> for ProfileDirectory {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<UserProfile>, Error> {
        self.0.profiles(query).await
    }
}

/// Page-fetcher adapter for the admin user listing.
#[derive(Debug, Clone)]
pub struct AdminUserIndex(pub UsersApi);

#[async_trait]
impl PageFetcher<User> for AdminUserIndex {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResult<User>, Error> {
        self.0.users(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_query_converts_page_to_offset() {
        let query = PageQuery { page: 3, limit: 20, search: None };
        assert_eq!(offset_query(&query), "limit=20&offset=40");
    }

    #[test]
    fn test_offset_query_first_page_and_search_encoding() {
        let query = PageQuery { page: 1, limit: 10, search: Some("rust dev".into()) };
        assert_eq!(offset_query(&query), "limit=10&offset=0&search=rust+dev");
    }

    #[test]
    fn test_profiles_response_normalization() {
        let json = r#"{
            "success": true,
            "profiles": [{"id": "u-1", "username": "devone"}],
            "total": 1
        }"#;
        let body: ProfilesResponse = serde_json::from_str(json).unwrap();
        let profiles = body.profiles.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].username.as_deref(), Some("devone"));
        assert_eq!(profiles[0].created_at, None);
    }
}
