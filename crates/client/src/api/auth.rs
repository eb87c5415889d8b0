//! Auth endpoints: register, login, logout, current user.
//!
//! [`AuthApi`] is the seam the session store depends on; tests substitute a
//! stub, production wires in [`AuthEndpoints`].

use async_trait::async_trait;
use devconnect_core::Error;
use devconnect_core::models::User;
use serde::{Deserialize, Serialize};

use crate::http::HttpClient;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Tokens issued by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub user: User,
    pub session: SessionTokens,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    data: Option<LoginData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    success: bool,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    error: Option<String>,
}

/// Authentication operations as the session store sees them.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<(), Error>;
    async fn login(&self, email: &str, password: &str) -> Result<LoginData, Error>;
    async fn logout(&self) -> Result<(), Error>;
    async fn current_user(&self) -> Result<User, Error>;
}

/// Production implementation over [`HttpClient`].
#[derive(Debug, Clone)]
pub struct AuthEndpoints {
    http: HttpClient,
}

impl AuthEndpoints {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthApi for AuthEndpoints {
    async fn register(&self, request: &RegisterRequest) -> Result<(), Error> {
        let response = self
            .http
            .post::<_, RegisterResponse>("/auth/register", Some(request))
            .await?;
        super::ensure(response.data.success, response.data.error, "register")
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginData, Error> {
        let request = LoginRequest { email, password };
        let response = self.http.post::<_, LoginResponse>("/auth/login", Some(&request)).await?;
        super::require(response.data.success, response.data.error, response.data.data, "session")
    }

    async fn logout(&self) -> Result<(), Error> {
        let response = self
            .http
            .post::<(), RegisterResponse>("/auth/logout", None)
            .await?;
        super::ensure(response.data.success, response.data.error, "logout")
    }

    async fn current_user(&self) -> Result<User, Error> {
        let response = self.http.get::<MeResponse>("/auth/me").await?;
        super::require(response.data.success, response.data.error, response.data.user, "user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_skips_absent_optionals() {
        let request = RegisterRequest {
            email: "dev@example.com".into(),
            password: "secret".into(),
            full_name: None,
            username: Some("devone".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("full_name").is_none());
        assert_eq!(json["username"], "devone");
    }

    #[test]
    fn test_login_response_with_refresh_token() {
        let json = r#"{
            "success": true,
            "data": {
                "user": {
                    "id": "u-1",
                    "email": "dev@example.com",
                    "created_at": "2024-03-01T10:00:00Z",
                    "updated_at": "2024-03-01T10:00:00Z"
                },
                "session": {"access_token": "at", "refresh_token": "rt"}
            }
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.session.access_token, "at");
        assert_eq!(data.session.refresh_token.as_deref(), Some("rt"));
        assert_eq!(data.user.id, "u-1");
    }

    #[test]
    fn test_login_response_without_refresh_token() {
        let json = r#"{
            "success": true,
            "data": {
                "user": {
                    "id": "u-1",
                    "email": "dev@example.com",
                    "created_at": "2024-03-01T10:00:00Z",
                    "updated_at": "2024-03-01T10:00:00Z"
                },
                "session": {"access_token": "at"}
            }
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.unwrap().session.refresh_token, None);
    }
}
