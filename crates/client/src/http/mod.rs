//! Thin JSON HTTP client over the remote REST API.
//!
//! One method per verb; every request carries `Content-Type:
//! application/json` and, when the shared [`TokenCell`] holds one, an
//! `Authorization: Bearer <token>` header. Non-2xx responses fail with
//! [`Error::Http`] carrying the server-supplied `error` message.
//!
//! Deliberately dumb: no retry, no client-side timeout beyond reqwest's, no
//! token refresh. A 401 surfaces as a failure to the caller; retry policy
//! lives in the collection controllers.

use devconnect_core::{AppConfig, Error};
use reqwest::{Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::TokenCell;

/// Parsed response with the transport metadata callers occasionally need.
#[derive(Debug, Clone)]
pub struct HttpResponse<T> {
    pub data: T,
    pub status: u16,
    pub status_text: String,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Extract the user-facing message from a non-2xx response body.
fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

/// JSON HTTP client bound to a fixed API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    token: TokenCell,
}

impl HttpClient {
    pub fn new(config: &AppConfig, token: TokenCell) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.api_base_url.trim_end_matches('/').to_string();

        Ok(Self { http, base_url, token })
    }

    /// The token cell this client reads bearer tokens from.
    pub fn token(&self) -> &TokenCell {
        &self.token
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<HttpResponse<T>, Error> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse<T>, Error> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse<T>, Error> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse<T>, Error> {
        self.request(Method::PATCH, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<HttpResponse<T>, Error> {
        self.request::<(), T>(Method::DELETE, path, None).await
    }

    async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse<T>, Error> {
        let url = self.endpoint(path);
        tracing::debug!(%method, %url, "request");

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.token.get() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() { Error::Timeout } else { Error::Network(e.to_string()) }
        })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &bytes);
            tracing::debug!(status = status.as_u16(), %message, "request failed");
            return Err(Error::Http { status: status.as_u16(), message });
        }

        let data = serde_json::from_slice(&bytes).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(HttpResponse { data, status: status.as_u16(), status_text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        let config = AppConfig { api_base_url: base.into(), ..Default::default() };
        HttpClient::new(&config, TokenCell::default()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_with_and_without_slash() {
        let c = client("https://api.example.com/api");
        assert_eq!(c.endpoint("/projects"), "https://api.example.com/api/projects");
        assert_eq!(c.endpoint("projects"), "https://api.example.com/api/projects");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash_from_base() {
        let c = client("https://api.example.com/api/");
        assert_eq!(c.endpoint("/auth/me"), "https://api.example.com/api/auth/me");
    }

    #[test]
    fn test_error_message_prefers_server_error_field() {
        let body = br#"{"error": "project not found"}"#;
        assert_eq!(error_message(404, body), "project not found");
    }

    #[test]
    fn test_error_message_fallback_on_unparseable_body() {
        assert_eq!(error_message(500, b"<html>oops</html>"), "HTTP error! status: 500");
        assert_eq!(error_message(502, br#"{"message": "no error field"}"#), "HTTP error! status: 502");
    }
}
