//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (DEVCONNECT_*)
//! 2. TOML config file (if DEVCONNECT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Client configuration shared by the HTTP layer, cache, and controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote REST API; every endpoint path is relative to it.
    ///
    /// Set via DEVCONNECT_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of entries in the in-memory cache.
    #[serde(default = "default_cache_max_size")]
    pub cache_max_size: usize,

    /// Default TTL for cached listings, in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Page size used by paginated listings when none is given.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound accepted for a page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Page size for the comment feed.
    #[serde(default = "default_comments_page_size")]
    pub comments_page_size: u32,

    /// Debounce window applied to search input, in milliseconds.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Path of the JSON file holding persisted session tokens.
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "devconnect/0.1".into()
}

fn default_cache_max_size() -> usize {
    100
}

fn default_cache_ttl_ms() -> u64 {
    5 * 60 * 1000
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_comments_page_size() -> u32 {
    10
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_token_path() -> PathBuf {
    PathBuf::from("./devconnect-session.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            cache_max_size: default_cache_max_size(),
            cache_ttl_ms: default_cache_ttl_ms(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            comments_page_size: default_comments_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            token_path: default_token_path(),
        }
    }
}

impl AppConfig {
    /// Request timeout as a Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Search debounce as a Duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or validation fails
    /// after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DEVCONNECT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DEVCONNECT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.cache_max_size, 100);
        assert_eq!(config.cache_ttl_ms, 300_000);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.comments_page_size, 10);
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.token_path, PathBuf::from("./devconnect-session.json"));
    }

    #[test]
    fn test_duration_helpers() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
    }
}
