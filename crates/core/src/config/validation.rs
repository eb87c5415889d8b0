//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `api_base_url` is empty or not an absolute http(s) URL
    /// - `timeout_ms` is below 100ms or above 5 minutes
    /// - `cache_max_size` is 0
    /// - page sizes fall outside `1..=max_page_size`
    /// - `search_debounce_ms` exceeds 5 seconds
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "api_base_url".into(), reason: "must not be empty".into() });
        }
        match url::Url::parse(&self.api_base_url) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "api_base_url".into(),
                    reason: "must be an absolute http(s) URL".into(),
                });
            }
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.cache_max_size == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_size".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_page_size".into(),
                reason: "must be greater than 0".into(),
            });
        }
        for (field, value) in [
            ("default_page_size", self.default_page_size),
            ("comments_page_size", self.comments_page_size),
        ] {
            if value == 0 || value > self.max_page_size {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: format!("must be within 1..={}", self.max_page_size),
                });
            }
        }

        if self.search_debounce_ms > 5_000 {
            return Err(ConfigError::Invalid {
                field: "search_debounce_ms".into(),
                reason: "must not exceed 5 seconds".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let config = AppConfig { api_base_url: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_base_url"));
    }

    #[test]
    fn test_validate_relative_base_url() {
        let config = AppConfig { api_base_url: "/api".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_base_url"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_zero_cache_size() {
        let config = AppConfig { cache_max_size: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_size"));
    }

    #[test]
    fn test_validate_page_size_above_max() {
        let config = AppConfig { default_page_size: 101, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "default_page_size"));
    }

    #[test]
    fn test_validate_debounce_exceeds_limit() {
        let config = AppConfig { search_debounce_ms: 6_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search_debounce_ms"));
    }

    #[test]
    fn test_validate_edge_values() {
        let config = AppConfig {
            timeout_ms: 100,
            cache_max_size: 1,
            default_page_size: 100,
            comments_page_size: 1,
            search_debounce_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
