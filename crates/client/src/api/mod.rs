//! Typed wrappers over the remote REST endpoints.
//!
//! Each submodule deserializes the raw wire envelope and normalizes it into
//! the core data model, so callers never see `success` flags or partial
//! payloads.

pub mod auth;
pub mod comments;
pub mod projects;
pub mod users;

pub use auth::{AuthApi, AuthEndpoints};
pub use comments::CommentsApi;
pub use projects::ProjectsApi;
pub use users::{AdminUserIndex, ProfileDirectory, UsersApi};

use devconnect_core::Error;

/// Unwrap a `{ success, error?, <payload> }` envelope that must carry a
/// payload.
pub(crate) fn require<T>(
    success: bool,
    error: Option<String>,
    value: Option<T>,
    what: &str,
) -> Result<T, Error> {
    ensure(success, error, what)?;
    value.ok_or_else(|| Error::Parse(format!("response missing {what}")))
}

/// Unwrap a payload-less `{ success, error? }` envelope.
pub(crate) fn ensure(success: bool, error: Option<String>, what: &str) -> Result<(), Error> {
    if success {
        Ok(())
    } else {
        Err(Error::Api(error.unwrap_or_else(|| format!("failed to {what}"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_returns_payload_on_success() {
        assert_eq!(require(true, None, Some(7), "number").unwrap(), 7);
    }

    #[test]
    fn test_require_prefers_server_error() {
        let err = require::<u32>(false, Some("nope".into()), None, "number").unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_require_missing_payload_is_a_parse_error() {
        let err = require::<u32>(true, None, None, "number").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_ensure_falls_back_to_generic_message() {
        let err = ensure(false, None, "delete project").unwrap_err();
        assert_eq!(err.to_string(), "failed to delete project");
    }
}
