//! Client-side input validation.
//!
//! Every rule here rejects bad input before any network request is made;
//! failures surface as [`Error::InvalidInput`] and render as local form
//! errors.

use crate::error::Error;
use regex::Regex;
use std::sync::LazyLock;

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;
pub const FULL_NAME_MIN_LENGTH: usize = 2;
pub const TITLE_MIN_LENGTH: usize = 3;
pub const DESCRIPTION_MIN_LENGTH: usize = 10;
pub const COMMENT_MAX_LENGTH: usize = 2000;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

pub fn validate_email(email: &str) -> Result<(), Error> {
    if email.is_empty() {
        return Err(Error::InvalidInput("email is required".into()));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(Error::InvalidInput("email format is not valid".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), Error> {
    if password.is_empty() {
        return Err(Error::InvalidInput("password is required".into()));
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(Error::InvalidInput(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), Error> {
    let len = username.chars().count();
    if len < USERNAME_MIN_LENGTH {
        return Err(Error::InvalidInput(format!(
            "username must be at least {USERNAME_MIN_LENGTH} characters"
        )));
    }
    if len > USERNAME_MAX_LENGTH {
        return Err(Error::InvalidInput(format!(
            "username must be at most {USERNAME_MAX_LENGTH} characters"
        )));
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(Error::InvalidInput(
            "username may only contain letters, digits and underscores".into(),
        ));
    }
    Ok(())
}

/// Validate the credentials of a sign-in/sign-up form. The optional fields
/// are only checked when present.
pub fn validate_credentials(
    email: &str,
    password: &str,
    username: Option<&str>,
    full_name: Option<&str>,
) -> Result<(), Error> {
    validate_email(email)?;
    validate_password(password)?;
    if let Some(username) = username {
        validate_username(username)?;
    }
    if let Some(full_name) = full_name
        && full_name.trim().chars().count() < FULL_NAME_MIN_LENGTH
    {
        return Err(Error::InvalidInput(format!(
            "full name must be at least {FULL_NAME_MIN_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a project create/update form.
pub fn validate_project_form(title: &str, description: &str, tech_stack: &[String]) -> Result<(), Error> {
    if title.trim().chars().count() < TITLE_MIN_LENGTH {
        return Err(Error::InvalidInput(format!(
            "title must be at least {TITLE_MIN_LENGTH} characters"
        )));
    }
    if description.trim().chars().count() < DESCRIPTION_MIN_LENGTH {
        return Err(Error::InvalidInput(format!(
            "description must be at least {DESCRIPTION_MIN_LENGTH} characters"
        )));
    }
    if tech_stack.is_empty() {
        return Err(Error::InvalidInput("at least one technology is required".into()));
    }
    Ok(())
}

/// Reject empty and sentinel identifiers before they reach the network.
/// A stringified `"null"`/`"undefined"` routing parameter is a bug upstream,
/// not a valid id.
pub fn validate_entity_id(id: &str) -> Result<(), Error> {
    if id.is_empty() || id == "null" || id == "undefined" {
        return Err(Error::InvalidInput("a valid identifier is required".into()));
    }
    Ok(())
}

/// Comment content must be non-empty after trimming and fit the server's
/// column size.
pub fn validate_comment(content: &str) -> Result<(), Error> {
    if content.trim().is_empty() {
        return Err(Error::InvalidInput("comment content is required".into()));
    }
    if content.chars().count() > COMMENT_MAX_LENGTH {
        return Err(Error::InvalidInput(format!(
            "comment must be at most {COMMENT_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional URL field; empty input is accepted.
pub fn validate_optional_url(value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Ok(());
    }
    url::Url::parse(value).map_err(|_| Error::InvalidInput(format!("not a valid URL: {value}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("dev@example.com").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "no-at-sign", "a@b", "spaces in@example.com"] {
            assert!(validate_email(email).is_err(), "{email:?} should be rejected");
        }
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("dev_one").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_credentials_optional_fields() {
        assert!(validate_credentials("dev@example.com", "secret", None, None).is_ok());
        assert!(validate_credentials("dev@example.com", "secret", Some("devone"), Some("Dev One")).is_ok());
        assert!(validate_credentials("dev@example.com", "secret", None, Some("D")).is_err());
        assert!(validate_credentials("dev@example.com", "secret", Some("a"), None).is_err());
    }

    #[test]
    fn test_project_form() {
        let stack = vec!["rust".to_string()];
        assert!(validate_project_form("Dash", "A service dashboard", &stack).is_ok());
        assert!(validate_project_form("ab", "A service dashboard", &stack).is_err());
        assert!(validate_project_form("Dash", "too short", &stack).is_err());
        assert!(validate_project_form("Dash", "A service dashboard", &[]).is_err());
    }

    #[test]
    fn test_entity_id_rejects_sentinels() {
        assert!(validate_entity_id("p-1").is_ok());
        for id in ["", "null", "undefined"] {
            assert!(validate_entity_id(id).is_err(), "{id:?} should be rejected");
        }
    }

    #[test]
    fn test_comment_content() {
        assert!(validate_comment("hello").is_ok());
        assert!(validate_comment("").is_err());
        assert!(validate_comment("   ").is_err());
        assert!(validate_comment(&"x".repeat(2001)).is_err());
    }

    #[test]
    fn test_optional_url() {
        assert!(validate_optional_url("").is_ok());
        assert!(validate_optional_url("https://example.com").is_ok());
        assert!(validate_optional_url("not a url").is_err());
    }
}
