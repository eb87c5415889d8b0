//! Unified error types for the devconnect client.
//!
//! Every layer funnels failures into [`Error`]: the HTTP client raises it,
//! endpoint wrappers map `success: false` envelopes into it, and the list
//! controllers catch it and convert it to their own error state so nothing
//! escapes to the view layer uncaught.

/// Unified error type for the devconnect client stack.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Client-side validation rejected the input before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server answered 2xx but the envelope carried `success: false`.
    #[error("{0}")]
    Api(String),

    /// Non-2xx HTTP response. The message is the server-supplied `error`
    /// field when present, otherwise `HTTP error! status: <code>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timeout")]
    Timeout,

    /// Response body could not be parsed as the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Durable token storage failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// 4xx responses: the request itself is wrong and must never be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Http { status, .. } if (400..500).contains(status))
    }

    /// Transient failures worth another attempt: network errors, timeouts,
    /// and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout => true,
            Error::Http { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Fallback message for a non-2xx response with no usable error body.
    pub fn http_fallback(status: u16) -> Self {
        Error::Http { status, message: format!("HTTP error! status: {status}") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = Error::http_fallback(404);
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let err = Error::http_fallback(503);
        assert!(!err.is_client_error());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_network_and_timeout_are_retryable() {
        assert!(Error::Network("connection refused".into()).is_retryable());
        assert!(Error::Timeout.is_retryable());
    }

    #[test]
    fn test_validation_and_parse_are_terminal() {
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
        assert!(!Error::Parse("bad json".into()).is_retryable());
    }

    #[test]
    fn test_http_fallback_message() {
        let err = Error::http_fallback(500);
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }
}
