//! HTTP-specific error types.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the management API
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! Retry decisions are made by the caller through [`HttpError::is_retryable`];
//! the transport itself sends every request exactly once.

use std::time::Duration;
use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use resource_manager::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "ResourceGroupNotFound: Resource group 'rg' could not be found.".to_string(),
///     error_reference: Some("0f3c5a1e".to_string()),
///     retry_after: None,
/// };
///
/// assert!(error.to_string().contains("404"));
/// ```
#[derive(Debug, Error, Clone)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The error code and message extracted from the response body.
    pub message: String,
    /// Request id for error reporting (from the `x-ms-request-id` header).
    pub error_reference: Option<String>,
    /// Server-requested delay before retrying (from the `Retry-After` header).
    pub retry_after: Option<Duration>,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path is empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// An absolute URL points outside the configured endpoint.
    ///
    /// Continuation links are followed only when they stay on the endpoint
    /// origin, so the bearer token is never sent elsewhere.
    #[error("Refusing to send credentials to '{url}': it is outside the configured endpoint.")]
    ForeignUrl {
        /// The rejected URL.
        url: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response carried a body that is not valid JSON.
    #[error("Failed to decode response body: {message}")]
    Decode {
        /// The decoder error.
        message: String,
    },
}

impl HttpError {
    /// Returns `true` for failures worth retrying: network errors, request
    /// timeouts (408), throttling (429) and server errors (5xx).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Response(e) => matches!(e.code, 408 | 429 | 500..=599),
            Self::Network(_) => true,
            Self::InvalidRequest(_) | Self::Decode { .. } => false,
        }
    }

    /// Returns the server-requested retry delay, if any.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Response(e) => e.retry_after,
            _ => None,
        }
    }

    /// Returns the HTTP status code, if the failure was a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_error(code: u16) -> HttpError {
        HttpError::Response(HttpResponseError {
            code,
            message: "test".to_string(),
            error_reference: None,
            retry_after: None,
        })
    }

    #[test]
    fn test_http_response_error_includes_status_code_in_message() {
        let error = HttpResponseError {
            code: 403,
            message: "AuthorizationFailed: no access".to_string(),
            error_reference: None,
            retry_after: None,
        };
        assert_eq!(error.to_string(), "HTTP 403: AuthorizationFailed: no access");
    }

    #[test]
    fn test_server_errors_and_throttling_are_retryable() {
        for code in [408, 429, 500, 502, 503, 504] {
            assert!(response_error(code).is_retryable(), "{code} should retry");
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for code in [400, 401, 403, 404, 409] {
            assert!(!response_error(code).is_retryable(), "{code} should not retry");
        }
        assert!(!HttpError::from(InvalidHttpRequestError::EmptyPath).is_retryable());
        assert!(!HttpError::Decode {
            message: "eof".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_retry_after_and_status_accessors() {
        let error = HttpError::Response(HttpResponseError {
            code: 429,
            message: "TooManyRequests".to_string(),
            error_reference: None,
            retry_after: Some(Duration::from_secs(7)),
        });
        assert_eq!(error.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(error.status(), Some(429));
        assert_eq!(HttpError::from(InvalidHttpRequestError::EmptyPath).status(), None);
    }

    #[test]
    fn test_foreign_url_message() {
        let error = InvalidHttpRequestError::ForeignUrl {
            url: "https://evil.example.com/next".to_string(),
        };
        assert!(error.to_string().contains("evil.example.com"));
    }
}
