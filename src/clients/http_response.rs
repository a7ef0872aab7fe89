//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type for accessing the status,
//! headers and JSON body of a management API response.

use std::collections::HashMap;
use std::time::Duration;

/// An HTTP response from the management API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_after: Option<Duration>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64);

        Self {
            code,
            headers,
            body,
            retry_after,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `x-ms-request-id` header value, if present.
    ///
    /// This id is useful for debugging and should be included in error reports.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-ms-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the continuation link of a paged list response.
    ///
    /// An empty `nextLink` is treated as absent.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.body
            .get("nextLink")
            .and_then(serde_json::Value::as_str)
            .filter(|link| !link.is_empty())
    }

    /// Returns the items of a paged list response (the `value` array).
    #[must_use]
    pub fn items(&self) -> Option<&Vec<serde_json::Value>> {
        self.body.get("value").and_then(serde_json::Value::as_array)
    }

    /// Builds a short error description from a management API error body:
    /// `{"error": {"code": "...", "message": "..."}}`.
    #[must_use]
    pub fn error_message(&self) -> String {
        let error = self.body.get("error");
        let code = error
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_str);
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str);

        match (code, message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code.to_string(),
            (None, Some(message)) => message.to_string(),
            (None, None) => self
                .body
                .get("raw_body")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| "no error details".to_string(), truncate_for_log),
        }
    }
}

/// Maximum length of a raw body kept in an error message.
const MAX_LOG_BODY_LENGTH: usize = 200;

fn truncate_for_log(body: &str) -> String {
    if body.len() <= MAX_LOG_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_LOG_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
}
