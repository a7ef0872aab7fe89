//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] type and its builder. The client
//! only reads from the management API, so every request is a `GET`.

use std::collections::BTreeMap;

use crate::clients::errors::InvalidHttpRequestError;
use crate::config::ApiVersion;

/// A read request to be sent to the management API.
///
/// `path` is either relative to the configured endpoint (e.g.
/// `/subscriptions/S/resourcegroups`) or an absolute continuation URL
/// returned by a previous page.
///
/// # Example
///
/// ```rust
/// use resource_manager::clients::HttpRequest;
///
/// let request = HttpRequest::builder("/subscriptions/S/resourcegroups")
///     .api_version(&"2021-04-01".parse().unwrap())
///     .query_param("$top", "100")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.query.get("api-version").map(String::as_str), Some("2021-04-01"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// The path or absolute URL for this request.
    pub path: String,
    /// Query parameters to append to the URL.
    pub query: BTreeMap<String, String>,
    /// Additional headers to include in the request.
    pub extra_headers: BTreeMap<String, String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(path)
    }

    /// Returns `true` if `path` is an absolute URL.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with("https://") || self.path.starts_with("http://")
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::EmptyPath`] if the path is empty.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }
        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    path: String,
    query: BTreeMap<String, String>,
    extra_headers: BTreeMap<String, String>,
}

impl HttpRequestBuilder {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
            extra_headers: BTreeMap::new(),
        }
    }

    /// Sets the `api-version` query parameter.
    #[must_use]
    pub fn api_version(self, version: &ApiVersion) -> Self {
        self.query_param("api-version", version.as_str())
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            path: self.path,
            query: self.query,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}
