//! HTTP transport for the management API.
//!
//! This module provides the foundational HTTP layer for making authenticated
//! read requests to the management API. It handles URL construction, header
//! injection, response parsing, and error classification.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A `GET` request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpError`]: Unified error type, with [`HttpError::is_retryable`]
//!
//! # Retry Behavior
//!
//! [`HttpClient::request`] sends each request exactly once. Transient
//! failures (network errors, 408, 429 and 5xx) are classified as retryable,
//! and [`crate::resilience::ResilientInvoker`] decides whether and when to
//! try again.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
