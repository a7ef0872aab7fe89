//! HTTP client for management API communication.
//!
//! This module provides the [`HttpClient`] type for sending authenticated,
//! single-attempt read requests to the management API. Retries, backoff and
//! telemetry are layered on top by [`crate::resilience::ResilientInvoker`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::config::{AccessToken, ManagerConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the management API.
///
/// The client handles:
/// - URL construction from the configured endpoint, or validation of an
///   absolute continuation URL against the endpoint origin
/// - Default headers including User-Agent and the bearer token
/// - JSON body parsing and error message extraction
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,no_run
/// use resource_manager::{AccessToken, ManagerConfig};
/// use resource_manager::clients::{HttpClient, HttpRequest};
///
/// # async fn run() -> Result<(), resource_manager::clients::HttpError> {
/// let token = AccessToken::new("token").unwrap();
/// let client = HttpClient::new(&ManagerConfig::default(), &token);
///
/// let request = HttpRequest::builder("/subscriptions")
///     .api_version(&"2020-01-01".parse().unwrap())
///     .build()?;
///
/// let response = client.request(request).await?;
/// println!("{}", response.body);
/// # Ok(())
/// # }
/// ```
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Endpoint base URL without trailing slash (e.g., `https://management.azure.com`).
    base_uri: String,
    /// Scheme, host and port of the endpoint.
    origin: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: BTreeMap<&str, &str> = self
            .default_headers
            .iter()
            .map(|(name, value)| {
                let value = if name.eq_ignore_ascii_case("authorization") {
                    "*****"
                } else {
                    value.as_str()
                };
                (name.as_str(), value)
            })
            .collect();

        f.debug_struct("HttpClient")
            .field("base_uri", &self.base_uri)
            .field("origin", &self.origin)
            .field("default_headers", &headers)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a new HTTP client for the configured endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &ManagerConfig, token: &AccessToken) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Resource Manager Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.as_ref()),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_uri: config.endpoint().as_ref().to_string(),
            origin: config.endpoint().origin().to_string(),
            default_headers,
        }
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Resolves the full URL a request will be sent to.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::ForeignUrl`] if the request carries
    /// an absolute URL outside the endpoint origin.
    pub fn resolve_url(&self, request: &HttpRequest) -> Result<String, InvalidHttpRequestError> {
        if request.is_absolute() {
            if !self.is_same_origin(&request.path) {
                return Err(InvalidHttpRequestError::ForeignUrl {
                    url: request.path.clone(),
                });
            }
            return Ok(request.path.clone());
        }

        let path = request.path.trim();
        if path.starts_with('/') {
            Ok(format!("{}{path}", self.base_uri))
        } else {
            Ok(format!("{}/{path}", self.base_uri))
        }
    }

    fn is_same_origin(&self, url: &str) -> bool {
        let Some(prefix) = url.get(..self.origin.len()) else {
            return false;
        };
        if !prefix.eq_ignore_ascii_case(&self.origin) {
            return false;
        }
        matches!(url.as_bytes().get(self.origin.len()), None | Some(b'/' | b'?'))
    }

    /// Sends a single `GET` request to the management API.
    ///
    /// The request is attempted exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails or the URL is foreign (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - A 2xx body is not valid JSON (`Decode`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;
        let url = self.resolve_url(&request)?;

        let mut req_builder = self.client.get(&url);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        for (key, value) in &request.extra_headers {
            req_builder = req_builder.header(key, value);
        }
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let success = (200..=299).contains(&code);

        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            match serde_json::from_str(&body_text) {
                Ok(body) => body,
                Err(e) if success => {
                    return Err(HttpError::Decode {
                        message: e.to_string(),
                    });
                }
                Err(_) => serde_json::json!({ "raw_body": body_text }),
            }
        };

        let response = HttpResponse::new(code, res_headers, body);

        tracing::debug!(
            status = code,
            path = %request.path,
            request_id = response.request_id().unwrap_or("-"),
            "management API response"
        );

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: response.error_message(),
            error_reference: response.request_id().map(String::from),
            retry_after: response.retry_after,
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManagementEndpoint;

    fn client_for(endpoint: &str) -> HttpClient {
        let config = ManagerConfig::builder()
            .endpoint(ManagementEndpoint::new(endpoint).unwrap())
            .user_agent_prefix("Inventory/2.0")
            .build()
            .unwrap();
        HttpClient::new(&config, &AccessToken::new("secret-token").unwrap())
    }

    #[test]
    fn test_default_headers() {
        let client = client_for("https://management.azure.com");
        let headers = client.default_headers();

        assert_eq!(headers["Authorization"], "Bearer secret-token");
        assert_eq!(headers["Accept"], "application/json");
        assert!(headers["User-Agent"].starts_with("Inventory/2.0 | Resource Manager Library v"));
    }

    #[test]
    fn test_debug_output_masks_bearer_token() {
        let client = client_for("https://management.azure.com");
        let debug = format!("{client:?}");

        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("Authorization"));
        assert!(debug.contains("*****"));
        assert!(debug.contains("https://management.azure.com"));
    }

    #[test]
    fn test_relative_path_is_joined_to_endpoint() {
        let client = client_for("https://management.azure.com/");
        let request = HttpRequest::builder("/subscriptions").build().unwrap();
        assert_eq!(
            client.resolve_url(&request).unwrap(),
            "https://management.azure.com/subscriptions"
        );

        let request = HttpRequest::builder("subscriptions").build().unwrap();
        assert_eq!(
            client.resolve_url(&request).unwrap(),
            "https://management.azure.com/subscriptions"
        );
    }

    #[test]
    fn test_same_origin_continuation_is_accepted() {
        let client = client_for("https://management.azure.com");
        let next = "https://management.azure.com/subscriptions/S/resources?api-version=2021-04-01&$skiptoken=x";
        let request = HttpRequest::builder(next).build().unwrap();
        assert_eq!(client.resolve_url(&request).unwrap(), next);
    }

    #[test]
    fn test_foreign_continuation_is_rejected() {
        let client = client_for("https://management.azure.com");
        for url in [
            "https://evil.example.com/subscriptions",
            "https://management.azure.com.evil.example.com/subscriptions",
            "http://management.azure.com/subscriptions",
        ] {
            let request = HttpRequest::builder(url).build().unwrap();
            assert!(
                matches!(
                    client.resolve_url(&request),
                    Err(InvalidHttpRequestError::ForeignUrl { .. })
                ),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
