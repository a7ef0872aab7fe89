//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A bearer token for the management API.
///
/// Token acquisition happens elsewhere; this type only carries an already
/// issued token and masks it in debug output to prevent accidental exposure
/// in logs.
///
/// # Example
///
/// ```rust
/// use resource_manager::AccessToken;
///
/// let token = AccessToken::new("eyJ0eXAi...").unwrap();
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated management API endpoint.
///
/// The endpoint must carry an `http` or `https` scheme and a host. A trailing
/// slash is stripped so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use resource_manager::ManagementEndpoint;
///
/// let endpoint = ManagementEndpoint::new("https://management.azure.com/").unwrap();
/// assert_eq!(endpoint.as_ref(), "https://management.azure.com");
/// assert_eq!(endpoint.scheme(), "https");
/// assert_eq!(endpoint.host_name(), "management.azure.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagementEndpoint {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl ManagementEndpoint {
    /// The public cloud management endpoint.
    pub const PUBLIC_CLOUD: &'static str = "https://management.azure.com";

    /// Creates a new validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the URL is not an
    /// `http`/`https` URL with a host, or carries a query or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidEndpoint { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;

        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("https") && !scheme.eq_ignore_ascii_case("http") {
            return Err(invalid());
        }

        if url.contains(['?', '#']) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Returns the scheme, host and port, without any base path.
    #[must_use]
    pub fn origin(&self) -> &str {
        let path_start = self.url[self.host_start..]
            .find('/')
            .map_or(self.url.len(), |i| self.host_start + i);
        &self.url[..path_start]
    }
}

impl Default for ManagementEndpoint {
    fn default() -> Self {
        Self {
            url: Self::PUBLIC_CLOUD.to_string(),
            scheme_end: 5,
            host_start: 8,
            host_end: Self::PUBLIC_CLOUD.len(),
        }
    }
}

impl AsRef<str> for ManagementEndpoint {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ManagementEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for ManagementEndpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for ManagementEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
