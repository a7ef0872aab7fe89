//! Configuration types for the resource manager client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ManagerConfig`]: Settings shared by every call a client makes
//! - [`ManagerConfigBuilder`]: A builder for constructing [`ManagerConfig`] instances
//! - [`ManagementEndpoint`]: A validated management API base URL
//! - [`AccessToken`]: A bearer token with masked debug output
//! - [`ApiVersion`]: A date-like API version token with numeric ordering
//!
//! # Example
//!
//! ```rust
//! use resource_manager::{ManagerConfig, ManagementEndpoint};
//!
//! let config = ManagerConfig::builder()
//!     .endpoint(ManagementEndpoint::new("https://management.azure.com").unwrap())
//!     .max_items(5_000)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_items(), 5_000);
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccessToken, ManagementEndpoint};
pub use version::ApiVersion;

use crate::error::ConfigError;
use crate::resilience::RetryPolicy;

/// Default hard bound on the number of items a single enumeration may return.
pub const DEFAULT_MAX_ITEMS: usize = 1_000;

/// Default API version for listing subscriptions.
pub const DEFAULT_SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";

/// Default API version for listing resource groups and resources, and for
/// reading provider metadata.
pub const DEFAULT_RESOURCES_API_VERSION: &str = "2021-04-01";

/// Configuration for the resource manager client.
///
/// # Thread Safety
///
/// `ManagerConfig` is `Clone`, `Send`, and `Sync`, so one configuration can
/// back a client per subscription.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    endpoint: ManagementEndpoint,
    max_items: usize,
    retry_policy: RetryPolicy,
    user_agent_prefix: Option<String>,
    subscriptions_api_version: ApiVersion,
    resources_api_version: ApiVersion,
}

impl ManagerConfig {
    /// Creates a new builder for constructing a `ManagerConfig`.
    #[must_use]
    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder::new()
    }

    /// Returns the management API endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &ManagementEndpoint {
        &self.endpoint
    }

    /// Returns the hard bound applied to every enumeration.
    #[must_use]
    pub const fn max_items(&self) -> usize {
        self.max_items
    }

    /// Returns the retry policy applied to every remote call.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the API version used to list subscriptions.
    #[must_use]
    pub const fn subscriptions_api_version(&self) -> &ApiVersion {
        &self.subscriptions_api_version
    }

    /// Returns the API version used to list resource groups and resources,
    /// and to read provider metadata.
    #[must_use]
    pub const fn resources_api_version(&self) -> &ApiVersion {
        &self.resources_api_version
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            endpoint: ManagementEndpoint::default(),
            max_items: DEFAULT_MAX_ITEMS,
            retry_policy: RetryPolicy::default(),
            user_agent_prefix: None,
            subscriptions_api_version: default_version(DEFAULT_SUBSCRIPTIONS_API_VERSION),
            resources_api_version: default_version(DEFAULT_RESOURCES_API_VERSION),
        }
    }
}

fn default_version(version: &str) -> ApiVersion {
    ApiVersion::new(version).expect("built-in API version constants are valid")
}

// Verify ManagerConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ManagerConfig>();
};

/// Builder for constructing [`ManagerConfig`] instances.
///
/// Every field has a default, so `ManagerConfig::builder().build()` yields a
/// configuration targeting the public cloud.
///
/// # Defaults
///
/// - `endpoint`: [`ManagementEndpoint::PUBLIC_CLOUD`]
/// - `max_items`: [`DEFAULT_MAX_ITEMS`]
/// - `retry_policy`: [`RetryPolicy::default`]
/// - `subscriptions_api_version`: [`DEFAULT_SUBSCRIPTIONS_API_VERSION`]
/// - `resources_api_version`: [`DEFAULT_RESOURCES_API_VERSION`]
#[derive(Debug, Default)]
pub struct ManagerConfigBuilder {
    endpoint: Option<ManagementEndpoint>,
    max_items: Option<usize>,
    retry_policy: Option<RetryPolicy>,
    user_agent_prefix: Option<String>,
    subscriptions_api_version: Option<ApiVersion>,
    resources_api_version: Option<ApiVersion>,
}

impl ManagerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the management API endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: ManagementEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the hard bound applied to every enumeration.
    #[must_use]
    pub const fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Sets the retry policy for remote calls.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the API version used to list subscriptions.
    #[must_use]
    pub fn subscriptions_api_version(mut self, version: ApiVersion) -> Self {
        self.subscriptions_api_version = Some(version);
        self
    }

    /// Sets the API version used for resource listings and provider metadata.
    #[must_use]
    pub fn resources_api_version(mut self, version: ApiVersion) -> Self {
        self.resources_api_version = Some(version);
        self
    }

    /// Builds the [`ManagerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxItems`] if `max_items` is zero.
    pub fn build(self) -> Result<ManagerConfig, ConfigError> {
        let defaults = ManagerConfig::default();

        let max_items = self.max_items.unwrap_or(defaults.max_items);
        if max_items == 0 {
            return Err(ConfigError::InvalidMaxItems { value: max_items });
        }

        Ok(ManagerConfig {
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            max_items,
            retry_policy: self.retry_policy.unwrap_or(defaults.retry_policy),
            user_agent_prefix: self.user_agent_prefix,
            subscriptions_api_version: self
                .subscriptions_api_version
                .unwrap_or(defaults.subscriptions_api_version),
            resources_api_version: self
                .resources_api_version
                .unwrap_or(defaults.resources_api_version),
        })
    }
}
