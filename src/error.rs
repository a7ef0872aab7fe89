//! Error types for the resource manager client.
//!
//! This module contains [`ConfigError`] for configuration validation and
//! [`ResourceManagerError`], the error surfaced by every client operation.
//!
//! # Error Handling
//!
//! Client operations never downgrade a failure into an empty or default
//! result. Use [`ResourceManagerError::kind`] to branch on the failure
//! category without matching nested variants.
//!
//! # Example
//!
//! ```rust
//! use resource_manager::{ErrorKind, ResourceIdentity};
//!
//! let err = ResourceIdentity::parse("/not/a/resource").unwrap_err();
//! let err = resource_manager::ResourceManagerError::from(err);
//! assert_eq!(err.kind(), ErrorKind::MalformedResourceId);
//! ```

use crate::clients::HttpError;
use crate::identity::IdentityError;
use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a bearer token for the management API.")]
    EmptyAccessToken,

    /// Management endpoint is invalid.
    #[error("Invalid management endpoint '{url}'. Please provide an http(s) URL with a host (e.g., 'https://management.azure.com').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected a date-like token (e.g., '2021-04-01' or '2021-04-01-preview').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// Enumeration bound must be positive.
    #[error("Invalid max_items {value}: enumeration bound must be at least 1.")]
    InvalidMaxItems {
        /// The rejected bound.
        value: usize,
    },
}

/// Failure categories surfaced by client operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A string did not match any known scope template.
    MalformedResourceId,
    /// A resource type has no provider mapping, or the reverse.
    UnsupportedResourceType,
    /// Provider metadata lacks the requested type or any version for it.
    UnsupportedProviderType,
    /// An enumeration crossed its hard bound.
    TooManyResults,
    /// A remote call failed after retries were exhausted.
    DependencyFailure,
    /// The operation observed cancellation.
    Cancelled,
    /// The remote returned a body the client could not interpret.
    InvalidResponse,
}

/// Error type for resource manager operations.
#[derive(Debug, Error)]
pub enum ResourceManagerError {
    /// Identity formatting or parsing failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Provider metadata exists but does not list the requested type.
    #[error("Provider '{provider}' has no API version for resource type '{resource_type}'")]
    UnsupportedProviderType {
        /// The provider namespace that was queried.
        provider: String,
        /// The resource type name that was looked up.
        resource_type: String,
    },

    /// Enumeration exceeded its hard bound; no partial result is returned.
    #[error("Enumeration of {label} exceeded the maximum of {max_items} results")]
    TooManyResults {
        /// The enumeration label, for diagnostics.
        label: String,
        /// The bound that was crossed.
        max_items: usize,
    },

    /// A remote call failed after the retry policy gave up.
    #[error("Dependency call {dependency}/{command} failed after {attempts} attempt(s): {source}")]
    DependencyFailure {
        /// The dependency that was called.
        dependency: String,
        /// The command label of the call.
        command: String,
        /// How many attempts were made.
        attempts: u32,
        /// The final transport or status error.
        #[source]
        source: HttpError,
    },

    /// The operation was cancelled before it completed.
    #[error("Operation was cancelled")]
    Cancelled,

    /// A remote response was missing data the client requires.
    #[error("Invalid response from {command}: {reason}")]
    InvalidResponse {
        /// The command whose response was rejected.
        command: String,
        /// What was wrong with the body.
        reason: String,
    },
}

impl ResourceManagerError {
    /// Returns the failure category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Identity(IdentityError::MalformedResourceId { .. } | IdentityError::InvalidIdentity { .. }) => {
                ErrorKind::MalformedResourceId
            }
            Self::Identity(IdentityError::UnsupportedResourceType { .. }) => {
                ErrorKind::UnsupportedResourceType
            }
            Self::UnsupportedProviderType { .. } => ErrorKind::UnsupportedProviderType,
            Self::TooManyResults { .. } => ErrorKind::TooManyResults,
            Self::DependencyFailure { .. } => ErrorKind::DependencyFailure,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    /// Returns `true` if the operation was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_invalid_endpoint_error_message() {
        let error = ConfigError::InvalidEndpoint {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("https://management.azure.com"));
    }

    #[test]
    fn test_too_many_results_message_includes_label_and_bound() {
        let error = ResourceManagerError::TooManyResults {
            label: "resource groups".to_string(),
            max_items: 100,
        };
        let message = error.to_string();
        assert!(message.contains("resource groups"));
        assert!(message.contains("100"));
        assert_eq!(error.kind(), ErrorKind::TooManyResults);
    }

    #[test]
    fn test_dependency_failure_carries_source() {
        let error = ResourceManagerError::DependencyFailure {
            dependency: "ResourceManager".to_string(),
            command: "list_resource_groups".to_string(),
            attempts: 4,
            source: HttpError::Response(HttpResponseError {
                code: 503,
                message: "Service Unavailable".to_string(),
                error_reference: None,
                retry_after: None,
            }),
        };
        assert_eq!(error.kind(), ErrorKind::DependencyFailure);
        assert!(error.to_string().contains("list_resource_groups"));
        assert!(error.to_string().contains("4 attempt(s)"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_identity_errors_map_to_kinds() {
        let malformed: ResourceManagerError = IdentityError::MalformedResourceId {
            id: "/bad".to_string(),
        }
        .into();
        assert_eq!(malformed.kind(), ErrorKind::MalformedResourceId);

        let unsupported: ResourceManagerError = IdentityError::UnsupportedResourceType {
            resource_type: "Contoso.Widgets/gadgets".to_string(),
        }
        .into();
        assert_eq!(unsupported.kind(), ErrorKind::UnsupportedResourceType);
    }

    #[test]
    fn test_cancelled_is_distinct_from_dependency_failure() {
        let error = ResourceManagerError::Cancelled;
        assert!(error.is_cancelled());
        assert_ne!(error.kind(), ErrorKind::DependencyFailure);
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyAccessToken;
        let _: &dyn std::error::Error = &error;
        let error = ResourceManagerError::Cancelled;
        let _: &dyn std::error::Error = &error;
    }
}
