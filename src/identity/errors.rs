//! Identity-specific error types.

use thiserror::Error;

/// Error type for resource identity construction, formatting and parsing.
///
/// # Example
///
/// ```rust
/// use resource_manager::identity::{IdentityError, ResourceIdentity};
///
/// let result = ResourceIdentity::parse("/subscriptions");
/// assert!(matches!(result, Err(IdentityError::MalformedResourceId { .. })));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The string does not match any known scope template.
    #[error("Malformed resource id '{id}'. Expected '/subscriptions/{{id}}[/resourceGroups/{{name}}[/providers/{{namespace}}/{{type}}/{{name}}]]'.")]
    MalformedResourceId {
        /// The id that failed to parse.
        id: String,
    },

    /// A resource type has no provider mapping, or a provider-qualified type
    /// string has no resource type mapping.
    #[error("Unsupported resource type '{resource_type}'")]
    UnsupportedResourceType {
        /// The resource type or provider-qualified type string.
        resource_type: String,
    },

    /// Field values violate the identity invariants for their scope.
    #[error("Invalid resource identity: {reason}")]
    InvalidIdentity {
        /// Which invariant was violated.
        reason: String,
    },
}
