//! The resource manager client facade.
//!
//! [`ResourceManagerClient`] composes identity conversion, bounded
//! enumeration, provider version resolution and resilient invocation into
//! the operations callers use:
//!
//! - [`ResourceManagerClient::list_subscriptions`]
//! - [`ResourceManagerClient::list_resource_groups`]
//! - [`ResourceManagerClient::list_resources`] and
//!   [`ResourceManagerClient::list_resources_in_group`]
//! - [`ResourceManagerClient::get_resource_properties`]
//!
//! Each enumeration returns either the complete listing or an error; a
//! listing that reaches the configured bound fails with
//! [`crate::ResourceManagerError::TooManyResults`] instead of truncating.

mod client;
mod models;

pub use client::{ResourceManagerClient, DEPENDENCY_NAME};
pub use models::ResourceProperties;
