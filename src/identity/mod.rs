//! Resource identity model.
//!
//! This module provides the structured address of a cloud resource and its
//! conversion to and from the canonical resource id string. No I/O happens
//! here.
//!
//! # Overview
//!
//! - [`ResourceType`]: The closed set of addressable resource kinds, with the
//!   fixed mapping to provider-qualified type strings
//! - [`ResourceIdentity`]: A subscription, resource group, or resource address
//! - [`IdentityError`]: Malformed ids and unsupported types
//!
//! # Example
//!
//! ```rust
//! use resource_manager::identity::{ResourceIdentity, ResourceType};
//!
//! let id = "/subscriptions/S/resourceGroups/G/providers/Microsoft.Web/sites/shop";
//! let identity = ResourceIdentity::parse(id).unwrap();
//!
//! assert_eq!(identity.resource_type(), ResourceType::WebSite);
//! assert_eq!(identity.resource_name(), "shop");
//! ```

mod errors;
mod resource_id;
mod resource_type;

pub use errors::IdentityError;
pub use resource_id::ResourceIdentity;
pub use resource_type::ResourceType;
