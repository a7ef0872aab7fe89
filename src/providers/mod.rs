//! Resource provider metadata and API version resolution.
//!
//! Every resource read must name an API version the provider supports for
//! that resource type. This module keeps the per-provider version lists in a
//! [`ProviderMetadataCache`] and picks the newest version on request.
//!
//! # Overview
//!
//! - [`ProviderMetadata`]: Resource types and their versions for one provider
//! - [`ProviderMetadataCache`]: Case-insensitive, insert-if-absent cache
//!   shared by all clones of a handle
//!
//! Versions are ordered by [`crate::ApiVersion`]'s numeric ordering, so
//! `2021-06-01` is newer than `2020-03-01` and a stable version is newer
//! than a preview of the same date.

mod cache;
mod metadata;

pub use cache::ProviderMetadataCache;
pub use metadata::ProviderMetadata;
