//! # Resource Manager Client
//!
//! A Rust client for hierarchical cloud resource management APIs, providing
//! resource identity conversion, bounded enumeration, and per-type API
//! version resolution.
//!
//! ## Overview
//!
//! This crate provides:
//! - A typed resource identity model ([`ResourceIdentity`], [`ResourceType`])
//!   with canonical id formatting and parsing
//! - Enumeration of subscriptions, resource groups and resources with a hard
//!   bound on the number of results
//! - API version resolution per resource type through a shared
//!   [`providers::ProviderMetadataCache`]
//! - Retries with exponential backoff, dependency telemetry, and
//!   cancellation for every remote call
//!
//! ## Quick Start
//!
//! ```rust
//! use resource_manager::{ResourceIdentity, ResourceType};
//!
//! let vm = ResourceIdentity::resource(
//!     ResourceType::VirtualMachine,
//!     "7904b7bd-5e6b-4415-99a8-355657b7da19",
//!     "MyResourceGroupName",
//!     "MyVM",
//! )
//! .unwrap();
//!
//! let id = vm.to_canonical_string().unwrap();
//! assert_eq!(
//!     id,
//!     "/subscriptions/7904b7bd-5e6b-4415-99a8-355657b7da19/resourceGroups/MyResourceGroupName/providers/Microsoft.Compute/virtualMachines/MyVM"
//! );
//! assert_eq!(ResourceIdentity::parse(&id).unwrap(), vm);
//! ```
//!
//! ## Enumerating Resources
//!
//! ```rust,no_run
//! use resource_manager::{AccessToken, ManagerConfig, ResourceManagerClient, ResourceType};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), resource_manager::ResourceManagerError> {
//! let config = ManagerConfig::builder().max_items(10_000).build().unwrap();
//! let client = ResourceManagerClient::new(config, &AccessToken::new("token").unwrap());
//! let cancel = CancellationToken::new();
//!
//! let groups = client.list_resource_groups("my-subscription", &cancel).await?;
//! let storage = client
//!     .list_resources("my-subscription", &[ResourceType::StorageAccount], &cancel)
//!     .await?;
//! println!("{} groups, {} storage accounts", groups.len(), storage.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration, the provider cache and the telemetry
//!   sink are instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and identities validate on construction
//! - **No silent truncation**: Enumerations either complete or fail
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime; every
//!   operation takes a [`tokio_util::sync::CancellationToken`]

pub mod clients;
pub mod config;
pub mod error;
pub mod identity;
pub mod manager;
pub mod pagination;
pub mod providers;
pub mod resilience;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiVersion, ManagementEndpoint, ManagerConfig, ManagerConfigBuilder};
pub use error::{ConfigError, ErrorKind, ResourceManagerError};
pub use identity::{IdentityError, ResourceIdentity, ResourceType};
pub use manager::{ResourceManagerClient, ResourceProperties};
pub use pagination::Page;
pub use providers::{ProviderMetadata, ProviderMetadataCache};
pub use resilience::{DependencyCall, ResilientInvoker, RetryPolicy, TelemetrySink};
