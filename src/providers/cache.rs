//! Shared, lazily populated cache of provider metadata.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ApiVersion;
use crate::error::ResourceManagerError;
use crate::providers::metadata::ProviderMetadata;

/// Cache mapping provider namespace to [`ProviderMetadata`].
///
/// Keys are case-insensitive. Entries are inserted fully built and are
/// never evicted, so a version published after the first fetch is not seen
/// for the lifetime of the cache.
///
/// The cache is a cheap handle: clones share the same entries.
///
/// # Concurrency
///
/// Lookups take a read lock. The fetch for a miss runs without holding any
/// lock, so concurrent misses for the same provider may each fetch; the
/// first insert wins and every caller receives the cached entry.
///
/// # Example
///
/// ```rust
/// use resource_manager::providers::{ProviderMetadata, ProviderMetadataCache};
/// use resource_manager::ResourceManagerError;
///
/// # tokio_test::block_on(async {
/// let cache = ProviderMetadataCache::new();
/// let version = cache
///     .resolve_version("Microsoft.Compute", "virtualMachines", || async {
///         Ok::<_, ResourceManagerError>(
///             ProviderMetadata::new("Microsoft.Compute")
///                 .with_type("virtualMachines", ["2023-03-01", "2024-07-01"]),
///         )
///     })
///     .await
///     .unwrap();
///
/// assert_eq!(version.as_str(), "2024-07-01");
/// assert!(cache.contains("microsoft.compute").await);
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProviderMetadataCache {
    entries: Arc<RwLock<HashMap<String, Arc<ProviderMetadata>>>>,
}

// Verify ProviderMetadataCache is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProviderMetadataCache>();
};

impl ProviderMetadataCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached metadata for `provider`, if present.
    pub async fn get(&self, provider: &str) -> Option<Arc<ProviderMetadata>> {
        self.entries.read().await.get(&cache_key(provider)).cloned()
    }

    /// Returns the cached metadata for `provider`, fetching and caching it
    /// on a miss.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`. Nothing is cached on error.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        provider: &str,
        fetch: F,
    ) -> Result<Arc<ProviderMetadata>, ResourceManagerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProviderMetadata, ResourceManagerError>>,
    {
        let key = cache_key(provider);
        if let Some(hit) = self.entries.read().await.get(&key) {
            tracing::debug!(provider, "provider metadata cache hit");
            return Ok(Arc::clone(hit));
        }

        tracing::debug!(provider, "provider metadata cache miss, fetching");
        let fetched = Arc::new(fetch().await?);

        let mut entries = self.entries.write().await;
        let entry = entries.entry(key).or_insert(fetched);
        Ok(Arc::clone(entry))
    }

    /// Resolves the newest API version `provider` supports for `type_name`.
    ///
    /// # Errors
    ///
    /// - Any error produced by `fetch` on a cache miss
    /// - [`ResourceManagerError::UnsupportedProviderType`] if the provider
    ///   does not list `type_name`, or lists it without versions
    pub async fn resolve_version<F, Fut>(
        &self,
        provider: &str,
        type_name: &str,
        fetch: F,
    ) -> Result<ApiVersion, ResourceManagerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProviderMetadata, ResourceManagerError>>,
    {
        let metadata = self.get_or_fetch(provider, fetch).await?;
        metadata.latest_version(type_name).cloned().ok_or_else(|| {
            ResourceManagerError::UnsupportedProviderType {
                provider: provider.to_string(),
                resource_type: type_name.to_string(),
            }
        })
    }

    /// Returns `true` if metadata for `provider` is cached.
    pub async fn contains(&self, provider: &str) -> bool {
        self.entries.read().await.contains_key(&cache_key(provider))
    }

    /// Returns the number of cached providers.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn cache_key(provider: &str) -> String {
    provider.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn compute() -> ProviderMetadata {
        ProviderMetadata::new("Microsoft.Compute")
            .with_type("virtualMachines", ["2019-01-01", "2021-06-01", "2020-03-01"])
            .with_type("disks", Vec::<String>::new())
    }

    #[tokio::test]
    async fn test_resolve_version_picks_newest() {
        let cache = ProviderMetadataCache::new();
        let version = cache
            .resolve_version("Microsoft.Compute", "virtualMachines", || async { Ok(compute()) })
            .await
            .unwrap();

        assert_eq!(version.as_str(), "2021-06-01");
    }

    #[tokio::test]
    async fn test_sequential_lookups_fetch_once() {
        let cache = ProviderMetadataCache::new();
        let fetches = AtomicUsize::new(0);

        for provider in ["Microsoft.Compute", "microsoft.compute", "MICROSOFT.COMPUTE"] {
            cache
                .get_or_fetch(provider, || {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    async { Ok(compute()) }
                })
                .await
                .unwrap();
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ProviderMetadataCache::new();
        let handle = cache.clone();

        cache
            .get_or_fetch("Microsoft.Compute", || async { Ok(compute()) })
            .await
            .unwrap();

        assert!(handle.contains("Microsoft.Compute").await);
        assert!(handle.get("microsoft.compute").await.is_some());
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = ProviderMetadataCache::new();

        let err = cache
            .get_or_fetch("Microsoft.Compute", || async {
                Err(ResourceManagerError::Cancelled)
            })
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_type_or_no_versions_is_unsupported() {
        let cache = ProviderMetadataCache::new();

        for type_name in ["availabilitySets", "disks"] {
            let err = cache
                .resolve_version("Microsoft.Compute", type_name, || async { Ok(compute()) })
                .await
                .unwrap_err();

            match err {
                ResourceManagerError::UnsupportedProviderType {
                    provider,
                    resource_type,
                } => {
                    assert_eq!(provider, "Microsoft.Compute");
                    assert_eq!(resource_type, type_name);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_first_insert_wins_for_racing_misses() {
        let cache = ProviderMetadataCache::new();

        let first = ProviderMetadata::new("Microsoft.Web").with_type("sites", ["2020-01-01"]);
        let second = ProviderMetadata::new("Microsoft.Web").with_type("sites", ["2024-01-01"]);

        let (a, b) = tokio::join!(
            cache.get_or_fetch("Microsoft.Web", || async { Ok(first) }),
            cache.get_or_fetch("Microsoft.Web", || async {
                tokio::task::yield_now().await;
                Ok(second)
            }),
        );

        let a = a.unwrap();
        let b = b.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.latest_version("sites").unwrap().as_str(), "2020-01-01");
    }
}
