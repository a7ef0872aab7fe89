//! Bounded cursor pagination.
//!
//! This module drives a "first page / next page" cursor protocol into a
//! single list, failing hard once a configured bound is reached.
//!
//! # How It Works
//!
//! 1. The first page is fetched.
//! 2. Its items are appended to the accumulator.
//! 3. If the accumulator holds `max_items` or more items, enumeration fails
//!    with [`ResourceManagerError::TooManyResults`]. No partial list is returned.
//! 4. If the page was empty or carried no continuation, the accumulator is
//!    returned.
//! 5. Otherwise the next page is fetched with the continuation and the loop
//!    repeats from step 2.
//!
//! Pages are fetched strictly in order. An empty page ends enumeration even
//! when the remote returns a continuation with it.
//!
//! # Example
//!
//! ```rust
//! use resource_manager::pagination::{collect_all, Page};
//! use resource_manager::ResourceManagerError;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let cancel = CancellationToken::new();
//! let items = collect_all(
//!     || async { Ok::<_, ResourceManagerError>(Page::new(vec![1, 2], Some("p2".to_string()))) },
//!     |cursor| async move {
//!         assert_eq!(cursor, "p2");
//!         Ok(Page::last(vec![3]))
//!     },
//!     100,
//!     "numbers",
//!     &cancel,
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(items, vec![1, 2, 3]);
//! # });
//! ```

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ResourceManagerError;

/// One page of a paged listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    /// The items on this page, in remote order.
    pub items: Vec<T>,
    /// Opaque cursor for the next page, if any.
    pub continuation: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page. An empty continuation string is treated as absent.
    #[must_use]
    pub fn new(items: Vec<T>, continuation: Option<String>) -> Self {
        Self {
            items,
            continuation: continuation.filter(|c| !c.is_empty()),
        }
    }

    /// Creates a page with no continuation.
    #[must_use]
    pub const fn last(items: Vec<T>) -> Self {
        Self {
            items,
            continuation: None,
        }
    }

    /// Returns `true` if another page should be requested after this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        !self.items.is_empty() && self.continuation.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Collects every page into one list, bounded by `max_items`.
///
/// `label` names the enumeration in errors and logs. Cancellation is
/// checked before each page fetch and raced against the fetch itself.
///
/// # Errors
///
/// - [`ResourceManagerError::TooManyResults`] once `max_items` items have
///   been accumulated; no further page is requested
/// - [`ResourceManagerError::Cancelled`] if `cancel` fires
/// - Any error returned by `first` or `next`, unchanged
pub async fn collect_all<T, First, FirstFut, Next, NextFut>(
    first: First,
    mut next: Next,
    max_items: usize,
    label: &str,
    cancel: &CancellationToken,
) -> Result<Vec<T>, ResourceManagerError>
where
    First: FnOnce() -> FirstFut,
    FirstFut: Future<Output = Result<Page<T>, ResourceManagerError>>,
    Next: FnMut(String) -> NextFut,
    NextFut: Future<Output = Result<Page<T>, ResourceManagerError>>,
{
    let mut accumulated: Vec<T> = Vec::new();
    ensure_not_cancelled(cancel)?;
    let mut page = fetch_page(first(), cancel).await?;
    let mut pages: usize = 1;

    loop {
        let has_next = page.has_next_page();
        accumulated.extend(page.items);

        if accumulated.len() >= max_items {
            tracing::warn!(
                label,
                max_items,
                pages,
                "enumeration reached its bound, failing without partial results"
            );
            return Err(ResourceManagerError::TooManyResults {
                label: label.to_string(),
                max_items,
            });
        }

        let continuation = match page.continuation {
            Some(continuation) if has_next => continuation,
            _ => break,
        };

        ensure_not_cancelled(cancel)?;
        page = fetch_page(next(continuation), cancel).await?;
        pages += 1;
    }

    tracing::debug!(label, pages, items = accumulated.len(), "enumeration complete");
    Ok(accumulated)
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), ResourceManagerError> {
    if cancel.is_cancelled() {
        return Err(ResourceManagerError::Cancelled);
    }
    Ok(())
}

async fn fetch_page<T, Fut>(
    fetch: Fut,
    cancel: &CancellationToken,
) -> Result<Page<T>, ResourceManagerError>
where
    Fut: Future<Output = Result<Page<T>, ResourceManagerError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ResourceManagerError::Cancelled),
        page = fetch => page,
    }
}
