//! Retrying, cancellable, telemetered execution of remote calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::clients::HttpError;
use crate::error::ResourceManagerError;
use crate::resilience::retry::RetryPolicy;
use crate::resilience::telemetry::{DependencyCall, TelemetrySink, TracingTelemetry};

/// Executes remote calls under a [`RetryPolicy`], reporting each logical
/// call to a [`TelemetrySink`].
///
/// Every call to [`ResilientInvoker::invoke`] produces exactly one
/// [`DependencyCall`], tagged with the caller-supplied command name and
/// covering all attempts.
///
/// # Example
///
/// ```rust
/// use resource_manager::resilience::{ResilientInvoker, RetryPolicy};
/// use resource_manager::clients::HttpError;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let invoker = ResilientInvoker::new("ResourceManager", RetryPolicy::no_retry());
/// let cancel = CancellationToken::new();
///
/// let value = invoker
///     .invoke("Answer", &cancel, || async { Ok::<_, HttpError>(42) })
///     .await
///     .unwrap();
/// assert_eq!(value, 42);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct ResilientInvoker {
    dependency: String,
    policy: RetryPolicy,
    telemetry: Arc<dyn TelemetrySink>,
}

// Verify ResilientInvoker is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResilientInvoker>();
};

impl ResilientInvoker {
    /// Creates an invoker that reports to [`TracingTelemetry`].
    #[must_use]
    pub fn new(dependency: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            dependency: dependency.into(),
            policy,
            telemetry: Arc::new(TracingTelemetry),
        }
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns the dependency name used in telemetry.
    #[must_use]
    pub fn dependency(&self) -> &str {
        &self.dependency
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the telemetry sink.
    #[must_use]
    pub fn telemetry(&self) -> &Arc<dyn TelemetrySink> {
        &self.telemetry
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the retry policy is exhausted.
    ///
    /// Cancellation is observed before each attempt, while an attempt is in
    /// flight, and during backoff.
    ///
    /// # Errors
    ///
    /// - [`ResourceManagerError::Cancelled`] if `cancel` fires first
    /// - [`ResourceManagerError::DependencyFailure`] carrying the last
    ///   [`HttpError`] once no further attempt is allowed
    pub async fn invoke<T, F, Fut>(
        &self,
        command: &str,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, ResourceManagerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, HttpError>>,
    {
        let start = Utc::now();
        let started = Instant::now();
        let mut attempts: u32 = 0;

        let result = loop {
            if cancel.is_cancelled() {
                break Err(ResourceManagerError::Cancelled);
            }

            attempts += 1;
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                outcome = operation() => Some(outcome),
            };
            let Some(outcome) = outcome else {
                break Err(ResourceManagerError::Cancelled);
            };

            let error = match outcome {
                Ok(value) => break Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() || !self.policy.allows_attempt_after(attempts) {
                break Err(ResourceManagerError::DependencyFailure {
                    dependency: self.dependency.clone(),
                    command: command.to_string(),
                    attempts,
                    source: error,
                });
            }

            let delay = self.policy.delay_before_retry(attempts, error.retry_after());
            tracing::warn!(
                dependency = %self.dependency,
                command,
                attempt = attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "transient dependency failure, retrying"
            );

            let cancelled = tokio::select! {
                biased;
                () = cancel.cancelled() => true,
                () = tokio::time::sleep(delay) => false,
            };
            if cancelled {
                break Err(ResourceManagerError::Cancelled);
            }
        };

        self.telemetry.track_dependency(&DependencyCall {
            dependency: self.dependency.clone(),
            command: command.to_string(),
            start,
            duration: started.elapsed(),
            attempts,
            success: result.is_ok(),
        });

        result
    }
}
