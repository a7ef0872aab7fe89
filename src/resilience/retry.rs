//! Backoff and attempt budget for management API calls.
//!
//! The management API throttles per subscription and per tenant and answers
//! throttled or overloaded calls with `429`/`503`, usually with a
//! `Retry-After` header. [`RetryPolicy`] decides how long to wait before the
//! next attempt and how many attempts a single logical call may use.
//!
//! # Delay Selection
//!
//! 1. If the failed response carried `Retry-After`, wait that long.
//! 2. Otherwise wait `initial_delay * backoff_factor^(retry - 1)`, spread by
//!    up to `jitter` in either direction so parallel enumerations against the
//!    same subscription do not retry in lockstep.
//! 3. Either way, never wait longer than `max_delay`.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attempt budget and backoff schedule for one dependency.
///
/// Deserializes with every field optional, so an application config file
/// only needs to name the values it overrides.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use resource_manager::resilience::RetryPolicy;
///
/// let policy = RetryPolicy::default()
///     .with_max_retries(5)
///     .with_max_delay(Duration::from_secs(10));
///
/// // Six attempts in total: the first plus five retries.
/// assert!(policy.allows_attempt_after(5));
/// assert!(!policy.allows_attempt_after(6));
///
/// // A server hint is honoured, within `max_delay`.
/// assert_eq!(
///     policy.delay_before_retry(1, Some(Duration::from_secs(60))),
///     Duration::from_secs(10)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt of a call.
    pub max_retries: u32,
    /// Backoff before the first retry when the server gave no hint.
    pub initial_delay: Duration,
    /// Ceiling for any wait, including `Retry-After` hints.
    pub max_delay: Duration,
    /// Growth of the computed backoff per retry.
    pub backoff_factor: f64,
    /// Relative spread applied to computed backoff, in `0.0..=1.0`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt per call.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the number of retries after the first attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff before the first unhinted retry.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the ceiling for every wait.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff growth factor.
    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Sets the jitter spread; values outside `0.0..=1.0` are clamped.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Returns `true` if a call that has made `attempts_made` failed
    /// attempts may make another one.
    #[must_use]
    pub const fn allows_attempt_after(&self, attempts_made: u32) -> bool {
        attempts_made <= self.max_retries
    }

    /// Returns how long to wait before retry number `retry` (1-based),
    /// given the failed response's `Retry-After` hint, if any.
    #[must_use]
    pub fn delay_before_retry(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint.min(self.max_delay),
            None => self.backoff(retry),
        }
    }

    fn backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);

        let spread = self.jitter.clamp(0.0, 1.0);
        let factor = if spread > 0.0 {
            1.0 + rand::thread_rng().gen_range(-spread..=spread)
        } else {
            1.0
        };

        let secs = (base * factor).min(self.max_delay.as_secs_f64());
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }
}
