//! Resilient execution of remote calls.
//!
//! # Overview
//!
//! - [`RetryPolicy`]: Attempt budget and throttling-aware backoff
//! - [`ResilientInvoker`]: Runs a fallible async call under a policy,
//!   honouring cancellation and reporting telemetry
//! - [`TelemetrySink`]: Receiver for [`DependencyCall`] records and named events
//!
//! Only failures classified as transient by
//! [`crate::clients::HttpError::is_retryable`] are retried. A server
//! `Retry-After` hint replaces the computed backoff, capped at
//! [`RetryPolicy::max_delay`].

mod invoker;
mod retry;
mod telemetry;

pub use invoker::ResilientInvoker;
pub use retry::RetryPolicy;
pub use telemetry::{DependencyCall, NoopTelemetry, TelemetrySink, TracingTelemetry};
