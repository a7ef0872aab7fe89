//! Dependency telemetry.
//!
//! Every remote call made through [`super::ResilientInvoker`] is reported to
//! a [`TelemetrySink`] as one [`DependencyCall`], whether it succeeded or
//! not. Facade operations may also report named events.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// One completed (or abandoned) call to a remote dependency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyCall {
    /// The dependency name (e.g., `"ResourceManager"`).
    pub dependency: String,
    /// The command label identifying the logical operation.
    pub command: String,
    /// When the first attempt started.
    pub start: DateTime<Utc>,
    /// Wall time across all attempts, including backoff.
    pub duration: Duration,
    /// Number of attempts made.
    pub attempts: u32,
    /// Whether the call finally succeeded.
    pub success: bool,
}

/// Receiver for dependency and event telemetry.
///
/// Implementations must be cheap and must not fail; telemetry never changes
/// the outcome of an operation.
pub trait TelemetrySink: Send + Sync + Debug {
    /// Records one dependency call.
    fn track_dependency(&self, call: &DependencyCall);

    /// Records a named event with string properties.
    fn track_event(&self, name: &str, properties: &BTreeMap<String, String>) {
        let _ = (name, properties);
    }
}

/// A sink that writes telemetry as `tracing` events.
///
/// This is the default sink for a client.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn track_dependency(&self, call: &DependencyCall) {
        let duration_ms = u64::try_from(call.duration.as_millis()).unwrap_or(u64::MAX);
        if call.success {
            tracing::info!(
                dependency = %call.dependency,
                command = %call.command,
                start = %call.start.to_rfc3339(),
                duration_ms,
                attempts = call.attempts,
                "dependency call succeeded"
            );
        } else {
            tracing::warn!(
                dependency = %call.dependency,
                command = %call.command,
                start = %call.start.to_rfc3339(),
                duration_ms,
                attempts = call.attempts,
                "dependency call failed"
            );
        }
    }

    fn track_event(&self, name: &str, properties: &BTreeMap<String, String>) {
        tracing::info!(event = name, ?properties, "telemetry event");
    }
}

/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn track_dependency(&self, _call: &DependencyCall) {}
}
