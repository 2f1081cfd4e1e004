//! Logging sinks.
//!
//! A [`LogSink`] is the scripting environment's console as a capability
//! object. The diagnostics layer wraps one; the bridge reports its own
//! failures to the unwrapped one.

use avocado_types::LogLevel;
use serde_json::Value;

pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, args: &[Value]);
}

/// Sink emitting console lines as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, args: &[Value]) {
        let message = join_args(args);
        match level {
            LogLevel::Trace => tracing::trace!(target: "avocado::console", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "avocado::console", "{message}"),
            LogLevel::Log | LogLevel::Info => {
                tracing::info!(target: "avocado::console", "{message}");
            }
            LogLevel::Warn => tracing::warn!(target: "avocado::console", "{message}"),
            LogLevel::Error => tracing::error!(target: "avocado::console", "{message}"),
        }
    }
}

/// String form of one console argument.
///
/// Strings pass through untouched; everything else is JSON-encoded.
#[must_use]
pub fn stringify_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        // Display for Value is its compact JSON encoding, which cannot fail.
        other => other.to_string(),
    }
}

/// Space-joined string form of a console call's arguments.
#[must_use]
pub fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(stringify_arg)
        .collect::<Vec<_>>()
        .join(" ")
}
