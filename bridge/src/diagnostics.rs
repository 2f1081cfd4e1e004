//! Diagnostics forwarding.
//!
//! [`ConsoleForwarder`] wraps the scripting console so every line is also sent
//! to the host's `Console` plugin. [`ErrorForwarder`] turns uncaught script
//! errors into structured reports for the same plugin. Both are producers
//! only: they never register a continuation.

use std::sync::Arc;

use avocado_config::{ConsoleConfig, ErrorConfig};
use avocado_types::{
    CONSOLE_LOG_METHOD, CONSOLE_PLUGIN_ID, ConsoleMessage, LogLevel, SCRIPT_ERROR_METHOD,
    ScriptErrorDetails, ScriptErrorReport,
};
use serde_json::Value;

use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::sink::{LogSink, join_args};

/// Message browsers substitute for errors thrown by cross-origin scripts.
const OPAQUE_SCRIPT_ERROR: &str = "script error";

/// Console sink that also forwards each line to the host.
///
/// The wrapped `original` always sees the call first, with its unmodified
/// arguments. Forwarding failures are written to `original`, never back
/// into this sink.
pub struct ConsoleForwarder {
    original: Arc<dyn LogSink>,
    bridge: Arc<Bridge>,
    enabled: bool,
}

impl ConsoleForwarder {
    pub fn new(original: Arc<dyn LogSink>, bridge: Arc<Bridge>) -> Self {
        Self {
            original,
            bridge,
            enabled: true,
        }
    }

    pub fn from_config(
        config: &ConsoleConfig,
        original: Arc<dyn LogSink>,
        bridge: Arc<Bridge>,
    ) -> Self {
        Self {
            enabled: config.forward,
            ..Self::new(original, bridge)
        }
    }

    fn forward(&self, level: LogLevel, args: &[Value]) -> Result<(), BridgeError> {
        let message = ConsoleMessage {
            level,
            message: join_args(args),
        };
        let options = serde_json::to_value(&message)?;
        self.bridge
            .dispatch(CONSOLE_PLUGIN_ID, CONSOLE_LOG_METHOD, Some(options), None)?;
        Ok(())
    }

    /// Forward one console line to the host without printing it locally.
    ///
    /// For callers that already printed the raw arguments themselves.
    /// Failures are written to the original sink.
    pub fn forward_line(&self, level: LogLevel, args: &[Value]) {
        if !self.enabled || !self.bridge.is_native() {
            return;
        }
        if let Err(err) = self.forward(level, args) {
            self.original.log(
                LogLevel::Error,
                &[Value::String(format!(
                    "failed to forward console output: {err}"
                ))],
            );
        }
    }
}

impl LogSink for ConsoleForwarder {
    fn log(&self, level: LogLevel, args: &[Value]) {
        self.original.log(level, args);
        self.forward_line(level, args);
    }
}

/// Arguments of the environment's uncaught-error hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptErrorEvent {
    pub message: String,
    pub url: String,
    pub line: u32,
    pub column: u32,
    /// The thrown value, if the environment provided one.
    pub error: Option<Value>,
}

/// Process-wide uncaught-error handler.
#[derive(Clone)]
pub struct ErrorForwarder {
    bridge: Arc<Bridge>,
    enabled: bool,
}

impl ErrorForwarder {
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self {
            bridge,
            enabled: true,
        }
    }

    pub fn from_config(config: &ErrorConfig, bridge: Arc<Bridge>) -> Self {
        Self {
            enabled: config.forward,
            ..Self::new(bridge)
        }
    }

    /// Forward one uncaught error as a `Console.jsError` call.
    ///
    /// Opaque cross-origin errors carry nothing useful and are dropped.
    /// Always returns `false` so the environment's default error reporting
    /// still runs.
    pub fn handle_window_error(&self, event: &ScriptErrorEvent) -> bool {
        if !self.enabled || !self.bridge.is_native() {
            return false;
        }
        if is_opaque_script_error(&event.message) {
            tracing::debug!(url = %event.url, "Suppressing opaque cross-origin script error");
            return false;
        }

        if let Err(err) = self.forward(&error_report(event)) {
            self.bridge.report(
                LogLevel::Error,
                format!("failed to forward script error: {err}"),
            );
        }
        false
    }

    fn forward(&self, report: &ScriptErrorReport) -> Result<(), BridgeError> {
        let options = serde_json::to_value(report)?;
        self.bridge
            .dispatch(CONSOLE_PLUGIN_ID, SCRIPT_ERROR_METHOD, Some(options), None)?;
        Ok(())
    }
}

/// Whether `message` is the placeholder browsers report for cross-origin
/// errors ("Script error." in any letter case).
#[must_use]
pub fn is_opaque_script_error(message: &str) -> bool {
    message
        .trim()
        .trim_end_matches('.')
        .eq_ignore_ascii_case(OPAQUE_SCRIPT_ERROR)
}

/// Structured report for an uncaught error event.
#[must_use]
pub fn error_report(event: &ScriptErrorEvent) -> ScriptErrorReport {
    ScriptErrorReport::new(ScriptErrorDetails {
        message: event.message.clone(),
        url: event.url.clone(),
        line: event.line,
        col: event.column,
        error_object: event
            .error
            .as_ref()
            .map_or_else(|| Value::Null.to_string(), Value::to_string),
    })
}
