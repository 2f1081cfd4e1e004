//! Diagnostic payloads forwarded to the host's `Console` plugin.

use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Plugin receiving forwarded console output and script errors.
pub const CONSOLE_PLUGIN_ID: &str = "Console";

/// Method used for forwarded console lines.
pub const CONSOLE_LOG_METHOD: &str = "log";

/// Method used for uncaught script error reports.
pub const SCRIPT_ERROR_METHOD: &str = "jsError";

/// `type` discriminator of a [`ScriptErrorReport`].
pub const SCRIPT_ERROR_TYPE: &str = "js.error";

/// Options of a forwarded console line: `{level, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub level: LogLevel,
    pub message: String,
}

/// Structured report of an uncaught script error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptErrorReport {
    #[serde(rename = "type")]
    kind: String,
    error: ScriptErrorDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptErrorDetails {
    pub message: String,
    pub url: String,
    pub line: u32,
    pub col: u32,
    /// Best-effort string form of the thrown value.
    pub error_object: String,
}

impl ScriptErrorReport {
    #[must_use]
    pub fn new(error: ScriptErrorDetails) -> Self {
        Self {
            kind: SCRIPT_ERROR_TYPE.to_string(),
            error,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn details(&self) -> &ScriptErrorDetails {
        &self.error
    }
}
