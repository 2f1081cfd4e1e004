//! Wire types for the Avocado bridge.
//!
//! This crate contains the envelopes and identifiers exchanged between a web
//! view and its native host. No IO, no async; every other crate in the
//! workspace builds on these definitions.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod envelope;
mod ids;
mod level;
mod report;
mod transport;

pub use envelope::{CallEnvelope, HostOutcome, Options, ResultEnvelope};
pub use ids::{CallbackId, CallbackIdError, NO_RESPONSE_WIRE};
pub use level::{LogLevel, LogLevelError};
pub use report::{
    CONSOLE_LOG_METHOD, CONSOLE_PLUGIN_ID, ConsoleMessage, SCRIPT_ERROR_METHOD, SCRIPT_ERROR_TYPE,
    ScriptErrorDetails, ScriptErrorReport,
};
pub use transport::{TransportKind, TransportKindError};
