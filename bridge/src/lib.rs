//! Call bridge between a web view's scripted code and its native host.
//!
//! Scripted code calls host plugins through [`Bridge::to_native`] (or the
//! callback/promise helpers built on it). Each call that expects an answer is
//! registered under a fresh [`CallbackId`]; the host later answers through
//! [`Bridge::from_native`], which routes the result back to the waiting
//! continuation.
//!
//! The [`diagnostics`] module forwards console output and uncaught script
//! errors to the host as ordinary fire-and-forget calls.

#![allow(clippy::missing_errors_doc)]

mod bridge;
pub mod diagnostics;
mod error;
mod inbound;
mod outbound;
mod pending;
mod registry;
mod sink;
pub mod testing;
mod transport;

pub use avocado_types::{CallEnvelope, CallbackId, HostOutcome, LogLevel, ResultEnvelope, TransportKind};
pub use bridge::Bridge;
pub use diagnostics::{ConsoleForwarder, ErrorForwarder, ScriptErrorEvent};
pub use error::{BridgeError, CallError, ChannelError};
pub use pending::{CallbackFn, PendingCall, PendingResult, PromiseResolver};
pub use registry::Registry;
pub use sink::{LogSink, TracingSink, join_args, stringify_arg};
pub use transport::{HostChannel, HostMessage, STRUCTURED_MESSAGE_TYPE, Transport};
