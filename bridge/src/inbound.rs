//! Inbound demultiplexing: host → waiting continuation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use avocado_types::{CallbackId, LogLevel, ResultEnvelope};

use crate::bridge::{Bridge, Claimed};

impl Bridge {
    /// Deliver a host result to the continuation registered under its id.
    ///
    /// Callback-style continuations run once per result and stay registered.
    /// Promise-style continuations are removed and then settled, once. A failed
    /// result with no matching continuation is logged as a warning; any other
    /// unmatched result is dropped.
    ///
    /// The envelope's payloads are always moved out, so `result` is scrubbed
    /// when this returns. Nothing here panics or propagates an error.
    pub fn from_native(&self, result: &mut ResultEnvelope) {
        let callback_id = result.callback_id;
        let orphan_error = !result.success && result.error.is_some();
        let outcome = result.take_outcome();

        match self.claim(callback_id) {
            Claimed::Callback(handler) => {
                tracing::trace!(callback_id = %callback_id, success = outcome.is_ok(), "Delivering to callback");
                self.run_continuation(callback_id, move || handler(outcome));
            }
            Claimed::Promise(resolver) => {
                tracing::trace!(callback_id = %callback_id, success = outcome.is_ok(), "Settling promise");
                self.run_continuation(callback_id, move || resolver.settle(outcome));
            }
            Claimed::Missing => match outcome {
                Err(error) if orphan_error => self.report_value(LogLevel::Warn, error),
                _ => {
                    tracing::trace!(callback_id = %callback_id, "Dropping unmatched result");
                }
            },
        }
    }

    /// Parse and deliver a result the host sent as JSON text.
    pub fn from_native_json(&self, raw: &str) {
        match serde_json::from_str::<ResultEnvelope>(raw) {
            Ok(mut result) => self.from_native(&mut result),
            Err(err) => {
                self.report(
                    LogLevel::Error,
                    format!("discarding malformed host result: {err}"),
                );
            }
        }
    }

    fn run_continuation(&self, callback_id: CallbackId, continuation: impl FnOnce()) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(continuation)) {
            self.report(
                LogLevel::Error,
                format!(
                    "continuation for call {callback_id} panicked: {}",
                    panic_message(payload.as_ref())
                ),
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
