//! Outbound dispatch: scripted code → host.
//!
//! Every entry point funnels into [`Bridge::dispatch`]; the callback and
//! promise helpers only differ in the continuation they register.

use avocado_types::{CallEnvelope, CallbackId, HostOutcome, LogLevel, Options};
use serde_json::Value;

use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::pending::{PendingCall, PendingResult, PromiseResolver};

impl Bridge {
    /// Send a plugin call to the host.
    ///
    /// Fire-and-forget: failures are logged through the unwrapped console and
    /// never returned. Returns the id the continuation was registered under,
    /// or `CallbackId::NoResponse` when nothing was registered.
    pub fn to_native(
        &self,
        plugin_id: &str,
        method_name: &str,
        options: Option<Value>,
        pending: Option<PendingCall>,
    ) -> CallbackId {
        match self.dispatch(plugin_id, method_name, options, pending) {
            Ok(callback_id) => callback_id,
            Err(err @ BridgeError::NotNative { .. }) => {
                self.report(LogLevel::Warn, err.to_string());
                CallbackId::NoResponse
            }
            Err(err) => {
                tracing::debug!(plugin_id, method = method_name, "Dispatch failed: {err}");
                self.report(LogLevel::Error, err.to_string());
                CallbackId::NoResponse
            }
        }
    }

    /// Callback-style call. `on_complete` runs once per result the host sends
    /// for this call until the id is [unregistered](Bridge::unregister).
    pub fn native_callback(
        &self,
        plugin_id: &str,
        method_name: &str,
        options: Option<Value>,
        on_complete: impl Fn(HostOutcome) + Send + Sync + 'static,
    ) -> CallbackId {
        self.to_native(
            plugin_id,
            method_name,
            options,
            Some(PendingCall::callback(on_complete)),
        )
    }

    /// Promise-style call. The returned awaitable settles when the host answers.
    pub fn native_promise(
        &self,
        plugin_id: &str,
        method_name: &str,
        options: Option<Value>,
    ) -> PendingResult {
        let (resolver, rx) = PromiseResolver::channel();
        let callback_id = self.to_native(
            plugin_id,
            method_name,
            options,
            Some(PendingCall::Promise(resolver)),
        );
        PendingResult::new(callback_id, rx)
    }

    /// Build, register and post one call envelope.
    ///
    /// Nothing is registered unless the envelope is actually handed to the
    /// host; a post failure removes the entry it just created.
    pub(crate) fn dispatch(
        &self,
        plugin_id: &str,
        method_name: &str,
        options: Option<Value>,
        pending: Option<PendingCall>,
    ) -> Result<CallbackId, BridgeError> {
        if !self.is_native() {
            return Err(BridgeError::NotNative {
                plugin_id: plugin_id.to_string(),
            });
        }

        let options = into_options(plugin_id, method_name, options)?;
        let callback_id = match pending {
            Some(pending) => self
                .registry()
                .register(pending)
                .ok_or(BridgeError::IdsExhausted)?,
            None => CallbackId::NoResponse,
        };
        let envelope = CallEnvelope::new(callback_id, plugin_id, method_name, options);

        if let Err(err) = self.transport().send(&envelope) {
            // Nothing will ever answer this id.
            let abandoned = self.registry().settle(callback_id);
            drop(abandoned);
            return Err(err);
        }

        tracing::debug!(
            plugin_id,
            method = method_name,
            callback_id = %callback_id,
            "Posted call to host"
        );
        Ok(callback_id)
    }
}

/// Omitted or `null` options become an empty object.
fn into_options(
    plugin_id: &str,
    method_name: &str,
    options: Option<Value>,
) -> Result<Options, BridgeError> {
    match options {
        None | Some(Value::Null) => Ok(Options::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(BridgeError::InvalidOptions {
            plugin_id: plugin_id.to_string(),
            method_name: method_name.to_string(),
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
