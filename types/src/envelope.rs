//! Envelopes exchanged across the scripting/host boundary.
//!
//! Field names are part of the wire contract with the native shells and are
//! serialized in camelCase exactly as the hosts expect them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::CallbackId;

/// Plugin call options. Always a JSON object on the wire.
pub type Options = Map<String, Value>;

/// What a host answered for one call: `Ok(data)` or `Err(error)`.
///
/// Missing payloads are normalized to `Value::Null`.
pub type HostOutcome = Result<Value, Value>;

/// A plugin call travelling from scripted code to the host.
///
/// Fields are private; an envelope is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEnvelope {
    callback_id: CallbackId,
    plugin_id: String,
    method_name: String,
    options: Options,
}

impl CallEnvelope {
    #[must_use]
    pub fn new(
        callback_id: CallbackId,
        plugin_id: impl Into<String>,
        method_name: impl Into<String>,
        options: Options,
    ) -> Self {
        Self {
            callback_id,
            plugin_id: plugin_id.into(),
            method_name: method_name.into(),
            options,
        }
    }

    #[must_use]
    pub fn callback_id(&self) -> CallbackId {
        self.callback_id
    }

    #[must_use]
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// A host response for a previously issued call.
///
/// Exactly one of `data` / `error` is meaningful, selected by `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub callback_id: CallbackId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ResultEnvelope {
    #[must_use]
    pub fn success(callback_id: CallbackId, data: Value) -> Self {
        Self {
            callback_id,
            success: true,
            data: Some(data),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(callback_id: CallbackId, error: Value) -> Self {
        Self {
            callback_id,
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Move the meaningful payload out of the envelope.
    ///
    /// Leaves both payload slots empty regardless of `success`.
    pub fn take_outcome(&mut self) -> HostOutcome {
        let data = self.data.take();
        let error = self.error.take();
        if self.success {
            Ok(data.unwrap_or(Value::Null))
        } else {
            Err(error.unwrap_or(Value::Null))
        }
    }

    /// Drop both payloads, keeping only the routing fields.
    pub fn scrub(&mut self) {
        self.data = None;
        self.error = None;
    }

    #[must_use]
    pub fn is_scrubbed(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}
