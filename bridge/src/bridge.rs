//! The bridge instance shared by one scripting context.
//!
//! Outbound dispatch lives in `outbound.rs`, result demultiplexing in
//! `inbound.rs`; both operate on the state defined here.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use avocado_config::BridgeConfig;
use avocado_types::{CallbackId, LogLevel, TransportKind};
use serde_json::Value;

use crate::pending::{CallbackFn, PendingCall, PromiseResolver};
use crate::registry::Registry;
use crate::sink::LogSink;
use crate::transport::{HostChannel, Transport};

/// Call bridge between scripted code and the native host.
///
/// Owns the transport, the pending-call registry and the id counter. Safe to
/// share across threads: registry access is serialized by a mutex that is
/// never held while user continuations run.
pub struct Bridge {
    transport: Transport,
    registry: Mutex<Registry>,
    /// Unwrapped console. Infrastructure failures go here, never through a
    /// forwarding sink, so reporting a failure cannot re-enter dispatch.
    fallback: Arc<dyn LogSink>,
}

/// Continuation taken out of the registry for one delivery.
pub(crate) enum Claimed {
    Callback(CallbackFn),
    Promise(PromiseResolver),
    Missing,
}

impl Bridge {
    pub fn new(transport: Transport, fallback: Arc<dyn LogSink>) -> Self {
        tracing::debug!(transport = %transport.kind(), native = transport.is_native(), "Bridge created");
        Self {
            transport,
            registry: Mutex::new(Registry::new()),
            fallback,
        }
    }

    pub fn from_config(
        config: &BridgeConfig,
        channel: Option<Arc<dyn HostChannel>>,
        fallback: Arc<dyn LogSink>,
    ) -> Self {
        Self::new(Transport::new(config.transport, channel), fallback)
    }

    /// Whether a host platform is attached.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.transport.is_native()
    }

    #[must_use]
    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.registry().len()
    }

    #[must_use]
    pub fn is_pending(&self, callback_id: CallbackId) -> bool {
        self.registry().lookup(callback_id).is_some()
    }

    /// Registered ids in issue order.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<CallbackId> {
        self.registry().ids()
    }

    /// Remove a continuation without delivering anything to it.
    ///
    /// The only way to release a callback-style entry. A promise-style entry
    /// removed this way resolves its awaitable to `CallError::Abandoned`.
    pub fn unregister(&self, callback_id: CallbackId) -> bool {
        let removed = self.registry().settle(callback_id);
        let found = removed.is_some();
        drop(removed);
        if found {
            tracing::debug!(callback_id = %callback_id, "Continuation unregistered");
        }
        found
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Log an infrastructure message through the unwrapped console.
    pub(crate) fn report(&self, level: LogLevel, message: String) {
        self.fallback.log(level, &[Value::String(message)]);
    }

    /// Log a raw host value through the unwrapped console.
    pub(crate) fn report_value(&self, level: LogLevel, value: Value) {
        self.fallback.log(level, &[value]);
    }

    pub(crate) fn registry(&self) -> MutexGuard<'_, Registry> {
        // User code never runs under this lock, so a poisoned guard still
        // holds a consistent map.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take what a result for `callback_id` should be delivered to.
    ///
    /// Callback entries stay registered; promise entries are removed here,
    /// before they are settled.
    pub(crate) fn claim(&self, callback_id: CallbackId) -> Claimed {
        let mut registry = self.registry();
        match registry.lookup(callback_id) {
            None => return Claimed::Missing,
            Some(PendingCall::Callback(handler)) => return Claimed::Callback(Arc::clone(handler)),
            Some(PendingCall::Promise(_)) => {}
        }
        match registry.settle(callback_id) {
            Some(PendingCall::Promise(resolver)) => Claimed::Promise(resolver),
            _ => Claimed::Missing,
        }
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("transport", &self.transport)
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}
