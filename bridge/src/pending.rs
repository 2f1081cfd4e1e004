//! Continuations awaiting a host response.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use avocado_types::{CallbackId, HostOutcome};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::CallError;

/// Callback-style continuation. May be invoked once per delivered result.
pub type CallbackFn = Arc<dyn Fn(HostOutcome) + Send + Sync>;

/// A stored continuation, decided at registration time.
pub enum PendingCall {
    /// Stays registered across results until explicitly unregistered.
    Callback(CallbackFn),
    /// Settled exactly once, then removed.
    Promise(PromiseResolver),
}

impl PendingCall {
    pub fn callback(on_complete: impl Fn(HostOutcome) + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(on_complete))
    }

    pub fn promise(
        resolve: impl FnOnce(Value) + Send + 'static,
        reject: impl FnOnce(Value) + Send + 'static,
    ) -> Self {
        Self::Promise(PromiseResolver::new(resolve, reject))
    }

    #[must_use]
    pub fn is_promise(&self) -> bool {
        matches!(self, Self::Promise(_))
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("PendingCall::Callback"),
            Self::Promise(_) => f.write_str("PendingCall::Promise"),
        }
    }
}

/// Resolve/reject pair of a promise-style call.
///
/// [`settle`](Self::settle) consumes the resolver, so a second settlement
/// cannot be written.
pub struct PromiseResolver {
    settle: Box<dyn FnOnce(HostOutcome) + Send>,
}

impl PromiseResolver {
    pub fn new(
        resolve: impl FnOnce(Value) + Send + 'static,
        reject: impl FnOnce(Value) + Send + 'static,
    ) -> Self {
        Self {
            settle: Box::new(move |outcome| match outcome {
                Ok(data) => resolve(data),
                Err(error) => reject(error),
            }),
        }
    }

    /// Resolver feeding a oneshot channel, for [`PendingResult`].
    pub(crate) fn channel() -> (Self, oneshot::Receiver<HostOutcome>) {
        let (tx, rx) = oneshot::channel();
        let resolver = Self {
            settle: Box::new(move |outcome| {
                // The receiver may already be gone; nobody is waiting then.
                let _ = tx.send(outcome);
            }),
        };
        (resolver, rx)
    }

    pub fn settle(self, outcome: HostOutcome) {
        (self.settle)(outcome);
    }
}

/// Awaitable result of a promise-style call.
///
/// Resolves to the host's `data` on success, [`CallError::Rejected`] with the
/// host's `error` on failure, or [`CallError::Abandoned`] if the continuation
/// was released unanswered.
#[must_use = "a pending result does nothing unless awaited"]
#[derive(Debug)]
pub struct PendingResult {
    callback_id: CallbackId,
    rx: oneshot::Receiver<HostOutcome>,
}

impl PendingResult {
    pub(crate) fn new(callback_id: CallbackId, rx: oneshot::Receiver<HostOutcome>) -> Self {
        Self { callback_id, rx }
    }

    /// Id the call was registered under, or `NoResponse` if it was never sent.
    #[must_use]
    pub fn callback_id(&self) -> CallbackId {
        self.callback_id
    }
}

impl Future for PendingResult {
    type Output = Result<Value, CallError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(error)) => Err(CallError::Rejected(error)),
            Err(_) => Err(CallError::Abandoned),
        })
    }
}
