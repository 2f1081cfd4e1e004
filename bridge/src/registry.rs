//! Pending-call registry: callback id → stored continuation.
//!
//! Owns id generation. Ids start at 1, increase by one per registration and
//! are never reused for the lifetime of the registry. Once `u64::MAX` has
//! been issued the registry refuses further registrations.

use std::collections::HashMap;
use std::num::NonZeroU64;

use avocado_types::CallbackId;

use crate::pending::PendingCall;

#[derive(Debug)]
pub struct Registry {
    /// `None` once every id has been issued.
    next_id: Option<NonZeroU64>,
    calls: HashMap<NonZeroU64, PendingCall>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Some(NonZeroU64::MIN),
            calls: HashMap::new(),
        }
    }

    /// Store a continuation under a freshly minted id.
    ///
    /// Returns `None`, storing nothing, when the id space is exhausted.
    pub fn register(&mut self, pending: PendingCall) -> Option<CallbackId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        self.calls.insert(id, pending);
        Some(CallbackId::Issued(id))
    }

    /// Stored continuation for `id`, without removing it.
    #[must_use]
    pub fn lookup(&self, id: CallbackId) -> Option<&PendingCall> {
        match id {
            CallbackId::Issued(n) => self.calls.get(&n),
            CallbackId::NoResponse => None,
        }
    }

    /// Remove the entry for `id`. Settling an absent id is a no-op.
    pub fn settle(&mut self, id: CallbackId) -> Option<PendingCall> {
        match id {
            CallbackId::Issued(n) => self.calls.remove(&n),
            CallbackId::NoResponse => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Registered ids in issue order.
    #[must_use]
    pub fn ids(&self) -> Vec<CallbackId> {
        let mut ids: Vec<NonZeroU64> = self.calls.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().map(CallbackId::Issued).collect()
    }
}
