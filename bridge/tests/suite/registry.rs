//! Registry bookkeeping observed through the public bridge surface.

use avocado_bridge::testing::RecordingChannel;
use avocado_bridge::{CallbackId, PendingCall, Registry, ResultEnvelope, TransportKind};
use serde_json::json;

use crate::common::Harness;

#[test]
fn ids_are_unique_and_strictly_increasing() {
    let h = Harness::new(TransportKind::Android);

    let ids: Vec<u64> = (0..50)
        .map(|i| {
            if i % 2 == 0 {
                h.bridge.native_callback("Echo", "echo", None, |_| {})
            } else {
                h.bridge.native_promise("Echo", "echo", None).callback_id()
            }
        })
        .map(|id| id.value().unwrap())
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(ids.first(), Some(&1));
}

#[test]
fn ids_are_not_reused_after_settlement() {
    let mut registry = Registry::new();
    let first = registry
        .register(PendingCall::promise(|_| {}, |_| {}))
        .unwrap();
    assert!(registry.settle(first).is_some());

    let second = registry
        .register(PendingCall::promise(|_| {}, |_| {}))
        .unwrap();
    assert_ne!(first, second);
    assert!(registry.settle(first).is_none());
}

#[test]
fn pending_set_tracks_unanswered_promises() {
    let h = Harness::new(TransportKind::Android);
    let calls: Vec<_> = (0..4)
        .map(|_| h.bridge.native_promise("Echo", "echo", None))
        .collect();

    for call in calls.iter().step_by(2) {
        h.bridge
            .from_native(&mut ResultEnvelope::success(call.callback_id(), json!(null)));
    }

    let expected: Vec<CallbackId> = calls
        .iter()
        .skip(1)
        .step_by(2)
        .map(|call| call.callback_id())
        .collect();
    assert_eq!(h.bridge.pending_ids(), expected);
}

#[test]
fn failed_posts_leave_no_entries() {
    let h = Harness::with_channel(TransportKind::Ios, RecordingChannel::failing());

    for _ in 0..10 {
        h.bridge.native_callback("Echo", "echo", None, |_| {});
        drop(h.bridge.native_promise("Echo", "echo", None));
    }

    assert_eq!(h.bridge.pending_count(), 0);
}

#[test]
fn fire_and_forget_calls_never_register() {
    let h = Harness::new(TransportKind::Android);

    for _ in 0..10 {
        assert_eq!(
            h.bridge.to_native("Haptics", "vibrate", None, None),
            CallbackId::NoResponse
        );
    }

    assert_eq!(h.bridge.pending_count(), 0);
    assert_eq!(h.channel.envelopes().len(), 10);
}
