//! Full call/answer cycles against an in-memory host.

use std::sync::{Arc, Mutex};

use avocado_bridge::testing::{RecordingChannel, RecordingSink};
use avocado_bridge::{
    Bridge, CallError, CallbackId, HostMessage, LogLevel, ResultEnvelope, TransportKind,
};
use avocado_config::BridgeConfig;
use serde_json::{Value, json};

use crate::common::Harness;

/// Answer the most recent call the way an echo plugin would.
fn echo_last(harness: &Harness) -> CallbackId {
    let envelope = harness.channel.last_envelope().unwrap();
    let answer = ResultEnvelope::success(
        envelope.callback_id(),
        Value::Object(envelope.options().clone()),
    );
    harness
        .bridge
        .from_native_json(&serde_json::to_string(&answer).unwrap());
    envelope.callback_id()
}

#[tokio::test]
async fn android_promise_round_trip() {
    let h = Harness::new(TransportKind::Android);

    let pending = h
        .bridge
        .native_promise("Echo", "echo", Some(json!({"value": "hi"})));
    assert!(matches!(h.channel.messages()[0], HostMessage::Text(_)));
    let answered = echo_last(&h);

    assert_eq!(answered, pending.callback_id());
    assert_eq!(pending.await, Ok(json!({"value": "hi"})));
    assert_eq!(h.bridge.pending_count(), 0);
}

#[tokio::test]
async fn ios_promise_round_trip() {
    let h = Harness::new(TransportKind::Ios);

    let pending = h.bridge.native_promise("Device", "getInfo", None);
    let messages = h.channel.messages();
    let HostMessage::Structured(posted) = &messages[0] else {
        panic!("iOS transport must post structured messages");
    };
    assert_eq!(posted["type"], "message");

    let mut answer = ResultEnvelope::failure(pending.callback_id(), json!({"code": "UNAVAILABLE"}));
    h.bridge.from_native(&mut answer);

    assert!(answer.is_scrubbed());
    assert_eq!(
        pending.await,
        Err(CallError::Rejected(json!({"code": "UNAVAILABLE"})))
    );
}

#[test]
fn listener_keeps_receiving_until_unregistered() {
    let h = Harness::new(TransportKind::Android);
    let seen = Arc::new(Mutex::new(0));
    let counter = seen.clone();
    let id = h
        .bridge
        .native_callback("Motion", "addListener", None, move |_| {
            *counter.lock().unwrap() += 1;
        });

    for tick in 0..3 {
        h.bridge
            .from_native(&mut ResultEnvelope::success(id, json!({"tick": tick})));
    }
    assert!(h.bridge.unregister(id));
    h.bridge
        .from_native(&mut ResultEnvelope::success(id, json!({"tick": 3})));

    assert_eq!(*seen.lock().unwrap(), 3);
    assert!(h.console.records().is_empty());
}

#[tokio::test]
async fn unregistered_promise_is_abandoned() {
    let h = Harness::new(TransportKind::Android);
    let pending = h.bridge.native_promise("Camera", "getPhoto", None);

    assert!(h.bridge.unregister(pending.callback_id()));
    assert_eq!(pending.await, Err(CallError::Abandoned));
}

#[tokio::test]
async fn interleaved_answers_reach_their_own_callers() {
    let h = Harness::new(TransportKind::Android);
    let first = h.bridge.native_promise("Echo", "echo", Some(json!({"n": 1})));
    let second = h.bridge.native_promise("Echo", "echo", Some(json!({"n": 2})));

    h.bridge
        .from_native(&mut ResultEnvelope::success(second.callback_id(), json!("two")));
    h.bridge
        .from_native(&mut ResultEnvelope::success(first.callback_id(), json!("one")));

    assert_eq!(first.await, Ok(json!("one")));
    assert_eq!(second.await, Ok(json!("two")));
}

#[test]
fn bridge_built_from_toml_config() {
    let config = BridgeConfig::from_toml_str("transport = \"ios\"").unwrap();
    let channel = Arc::new(RecordingChannel::new());
    let bridge = Bridge::from_config(&config, Some(channel.clone()), Arc::new(RecordingSink::new()));

    bridge.to_native("Haptics", "impact", Some(json!({"style": "heavy"})), None);

    let envelope = channel.last_envelope().unwrap();
    assert_eq!(envelope.callback_id(), CallbackId::NoResponse);
    assert_eq!(envelope.options()["style"], "heavy");
}

#[test]
fn browser_only_context_warns_per_call() {
    let h = Harness::new(TransportKind::None);

    h.bridge.to_native("Haptics", "vibrate", None, None);
    h.bridge.native_callback("Geo", "watch", None, |_| {});

    assert_eq!(
        h.console.messages_at(LogLevel::Warn),
        vec![
            "browser implementation unavailable for: Haptics".to_string(),
            "browser implementation unavailable for: Geo".to_string(),
        ]
    );
    assert!(h.channel.messages().is_empty());
}
