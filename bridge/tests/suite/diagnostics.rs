//! Console and uncaught-error forwarding end to end.

use std::sync::Arc;

use avocado_bridge::testing::RecordingChannel;
use avocado_bridge::{
    ConsoleForwarder, ErrorForwarder, LogLevel, LogSink, ScriptErrorEvent, TransportKind,
};
use avocado_config::BridgeConfig;
use serde_json::json;

use crate::common::Harness;

#[test]
fn forwarded_console_output_is_fire_and_forget() {
    let h = Harness::new(TransportKind::Ios);
    let console = ConsoleForwarder::new(h.console.clone(), h.bridge.clone());

    console.log(LogLevel::Info, &[json!("ready"), json!(3)]);
    console.log(LogLevel::Error, &[json!({"code": 7})]);

    let sent: Vec<_> = h
        .channel
        .envelopes()
        .into_iter()
        .map(|e| (e.method_name().to_string(), e.options()["message"].clone()))
        .collect();
    assert_eq!(
        sent,
        vec![
            ("log".to_string(), json!("ready 3")),
            ("log".to_string(), json!(r#"{"code":7}"#)),
        ]
    );
    assert_eq!(h.bridge.pending_count(), 0);
    assert_eq!(h.console.records().len(), 2);
}

#[test]
fn forwarders_honor_loaded_config() {
    let config = BridgeConfig::from_toml_str(
        r#"
        transport = "android"

        [console]
        forward = false
        "#,
    )
    .unwrap();
    let h = Harness::new(config.transport);
    let console = ConsoleForwarder::from_config(&config.console, h.console.clone(), h.bridge.clone());
    let errors = ErrorForwarder::from_config(&config.errors, h.bridge.clone());

    console.log(LogLevel::Log, &[json!("local only")]);
    let handled = errors.handle_window_error(&ScriptErrorEvent {
        message: "ReferenceError: foo is not defined".to_string(),
        url: "app://www/index.js".to_string(),
        line: 1,
        column: 1,
        error: None,
    });

    assert!(!handled);
    let methods: Vec<_> = h
        .channel
        .envelopes()
        .iter()
        .map(|e| e.method_name().to_string())
        .collect();
    assert_eq!(methods, vec!["jsError".to_string()]);
}

#[test]
fn forwarding_failure_does_not_loop() {
    let h = Harness::with_channel(TransportKind::Android, RecordingChannel::failing());
    let console: Arc<dyn LogSink> = Arc::new(ConsoleForwarder::new(h.console.clone(), h.bridge.clone()));

    console.log(LogLevel::Warn, &[json!("first")]);

    assert_eq!(h.console.records().len(), 2);
    assert_eq!(h.console.messages_at(LogLevel::Error).len(), 1);
}
