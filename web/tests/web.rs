//! Browser-side behavior, with and without a stubbed native shell.

#![cfg(target_arch = "wasm32")]

use avocado_bridge::{HostChannel, HostMessage, TransportKind};
use avocado_web::{AvocadoBridge, WebViewChannel, detect_transport, install};
use js_sys::{Array, Function, JSON, Object, Reflect};
use serde_json::{Value, json};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::Window;

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().unwrap()
}

fn key(name: &str) -> JsValue {
    JsValue::from_str(name)
}

/// A handler object whose `postMessage` appends to the returned array.
fn message_handler() -> (Object, Array) {
    let posted = Array::new();
    let handler = Object::new();
    Reflect::set(&handler, &key("posted"), &posted).unwrap();
    Reflect::set(
        &handler,
        &key("postMessage"),
        &Function::new_with_args("message", "this.posted.push(message)"),
    )
    .unwrap();
    (handler, posted)
}

fn stub_android() -> Array {
    let (handler, posted) = message_handler();
    Reflect::set(&window(), &key("androidBridge"), &handler).unwrap();
    posted
}

fn stub_ios() -> Array {
    let (handler, posted) = message_handler();
    let message_handlers = Object::new();
    Reflect::set(&message_handlers, &key("bridge"), &handler).unwrap();
    let webkit = Object::new();
    Reflect::set(&webkit, &key("messageHandlers"), &message_handlers).unwrap();
    Reflect::set(&window(), &key("webkit"), &webkit).unwrap();
    posted
}

fn remove_stubs() {
    for name in ["androidBridge", "webkit"] {
        Reflect::delete_property(&window(), &key(name)).unwrap();
    }
}

/// Callback recording each `(error, data)` pair into `globalThis.avocadoSeen`.
fn recording_callback() -> (Function, Array) {
    let seen = Array::new();
    Reflect::set(&js_sys::global(), &key("avocadoSeen"), &seen).unwrap();
    let callback = Function::new_with_args("error, data", "globalThis.avocadoSeen.push([error, data])");
    (callback, seen)
}

fn as_json(value: &JsValue) -> Value {
    let text = match value.as_string() {
        Some(text) => text,
        None => JSON::stringify(value).unwrap().as_string().unwrap(),
    };
    serde_json::from_str(&text).unwrap()
}

fn result(text: &str) -> JsValue {
    JSON::parse(text).unwrap()
}

#[wasm_bindgen_test]
fn plain_browser_has_no_host() {
    remove_stubs();
    assert_eq!(detect_transport(), TransportKind::None);
    assert!(WebViewChannel::detect().is_none());

    let avocado = AvocadoBridge::new();
    assert!(!avocado.is_native());
    assert_eq!(avocado.platform(), None);
}

#[wasm_bindgen_test]
fn calls_without_host_are_not_registered() {
    remove_stubs();
    let avocado = AvocadoBridge::new();

    assert_eq!(avocado.to_native("Haptics", "vibrate", JsValue::UNDEFINED), "-1");
    let id = avocado.native_callback(
        "Geo",
        "watch",
        JsValue::NULL,
        Function::new_no_args("throw new Error('must not run')"),
    );
    assert_eq!(id, "-1");
    assert!(!avocado.unregister(&id));
}

#[wasm_bindgen_test]
fn missing_handler_rejects_post() {
    remove_stubs();
    let channel = WebViewChannel::new(TransportKind::Android);
    let err = channel
        .post_message(HostMessage::Text("{}".to_string()))
        .unwrap_err();
    assert!(err.to_string().contains("not installed"), "{err}");
}

#[wasm_bindgen_test]
fn android_callback_round_trip() {
    let posted = stub_android();
    let avocado = AvocadoBridge::new();
    assert_eq!(avocado.platform().as_deref(), Some("android"));
    let (callback, seen) = recording_callback();

    let id = avocado.native_callback("Geo", "watch", result(r#"{"hi":true}"#), callback);

    assert_eq!(posted.length(), 1);
    let envelope = as_json(&posted.get(0));
    assert_eq!(envelope["callbackId"], json!(id));
    assert_eq!(envelope["pluginId"], "Geo");
    assert_eq!(envelope["options"], json!({"hi": true}));

    let delivered = result(&format!(r#"{{"callbackId":"{id}","success":true,"data":{{"lat":1}}}}"#));
    avocado.from_native(delivered.clone());
    avocado.from_native(result(&format!(
        r#"{{"callbackId":"{id}","success":false,"error":"lost fix"}}"#
    )));

    assert_eq!(as_json(&seen), json!([[null, {"lat": 1}], ["lost fix", null]]));
    assert!(!Reflect::has(&delivered, &key("data")).unwrap());
    assert!(!Reflect::has(&delivered, &key("error")).unwrap());

    assert!(avocado.unregister(&id));
    avocado.from_native(result(&format!(r#"{{"callbackId":"{id}","success":true,"data":2}}"#)));
    assert_eq!(seen.length(), 2);
    remove_stubs();
}

#[wasm_bindgen_test]
async fn ios_promise_resolves_with_host_data() {
    let posted = stub_ios();
    let avocado = AvocadoBridge::new();
    assert_eq!(avocado.platform().as_deref(), Some("ios"));

    let promise = avocado.native_promise("Echo", "ping", result(r#"{"x":1}"#));
    remove_stubs();

    let envelope = as_json(&posted.get(0));
    assert_eq!(envelope["type"], "message");
    assert_eq!(envelope["options"], json!({"x": 1}));
    let id = envelope["callbackId"].as_str().unwrap().to_string();

    avocado.from_native(result(&format!(
        r#"{{"callbackId":"{id}","success":true,"data":{{"x":1}}}}"#
    )));

    let data = JsFuture::from(promise).await.unwrap();
    assert_eq!(as_json(&data), json!({"x": 1}));
}

#[wasm_bindgen_test]
async fn android_promise_rejects_with_host_error() {
    let posted = stub_android();
    let avocado = AvocadoBridge::new();

    let promise = avocado.native_promise("Camera", "getPhoto", JsValue::UNDEFINED);
    remove_stubs();

    let id = as_json(&posted.get(0))["callbackId"].as_str().unwrap().to_string();
    avocado.from_native(JsValue::from_str(&format!(
        r#"{{"callbackId":"{id}","success":false,"error":{{"message":"denied"}}}}"#
    )));

    let error = JsFuture::from(promise).await.unwrap_err();
    assert_eq!(as_json(&error), json!({"message": "denied"}));
}

#[wasm_bindgen_test]
fn console_output_is_forwarded_as_script_strings() {
    let posted = stub_android();
    let avocado = AvocadoBridge::new();

    let args = Array::new();
    args.push(&key("a"));
    args.push(&result(r#"{"b":1}"#));
    args.push(&JsValue::UNDEFINED);
    avocado.log("warn", args);
    remove_stubs();

    let envelope = as_json(&posted.get(0));
    assert_eq!(envelope["pluginId"], "Console");
    assert_eq!(envelope["options"]["level"], "warn");
    assert_eq!(envelope["options"]["message"], r#"a {"b":1} undefined"#);
}

#[wasm_bindgen_test]
fn window_errors_never_suppress_default_handling() {
    let posted = stub_ios();
    let avocado = AvocadoBridge::new();

    assert!(!avocado.handle_window_error(
        "TypeError: x is undefined".to_string(),
        "app://www/main.js".to_string(),
        1,
        1,
        JsValue::UNDEFINED,
    ));
    assert!(!avocado.handle_window_error(
        "Script error.".to_string(),
        String::new(),
        0,
        0,
        JsValue::NULL,
    ));
    remove_stubs();

    assert_eq!(posted.length(), 1);
    let envelope = as_json(&posted.get(0));
    assert_eq!(envelope["methodName"], "jsError");
    assert_eq!(envelope["options"]["error"]["errorObject"], "null");
}

#[wasm_bindgen_test]
fn install_exposes_bridge_and_error_hook() {
    remove_stubs();
    install().unwrap();

    let installed = Reflect::get(&window(), &key("Avocado")).unwrap();
    assert!(installed.is_object());
    let from_native = Reflect::get(&installed, &key("fromNative")).unwrap();
    assert!(from_native.is_function());
    assert!(window().onerror().is_some());
}

#[wasm_bindgen_test]
fn unmatched_results_are_tolerated() {
    remove_stubs();
    let avocado = AvocadoBridge::new();
    avocado.from_native(JsValue::from_str(r#"{"callbackId":"9","success":true,"data":1}"#));
    avocado.from_native(JsValue::from_str("not json"));
    avocado.log("info", Array::of1(&JsValue::from_str("still alive")));
}

#[wasm_bindgen_test]
fn bad_toml_is_a_script_error() {
    assert!(AvocadoBridge::from_toml("transport = 42").is_err());
    assert!(AvocadoBridge::from_toml("[console]\nforward = false").is_ok());
}
