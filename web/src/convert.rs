//! `JsValue` ⇄ `serde_json::Value`, via the page's own `JSON`.

use js_sys::{Function, JSON, Reflect};
use serde_json::{Value, json};
use wasm_bindgen::{JsCast, JsValue};

/// Convert a script value into JSON.
///
/// `undefined` and unserializable values become `null`. `Error` objects keep
/// their name, message and stack, which `JSON.stringify` would drop.
pub(crate) fn to_value(js: &JsValue) -> Value {
    if js.is_undefined() || js.is_null() {
        return Value::Null;
    }
    if let Some(text) = js.as_string() {
        return Value::String(text);
    }
    if let Some(error) = js.dyn_ref::<js_sys::Error>() {
        let mut value = json!({
            "name": String::from(error.name()),
            "message": String::from(error.message()),
        });
        if let Some(stack) = Reflect::get(error, &JsValue::from_str("stack"))
            .ok()
            .and_then(|stack| stack.as_string())
        {
            value["stack"] = Value::String(stack);
        }
        return value;
    }
    JSON::stringify(js)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null)
}

/// Console argument as forwarded to the host.
///
/// Strings pass through. Anything `JSON.stringify` can encode is encoded;
/// the rest (`undefined`, functions, cyclic objects, BigInt) falls back to
/// the script's own `String(value)`.
pub(crate) fn to_console_arg(js: &JsValue) -> Value {
    if let Some(text) = js.as_string() {
        return Value::String(text);
    }
    JSON::stringify(js)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_else(|| Value::String(script_string(js)))
}

/// `String(value)` as evaluated by the page.
fn script_string(js: &JsValue) -> String {
    Reflect::get(&js_sys::global(), &JsValue::from_str("String"))
        .ok()
        .and_then(|string| string.dyn_into::<Function>().ok())
        .and_then(|string| string.call1(&JsValue::NULL, js).ok())
        .and_then(|text| text.as_string())
        .unwrap_or_default()
}

/// `None` for `undefined`/`null`, otherwise the converted value.
pub(crate) fn to_optional_value(js: &JsValue) -> Option<Value> {
    (!js.is_undefined() && !js.is_null()).then(|| to_value(js))
}

pub(crate) fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    JSON::parse(&value.to_string())
}

/// Best-effort text of a thrown script value.
pub(crate) fn describe(js: &JsValue) -> String {
    match to_value(js) {
        Value::String(text) => text,
        Value::Object(map) if map.contains_key("message") => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        other => other.to_string(),
    }
}
