use avocado_bridge::LogSink;
use avocado_types::LogLevel;
use js_sys::Array;
use serde_json::Value;
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::convert::to_js;

/// The page's `console`, unwrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebConsole;

impl WebConsole {
    /// Print script values untouched, as the page itself would.
    pub fn print(level: LogLevel, data: &Array) {
        match level {
            LogLevel::Trace => console::trace(data),
            LogLevel::Debug => console::debug(data),
            LogLevel::Log => console::log(data),
            LogLevel::Info => console::info(data),
            LogLevel::Warn => console::warn(data),
            LogLevel::Error => console::error(data),
        }
    }
}

impl LogSink for WebConsole {
    fn log(&self, level: LogLevel, args: &[Value]) {
        let data: Array = args
            .iter()
            .map(|arg| to_js(arg).unwrap_or(JsValue::NULL))
            .collect();
        Self::print(level, &data);
    }
}
