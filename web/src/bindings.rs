//! The `Avocado` object scripts talk to.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use avocado_bridge::{
    Bridge, CallError, CallbackId, ConsoleForwarder, ErrorForwarder, HostChannel, HostOutcome,
    LogSink, ScriptErrorEvent,
};
use avocado_config::BridgeConfig;
use avocado_types::LogLevel;
use js_sys::{Array, Error as ScriptError, Function, Object, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsError, JsValue};
use wasm_bindgen_futures::future_to_promise;

use crate::channel::{WebViewChannel, detect_transport};
use crate::console::WebConsole;
use crate::convert::{describe, to_console_arg, to_js, to_optional_value, to_value};

/// A result handed to a script callback after `fromNative` returns.
struct Completion {
    listener: u64,
    outcome: HostOutcome,
}

type CompletionQueue = Arc<Mutex<VecDeque<Completion>>>;

struct Listener {
    callback_id: CallbackId,
    function: Function,
}

/// Script-facing bridge, exported as `Avocado`.
#[wasm_bindgen(js_name = Avocado)]
pub struct AvocadoBridge {
    bridge: Arc<Bridge>,
    console: ConsoleForwarder,
    errors: ErrorForwarder,
    completions: CompletionQueue,
    listeners: RefCell<HashMap<u64, Listener>>,
    next_listener: Cell<u64>,
}

#[wasm_bindgen(js_class = Avocado)]
impl AvocadoBridge {
    /// Bridge for whichever shell installed a handler on `window`.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&BridgeConfig::default())
    }

    /// Bridge configured from TOML text. An unset `transport` is detected.
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(text: &str) -> Result<AvocadoBridge, JsError> {
        let config = BridgeConfig::from_toml_str(text).map_err(|err| JsError::new(&err.to_string()))?;
        Ok(Self::with_config(&config))
    }

    #[wasm_bindgen(getter, js_name = isNative)]
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.bridge.is_native()
    }

    /// `"android"`, `"ios"`, or `undefined` in a plain browser.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn platform(&self) -> Option<String> {
        let kind = self.bridge.transport_kind();
        kind.is_native().then(|| kind.platform().to_string())
    }

    /// Fire-and-forget plugin call.
    #[wasm_bindgen(js_name = toNative)]
    pub fn to_native(&self, plugin_id: &str, method_name: &str, options: JsValue) -> String {
        self.bridge
            .to_native(plugin_id, method_name, to_optional_value(&options), None)
            .to_string()
    }

    /// Call whose results are passed to `callback(error, data)`, once per
    /// host answer, until the returned id is unregistered.
    #[wasm_bindgen(js_name = nativeCallback)]
    pub fn native_callback(
        &self,
        plugin_id: &str,
        method_name: &str,
        options: JsValue,
        callback: Function,
    ) -> String {
        let listener = self.next_listener.get() + 1;
        self.next_listener.set(listener);
        let queue = Arc::clone(&self.completions);
        let callback_id = self.bridge.native_callback(
            plugin_id,
            method_name,
            to_optional_value(&options),
            move |outcome| {
                queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push_back(Completion { listener, outcome });
            },
        );
        if callback_id.expects_response() {
            self.listeners.borrow_mut().insert(
                listener,
                Listener {
                    callback_id,
                    function: callback,
                },
            );
        }
        callback_id.to_string()
    }

    /// Call answered through a `Promise`.
    #[wasm_bindgen(js_name = nativePromise)]
    pub fn native_promise(&self, plugin_id: &str, method_name: &str, options: JsValue) -> Promise {
        let pending = self
            .bridge
            .native_promise(plugin_id, method_name, to_optional_value(&options));
        future_to_promise(async move {
            match pending.await {
                Ok(data) => to_js(&data),
                Err(CallError::Rejected(error)) => Err(to_js(&error)?),
                Err(abandoned @ CallError::Abandoned) => {
                    Err(ScriptError::new(&abandoned.to_string()).into())
                }
            }
        })
    }

    /// Entry point the host invokes with each result.
    ///
    /// Accepts the result object or its JSON text. `data` and `error` are
    /// deleted from a result object once it has been delivered.
    #[wasm_bindgen(js_name = fromNative)]
    pub fn from_native(&self, result: JsValue) {
        match result.as_string() {
            Some(text) => self.bridge.from_native_json(&text),
            None => {
                self.bridge.from_native_json(&to_value(&result).to_string());
                if let Some(object) = result.dyn_ref::<Object>() {
                    for field in ["data", "error"] {
                        let _ = Reflect::delete_property(object, &JsValue::from_str(field));
                    }
                }
            }
        }
        self.flush_completions();
    }

    /// Release a callback-style call. Returns whether it was registered.
    pub fn unregister(&self, callback_id: &str) -> bool {
        let Ok(callback_id) = callback_id.parse::<CallbackId>() else {
            return false;
        };
        self.listeners
            .borrow_mut()
            .retain(|_, listener| listener.callback_id != callback_id);
        self.bridge.unregister(callback_id)
    }

    /// Console entry point: prints the raw arguments locally, then forwards
    /// their string form to the host.
    ///
    /// Unknown level names log at `log`.
    pub fn log(&self, level: &str, args: Array) {
        let level = level.parse().unwrap_or(LogLevel::Log);
        WebConsole::print(level, &args);
        let forwarded: Vec<Value> = args.iter().map(|arg| to_console_arg(&arg)).collect();
        self.console.forward_line(level, &forwarded);
    }

    /// `window.onerror`-compatible handler. Always returns `false`.
    #[wasm_bindgen(js_name = handleWindowError)]
    pub fn handle_window_error(
        &self,
        message: String,
        url: String,
        line: u32,
        column: u32,
        error: JsValue,
    ) -> bool {
        self.errors.handle_window_error(&ScriptErrorEvent {
            message,
            url,
            line,
            column,
            error: to_optional_value(&error),
        })
    }
}

/// Install a bridge as `window.Avocado` and hook `window.onerror`.
///
/// The host reaches `fromNative` through `window.Avocado`; it holds no other
/// handle into the page. Runs automatically when the module loads.
#[wasm_bindgen(start)]
pub fn install() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;
    let avocado = AvocadoBridge::new();
    let errors = avocado.errors.clone();

    let onerror = Closure::<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue) -> bool>::new(
        move |message: JsValue, url: JsValue, line: JsValue, column: JsValue, error: JsValue| {
            errors.handle_window_error(&ScriptErrorEvent {
                message: message.as_string().unwrap_or_else(|| describe(&message)),
                url: url.as_string().unwrap_or_default(),
                line: line.as_f64().unwrap_or_default() as u32,
                column: column.as_f64().unwrap_or_default() as u32,
                error: to_optional_value(&error),
            })
        },
    );
    window.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // The hook lives as long as the page.
    onerror.forget();

    Reflect::set(&window, &JsValue::from_str("Avocado"), &JsValue::from(avocado))?;
    Ok(())
}

impl Default for AvocadoBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl AvocadoBridge {
    fn with_config(config: &BridgeConfig) -> Self {
        let kind = if config.transport.is_native() {
            config.transport
        } else {
            detect_transport()
        };
        let channel = kind
            .is_native()
            .then(|| Arc::new(WebViewChannel::new(kind)) as Arc<dyn HostChannel>);
        let original: Arc<dyn LogSink> = Arc::new(WebConsole);
        let bridge = Arc::new(Bridge::from_config(
            &BridgeConfig {
                transport: kind,
                ..config.clone()
            },
            channel,
            Arc::clone(&original),
        ));
        tracing::debug!(transport = %kind, "Avocado bridge installed");

        Self {
            console: ConsoleForwarder::from_config(&config.console, original, Arc::clone(&bridge)),
            errors: ErrorForwarder::from_config(&config.errors, Arc::clone(&bridge)),
            bridge,
            completions: CompletionQueue::default(),
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Hand queued results to their script callbacks.
    ///
    /// No borrow is held while a callback runs, so callbacks may call back
    /// into the bridge.
    fn flush_completions(&self) {
        loop {
            let next = self
                .completions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            let Some(Completion { listener, outcome }) = next else {
                break;
            };
            let function = self
                .listeners
                .borrow()
                .get(&listener)
                .map(|listener| listener.function.clone());
            let Some(function) = function else {
                continue;
            };

            let (error, data) = match outcome {
                Ok(data) => (Ok(JsValue::NULL), to_js(&data)),
                Err(error) => (to_js(&error), Ok(JsValue::NULL)),
            };
            let called = error.and_then(|error| {
                let data = data?;
                function.call2(&JsValue::NULL, &error, &data)
            });
            if let Err(thrown) = called {
                WebConsole.log(
                    LogLevel::Error,
                    &[Value::String(format!("callback threw: {}", describe(&thrown)))],
                );
            }
        }
    }
}
