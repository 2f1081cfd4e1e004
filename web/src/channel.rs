//! Host channels installed by the native shells on `window`.
//!
//! Android exposes `window.androidBridge.postMessage(text)`; iOS exposes
//! `window.webkit.messageHandlers.bridge.postMessage(object)`. Both are
//! looked up on every post, so a shell may install them late.

use avocado_bridge::{ChannelError, HostChannel, HostMessage};
use avocado_types::TransportKind;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::convert::{describe, to_js};

const ANDROID_HANDLER: &[&str] = &["androidBridge"];
const IOS_HANDLER: &[&str] = &["webkit", "messageHandlers", "bridge"];

/// Which shell, if any, installed a handler on `window`. Android wins when
/// both are present.
#[must_use]
pub fn detect_transport() -> TransportKind {
    let Some(window) = web_sys::window() else {
        return TransportKind::None;
    };
    if lookup(&window, ANDROID_HANDLER).is_some() {
        TransportKind::Android
    } else if lookup(&window, IOS_HANDLER).is_some() {
        TransportKind::Ios
    } else {
        TransportKind::None
    }
}

/// Walk `path` from `root`, stopping at the first missing property.
fn lookup(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    path.iter().try_fold(root.clone(), |object, key| {
        let next = Reflect::get(&object, &JsValue::from_str(key)).ok()?;
        (!next.is_undefined() && !next.is_null()).then_some(next)
    })
}

fn js_error(context: &str, thrown: &JsValue) -> ChannelError {
    ChannelError::new(format!("{context}: {}", describe(thrown)))
}

/// [`HostChannel`] posting through the shell's `window` handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebViewChannel {
    kind: TransportKind,
}

impl WebViewChannel {
    #[must_use]
    pub fn new(kind: TransportKind) -> Self {
        Self { kind }
    }

    /// Channel for the detected shell, if any.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let kind = detect_transport();
        kind.is_native().then(|| Self::new(kind))
    }

    #[must_use]
    pub fn kind(&self) -> TransportKind {
        self.kind
    }
}

impl HostChannel for WebViewChannel {
    fn post_message(&self, message: HostMessage) -> Result<(), ChannelError> {
        let path = match self.kind {
            TransportKind::Android => ANDROID_HANDLER,
            TransportKind::Ios => IOS_HANDLER,
            TransportKind::None => return Err(ChannelError::new("no host platform")),
        };
        let window = web_sys::window().ok_or_else(|| ChannelError::new("no window object"))?;
        let handler = lookup(&window, path).ok_or_else(|| {
            ChannelError::new(format!("{} message handler is not installed", self.kind))
        })?;
        let post: Function = Reflect::get(&handler, &JsValue::from_str("postMessage"))
            .map_err(|thrown| js_error("reading postMessage", &thrown))?
            .dyn_into()
            .map_err(|_| ChannelError::new("postMessage is not a function"))?;

        let payload = match message {
            HostMessage::Text(text) => JsValue::from_str(&text),
            HostMessage::Structured(value) => {
                to_js(&value).map_err(|thrown| js_error("building message object", &thrown))?
            }
        };
        post.call1(&handler, &payload)
            .map_err(|thrown| js_error("postMessage threw", &thrown))?;
        Ok(())
    }
}
