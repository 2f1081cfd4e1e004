//! Browser bindings for the Avocado bridge.
//!
//! Compiled to WebAssembly and loaded into the web view. The exported
//! `Avocado` class wires an [`avocado_bridge::Bridge`] to the handler the
//! native shell installed on `window` and to the page's console.

mod bindings;
mod channel;
mod console;
mod convert;

pub use bindings::{AvocadoBridge, install};
pub use channel::{WebViewChannel, detect_transport};
pub use console::WebConsole;
