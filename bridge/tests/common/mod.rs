//! Shared fixtures for bridge integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use avocado_bridge::testing::{RecordingChannel, RecordingSink};
use avocado_bridge::{Bridge, Transport, TransportKind};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness' captured writer.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("avocado_bridge=debug"))
        .with_test_writer()
        .try_init();
}

/// A bridge wired to in-memory doubles.
pub struct Harness {
    pub bridge: Arc<Bridge>,
    pub channel: Arc<RecordingChannel>,
    pub console: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(kind: TransportKind) -> Self {
        Self::with_channel(kind, RecordingChannel::new())
    }

    pub fn with_channel(kind: TransportKind, channel: RecordingChannel) -> Self {
        setup_test_logging();
        let channel = Arc::new(channel);
        let console = Arc::new(RecordingSink::new());
        let bridge = Arc::new(Bridge::new(
            Transport::new(kind, Some(channel.clone())),
            console.clone(),
        ));
        Self {
            bridge,
            channel,
            console,
        }
    }
}
