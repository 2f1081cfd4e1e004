//! In-memory channel and console doubles.
//!
//! Used by this crate's tests and by embedders exercising their own code
//! against a bridge without a real host.

use std::sync::{Mutex, MutexGuard, PoisonError};

use avocado_types::{CallEnvelope, LogLevel};
use serde_json::Value;

use crate::error::ChannelError;
use crate::sink::{LogSink, join_args};
use crate::transport::{HostChannel, HostMessage};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Host channel that records every posted message.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    messages: Mutex<Vec<HostMessage>>,
    reject: bool,
}

impl RecordingChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel that rejects every post and records nothing.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            messages: Mutex::default(),
            reject: true,
        }
    }

    #[must_use]
    pub fn messages(&self) -> Vec<HostMessage> {
        lock(&self.messages).clone()
    }

    /// Posted messages decoded back into envelopes, in post order.
    ///
    /// Messages that do not decode are skipped.
    #[must_use]
    pub fn envelopes(&self) -> Vec<CallEnvelope> {
        lock(&self.messages)
            .iter()
            .filter_map(|message| match message {
                HostMessage::Text(text) => serde_json::from_str(text).ok(),
                HostMessage::Structured(value) => serde_json::from_value(value.clone()).ok(),
            })
            .collect()
    }

    #[must_use]
    pub fn last_envelope(&self) -> Option<CallEnvelope> {
        self.envelopes().pop()
    }
}

impl HostChannel for RecordingChannel {
    fn post_message(&self, message: HostMessage) -> Result<(), ChannelError> {
        if self.reject {
            return Err(ChannelError::new("recording channel configured to fail"));
        }
        lock(&self.messages).push(message);
        Ok(())
    }
}

/// One console call captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub args: Vec<Value>,
}

impl LogRecord {
    /// The line as a console would print it.
    #[must_use]
    pub fn message(&self) -> String {
        join_args(&self.args)
    }
}

/// Console sink that keeps every call in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.records).clone()
    }

    /// Printed lines logged at exactly `level`.
    #[must_use]
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        lock(&self.records)
            .iter()
            .filter(|record| record.level == level)
            .map(LogRecord::message)
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: LogLevel, args: &[Value]) {
        lock(&self.records).push(LogRecord {
            level,
            args: args.to_vec(),
        });
    }
}
