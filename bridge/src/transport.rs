//! Transport adapter.
//!
//! Hides the difference between the two host channel styles behind a single
//! "deliver envelope to host" primitive. The post itself is delegated to a
//! [`HostChannel`] supplied by the embedding shell; responses never travel
//! through here (see [`Bridge::from_native`](crate::Bridge::from_native)).

use std::fmt;
use std::sync::Arc;

use avocado_types::{CallEnvelope, TransportKind};
use serde_json::Value;

use crate::error::{BridgeError, ChannelError};

/// `type` discriminator added to structured messages.
pub const STRUCTURED_MESSAGE_TYPE: &str = "message";

/// A call envelope encoded for a specific channel style.
#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    /// JSON text, for Android-style bridge objects.
    Text(String),
    /// Envelope object tagged with `type: "message"`, for iOS-style handlers.
    Structured(Value),
}

/// One-way message post into the native host.
pub trait HostChannel: Send + Sync {
    fn post_message(&self, message: HostMessage) -> Result<(), ChannelError>;
}

pub struct Transport {
    kind: TransportKind,
    channel: Option<Arc<dyn HostChannel>>,
}

impl Transport {
    /// Bind a transport kind to the shell's channel.
    ///
    /// A native kind without a channel degrades to [`Transport::none`].
    pub fn new(kind: TransportKind, channel: Option<Arc<dyn HostChannel>>) -> Self {
        match (kind.is_native(), channel) {
            (true, Some(channel)) => Self {
                kind,
                channel: Some(channel),
            },
            (true, None) => {
                tracing::warn!(transport = %kind, "No host channel supplied, running without a native host");
                Self::none()
            }
            (false, _) => Self::none(),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self {
            kind: TransportKind::None,
            channel: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.channel.is_some()
    }

    /// Encode an envelope in the shape this transport's channel expects.
    pub fn encode(&self, envelope: &CallEnvelope) -> Result<HostMessage, BridgeError> {
        match self.kind {
            TransportKind::Android => Ok(HostMessage::Text(serde_json::to_string(envelope)?)),
            TransportKind::Ios => {
                let mut value = serde_json::to_value(envelope)?;
                if let Value::Object(map) = &mut value {
                    map.insert(
                        "type".to_string(),
                        Value::String(STRUCTURED_MESSAGE_TYPE.to_string()),
                    );
                }
                Ok(HostMessage::Structured(value))
            }
            TransportKind::None => Err(BridgeError::NotNative {
                plugin_id: envelope.plugin_id().to_string(),
            }),
        }
    }

    pub(crate) fn send(&self, envelope: &CallEnvelope) -> Result<(), BridgeError> {
        let Some(channel) = &self.channel else {
            return Err(BridgeError::NotNative {
                plugin_id: envelope.plugin_id().to_string(),
            });
        };
        let message = self.encode(envelope)?;
        channel.post_message(message)?;
        Ok(())
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("kind", &self.kind)
            .field("native", &self.is_native())
            .finish()
    }
}
