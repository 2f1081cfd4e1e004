use serde_json::Value;
use thiserror::Error;

/// Why an outbound call never reached the host.
///
/// Infrastructure failures only. [`Bridge::to_native`](crate::Bridge::to_native)
/// logs these and never hands them to scripted code.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("browser implementation unavailable for: {plugin_id}")]
    NotNative { plugin_id: String },
    #[error("options for {plugin_id}.{method_name} must be an object, got {found}")]
    InvalidOptions {
        plugin_id: String,
        method_name: String,
        found: &'static str,
    },
    #[error("no callback ids left to issue")]
    IdsExhausted,
    #[error("failed to encode call envelope: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Returned by a [`HostChannel`](crate::HostChannel) that could not post a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host channel rejected message: {0}")]
pub struct ChannelError(String);

impl ChannelError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Failure observed by a promise-style caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// The host answered with `success: false`.
    #[error("host rejected the call: {0}")]
    Rejected(Value),
    /// The continuation was released without the host answering: no host
    /// platform, a failed post, or an explicit unregister.
    #[error("call was abandoned before the host answered")]
    Abandoned,
}
