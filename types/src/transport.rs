use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which host message channel the embedding shell provides.
///
/// Chosen by the shell through configuration; never sniffed from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// No host present (plain browser). Calls are logged and dropped.
    #[default]
    None,
    /// Android-style bridge object: accepts envelopes as JSON text.
    Android,
    /// iOS-style message handler: accepts structured values tagged with `type`.
    Ios,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transport {0:?}: expected one of none, android, ios")]
pub struct TransportKindError(String);

impl TransportKind {
    #[must_use]
    pub fn is_native(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub fn platform(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform())
    }
}

impl FromStr for TransportKind {
    type Err = TransportKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            _ => Err(TransportKindError(s.to_string())),
        }
    }
}
