use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use thiserror::Error;

/// Wire form of [`CallbackId::NoResponse`].
pub const NO_RESPONSE_WIRE: &str = "-1";

/// Correlation id carried by every call and result envelope.
///
/// Always a string on the wire: `"-1"` for fire-and-forget calls, otherwise a
/// positive decimal integer minted by the bridge that issued the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CallbackId {
    /// The caller registered no continuation.
    NoResponse,
    Issued(NonZeroU64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid callback id {0:?}: expected \"-1\" or a positive integer")]
pub struct CallbackIdError(String);

impl CallbackId {
    /// Id for the `n`th registered call. `None` for zero, which is never issued.
    #[must_use]
    pub fn issued(n: u64) -> Option<Self> {
        NonZeroU64::new(n).map(Self::Issued)
    }

    /// Numeric value of an issued id.
    #[must_use]
    pub fn value(self) -> Option<u64> {
        match self {
            Self::NoResponse => None,
            Self::Issued(n) => Some(n.get()),
        }
    }

    #[must_use]
    pub fn expects_response(self) -> bool {
        matches!(self, Self::Issued(_))
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => f.write_str(NO_RESPONSE_WIRE),
            Self::Issued(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for CallbackId {
    type Err = CallbackIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NO_RESPONSE_WIRE {
            return Ok(Self::NoResponse);
        }
        // u64::from_str accepts a leading '+', which the bridge never emits.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CallbackIdError(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(Self::issued)
            .ok_or_else(|| CallbackIdError(s.to_string()))
    }
}

impl TryFrom<String> for CallbackId {
    type Error = CallbackIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CallbackId> for String {
    fn from(value: CallbackId) -> Self {
        value.to_string()
    }
}
