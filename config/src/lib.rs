//! Bridge configuration.
//!
//! The embedding shell decides which host channel exists and which
//! diagnostics are forwarded. Configuration is read from TOML:
//!
//! ```toml
//! transport = "android"
//!
//! [console]
//! forward = true
//!
//! [errors]
//! forward = true
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use avocado_types::TransportKind;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding [`BridgeConfig::transport`] in [`BridgeConfig::load`].
pub const TRANSPORT_ENV_VAR: &str = "AVOCADO_TRANSPORT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub transport: TransportKind,
    pub console: ConsoleConfig,
    pub errors: ErrorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Forward console output to the host's `Console` plugin.
    pub forward: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { forward: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorConfig {
    /// Forward uncaught script errors to the host.
    pub forward: bool,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self { forward: true }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl BridgeConfig {
    /// Configuration with the given transport and default forwarding.
    #[must_use]
    pub fn with_transport(transport: TransportKind) -> Self {
        Self {
            transport,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the default location, then apply [`TRANSPORT_ENV_VAR`].
    ///
    /// A missing file yields defaults. Unreadable or invalid files are logged
    /// and yield `None` so the shell can decide how to proceed.
    pub fn load() -> Option<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("{err}");
                    return None;
                }
            },
            _ => Self::default(),
        };
        config.apply_transport_override(env::var(TRANSPORT_ENV_VAR).ok().as_deref());
        Some(config)
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    fn apply_transport_override(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else { return };
        match raw.parse::<TransportKind>() {
            Ok(kind) => {
                tracing::debug!(transport = %kind, "Transport overridden from environment");
                self.transport = kind;
            }
            Err(err) => {
                tracing::warn!("Ignoring {TRANSPORT_ENV_VAR}: {err}");
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("avocado").join("bridge.toml"))
}
