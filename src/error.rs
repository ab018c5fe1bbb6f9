//! Errors for the fallible edges of the sandbox: reading configuration and
//! writing save files. The integrators themselves never fail.

use std::path::PathBuf;

use thiserror::Error;

/// Things that can go wrong while loading or validating a [`crate::SandboxConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures while writing a body snapshot. Reading is fail-soft and has no
/// error type of its own.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("unable to write save file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to encode body records")]
    Encode(#[from] serde_json::Error),

    #[error("body {index} has a non-finite or out-of-range value and could not be reloaded")]
    Unloadable { index: usize },
}

/// Failures while assembling a scene from the catalog.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unknown scene id '{0}'")]
    UnknownScene(String),

    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}
