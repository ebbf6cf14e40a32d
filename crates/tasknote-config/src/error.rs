//! Error types for tasknote configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting has an unusable value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Dotted name of the setting.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Failed to render settings as TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(ser::Error),

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// Failed to determine the platform data directory.
    #[error("could not determine a data directory; pass --config")]
    NoDataDirectory,
}

impl ConfigError {
    /// Creates an `InvalidValue` error.
    pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}
