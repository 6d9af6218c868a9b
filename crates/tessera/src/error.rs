//! # Start-up Error Types
//!
//! Errors surface only while loading configuration. Once a `World` is
//! running, every anomaly is reported through outcome values instead.

use thiserror::Error;

use tessera_economy::EconomyError;

/// Errors raised while loading or validating world configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config {path}: {message}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },

    /// Config file is not valid TOML or does not match the schema.
    #[error("malformed config: {0}")]
    Parse(String),

    /// A field holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The catalog failed to load.
    #[error(transparent)]
    Catalog(#[from] EconomyError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
