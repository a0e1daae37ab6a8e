//! Custom error types for the common library
//!
//! This module defines the configuration error shared by every service
//! that loads its settings through [`crate::settings`].

use config::ConfigError as SourceError;
use thiserror::Error;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or merged
    #[error("Configuration source error: {0}")]
    Source(#[source] SourceError),

    /// A value was read but does not satisfy its constraints
    #[error("Invalid configuration value for `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    /// Build an [`ConfigError::Invalid`] for the given key
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
