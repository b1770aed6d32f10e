//! Configuration error types for the Elastic Email client.

use thiserror::Error;

/// Errors that can occur while building or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required configuration field is missing or resolved to nothing.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// The base URL could not be parsed.
    #[error("Invalid base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        message: String,
    },
}
