//! Error types for the Elastic Email integration.
//!
//! Errors fall into three families:
//!
//! - Validation errors raised synchronously at the caller boundary:
//!   [`ConfigError`](crate::config::ConfigError) (missing API key) and
//!   [`BuilderError`](crate::builders::BuilderError) (option misuse)
//! - Structural codec errors: [`CodecError`](crate::codec::CodecError)
//! - Delivery errors: [`ElasticEmailError::Api`], raised when the remote call
//!   fails or answers with a status above 299
//!
//! Empty option values are not errors; the transformation pipeline drops them.
//! So are unknown or malformed options supplied through the deprecated raw
//! option list.
//!
//! # Examples
//!
//! ```rust
//! use integrations_elastic_email::error::ElasticEmailError;
//!
//! fn report(error: &ElasticEmailError) {
//!     if error.is_retryable() {
//!         println!("temporary failure: {}", error);
//!     }
//!     if let Some(status) = error.status() {
//!         println!("HTTP status: {}", status);
//!     }
//! }
//! ```

use thiserror::Error;

use crate::builders::BuilderError;
use crate::codec::CodecError;
use crate::config::ConfigError;

/// Result type alias for Elastic Email operations.
pub type ElasticEmailResult<T> = Result<T, ElasticEmailError>;

/// Top-level error type for the Elastic Email integration.
#[derive(Debug, Error)]
pub enum ElasticEmailError {
    /// The client configuration is invalid (e.g. no API key).
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A message or send option was built incorrectly.
    #[error("Builder error: {0}")]
    Builder(#[from] BuilderError),

    /// The wire fields could not be form-encoded, or a body could not be decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The API call failed.
    ///
    /// `message` embeds the response body (or the transport failure) and a
    /// copy of the sent parameters with the API key replaced by `[FILTERED]`.
    #[error("{message}")]
    Api {
        /// HTTP status, absent when the request never got a response.
        status: Option<u16>,
        /// Human-readable description, safe to log.
        message: String,
    },

    /// The HTTP transport failed before a response was received.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Whether retrying could succeed.
        retryable: bool,
    },

    /// A response body could not be parsed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the parse failure.
        message: String,
    },
}

impl ElasticEmailError {
    /// Create a transport error without an underlying source.
    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
            retryable,
        }
    }

    /// Returns the HTTP status carried by an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ElasticEmailError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the error is retryable.
    ///
    /// Retryable errors are transport failures flagged as such, API errors
    /// without a response, and API errors with status 429 or 5xx. The client
    /// itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            ElasticEmailError::Transport { retryable, .. } => *retryable,
            ElasticEmailError::Api { status: None, .. } => true,
            ElasticEmailError::Api {
                status: Some(status),
                ..
            } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ElasticEmailError {
    fn from(err: serde_json::Error) -> Self {
        ElasticEmailError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ElasticEmailError {
    fn from(err: reqwest::Error) -> Self {
        let retryable = err.is_timeout() || err.is_connect();

        ElasticEmailError::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
            retryable,
        }
    }
}
