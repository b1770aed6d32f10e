//! Builders for constructing messages and attaching send options.
//!
//! # Builders
//!
//! - [`MessageBuilder`] - For constructing a [`Message`](crate::types::Message)
//!   with a sender and recipients
//! - The `with_*` methods on [`Message`](crate::types::Message) - For attaching
//!   one validated send option at a time
//!
//! # Examples
//!
//! ```rust
//! use integrations_elastic_email::builders::MessageBuilder;
//! use integrations_elastic_email::types::{EncodingType, Segment};
//!
//! let message = MessageBuilder::new()
//!     .from(("Shop", "shop@example.com"))
//!     .to("customer@example.com")
//!     .subject("Your order")
//!     .html("<p>Thanks!</p>")
//!     .build()?
//!     .with_template("order-confirmation")
//!     .with_encoding_type(EncodingType::QuotedPrintable)
//!     .with_segments([Segment::All])
//!     .with_track_opens(true);
//! # Ok::<(), integrations_elastic_email::builders::BuilderError>(())
//! ```

mod message_builder;
mod send_options;

pub use message_builder::MessageBuilder;

use thiserror::Error;

/// Error type for builder operations.
///
/// Returned when a message is built without a sender or recipients, or when
/// a send option supplied at runtime is unknown or has the wrong shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field has an invalid value.
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue {
        /// The name of the field with the invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// A send option name is not recognized.
    #[error("Unknown send option: {name}")]
    UnknownOption {
        /// The unrecognized option name.
        name: String,
    },
}

impl BuilderError {
    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown option error.
    pub fn unknown_option(name: impl Into<String>) -> Self {
        Self::UnknownOption { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_error_display() {
        assert_eq!(
            BuilderError::missing_field("from").to_string(),
            "Missing required field: from"
        );
        assert_eq!(
            BuilderError::invalid_value("time_off_set_minutes", "expected an integer").to_string(),
            "Invalid value for field 'time_off_set_minutes': expected an integer"
        );
        assert_eq!(
            BuilderError::unknown_option("colour").to_string(),
            "Unknown send option: colour"
        );
    }
}
