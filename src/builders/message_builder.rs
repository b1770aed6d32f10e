//! Fluent construction of [`Message`] values.

use crate::builders::BuilderError;
use crate::types::{Address, Message};

/// Builder for constructing a [`Message`].
///
/// `build()` enforces what a delivery needs before it is attempted: a sender
/// and at least one recipient.
///
/// # Examples
///
/// ```rust
/// use integrations_elastic_email::builders::MessageBuilder;
///
/// let message = MessageBuilder::new()
///     .from(("From", "from@foo.com"))
///     .to(("To", "to@bar.com"))
///     .cc("cc@bar.com")
///     .reply_to("reply@foo.com")
///     .subject("My Subject")
///     .text("Hello")
///     .build()?;
///
/// assert_eq!(message.to.len(), 1);
/// assert_eq!(message.header("Reply-To"), Some("reply@foo.com"));
/// # Ok::<(), integrations_elastic_email::builders::BuilderError>(())
/// ```
#[derive(Debug, Default)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Create a new message builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender. Required.
    pub fn from(mut self, address: impl Into<Address>) -> Self {
        self.message.from = Some(address.into());
        self
    }

    /// Add a "To" recipient.
    pub fn to(mut self, address: impl Into<Address>) -> Self {
        self.message.to.push(address.into());
        self
    }

    /// Add a "CC" recipient.
    pub fn cc(mut self, address: impl Into<Address>) -> Self {
        self.message.cc.push(address.into());
        self
    }

    /// Add a "BCC" recipient.
    pub fn bcc(mut self, address: impl Into<Address>) -> Self {
        self.message.bcc.push(address.into());
        self
    }

    /// Set the subject.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = Some(subject.into());
        self
    }

    /// Set the plain text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.message.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.message.html_body = Some(body.into());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message.headers.push((name.into(), value.into()));
        self
    }

    /// Set the reply-to address, stored as a `Reply-To` header.
    pub fn reply_to(self, address: impl Into<Address>) -> Self {
        let address = address.into().to_string();
        self.header("Reply-To", address)
    }

    /// Build the message.
    ///
    /// # Errors
    ///
    /// - [`BuilderError::MissingField`] for `from` when no sender is set
    /// - [`BuilderError::MissingField`] for `to` when there are no recipients
    pub fn build(self) -> Result<Message, BuilderError> {
        let from = self
            .message
            .from
            .as_ref()
            .ok_or_else(|| BuilderError::missing_field("from"))?;

        if from.email.is_empty() {
            return Err(BuilderError::invalid_value("from", "Email address cannot be empty"));
        }

        if self.message.recipient_count() == 0 {
            return Err(BuilderError::missing_field("to"));
        }

        Ok(self.message)
    }
}
