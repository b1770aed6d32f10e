//! The structured email consumed by the transformation pipeline.

use super::{Address, OptionValue, SendOptions};

/// An email message.
///
/// Messages are plain values. The option builders in
/// [`crate::builders`] consume a message and return a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    /// Sender.
    pub from: Option<Address>,
    /// "To" recipients, in order.
    pub to: Vec<Address>,
    /// "CC" recipients, in order.
    pub cc: Vec<Address>,
    /// "BCC" recipients, in order.
    pub bcc: Vec<Address>,
    /// Subject line.
    pub subject: Option<String>,
    /// Plain text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Extra headers, in order. A `Reply-To` header is sent as the reply-to address.
    pub headers: Vec<(String, String)>,
    /// Typed send options.
    pub send_options: Option<SendOptions>,
    /// Raw options under the deprecated alias. Read only when `send_options` is `None`.
    pub legacy_send_options: Option<Vec<(String, OptionValue)>>,
}

impl Message {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recipients across to, cc and bcc.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_count() {
        let message = Message {
            to: vec!["a@x.com".into(), "b@x.com".into()],
            bcc: vec!["c@x.com".into()],
            ..Message::default()
        };
        assert_eq!(message.recipient_count(), 3);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let message = Message {
            headers: vec![("reply-to".into(), "r@x.com".into())],
            ..Message::default()
        };
        assert_eq!(message.header("Reply-To"), Some("r@x.com"));
        assert_eq!(message.header("X-Other"), None);
    }
}
