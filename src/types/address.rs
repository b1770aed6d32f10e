//! Email addresses with optional display names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An email address with an optional display name.
///
/// An empty display name is treated the same as no display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// Display name (e.g., "John Doe").
    pub name: Option<String>,
    /// Email address (e.g., "john@example.com").
    pub email: String,
}

impl Address {
    /// Creates an address with just an email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Creates an address with a display name.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Parses `"Name <email>"` or a bare email.
    ///
    /// Surrounding quotes on the name are stripped. Input without a closing
    /// `>` after the `<` is taken as a bare email.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        if let Some((head, rest)) = s.split_once('<') {
            if let Some((email, _)) = rest.split_once('>') {
                let name = head.trim().trim_matches('"');
                return Self::with_name(name, email.trim());
            }
        }

        Self::new(s)
    }

    /// The display name, if present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

impl fmt::Display for Address {
    /// `Name <email>` when a display name exists, else the bare email.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name() {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => f.write_str(&self.email),
        }
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl<N: Into<String>, E: Into<String>> From<(N, E)> for Address {
    /// `(display name, email)`.
    fn from((name, email): (N, E)) -> Self {
        Self::with_name(name, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Address::new("a@b.com").to_string(), "a@b.com");
        assert_eq!(Address::from(("To", "to@bar.com")).to_string(), "To <to@bar.com>");
        assert_eq!(Address::from(("", "to@bar.com")).to_string(), "to@bar.com");
    }

    #[test]
    fn test_empty_name_is_absent() {
        let address = Address::with_name("", "a@b.com");
        assert_eq!(address.display_name(), None);
    }

    #[test]
    fn test_parse() {
        let address = Address::parse("John Doe <john@example.com>");
        assert_eq!(address.display_name(), Some("John Doe"));
        assert_eq!(address.email, "john@example.com");

        let address = Address::parse("\"Quoted\" <q@example.com>");
        assert_eq!(address.display_name(), Some("Quoted"));

        let address = Address::parse("  plain@example.com ");
        assert_eq!(address, Address::new("plain@example.com"));

        let address = Address::parse("<only@example.com>");
        assert_eq!(address.display_name(), None);
        assert_eq!(address.email, "only@example.com");
    }
}
