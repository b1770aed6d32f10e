//! The flat wire field mapping sent to the API.

use std::collections::BTreeMap;
use std::fmt;

use crate::codec::{FormSource, FormValue};

/// Value of one wire field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    /// Text.
    Text(String),
    /// Boolean, sent as `true` / `false`.
    Bool(bool),
    /// Integer, sent in decimal.
    Int(i64),
    /// Repeated key, one occurrence per element.
    List(Vec<String>),
}

impl WireValue {
    /// Empty text or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            WireValue::Text(text) => text.is_empty(),
            WireValue::List(items) => items.is_empty(),
            WireValue::Bool(_) | WireValue::Int(_) => false,
        }
    }

    /// Text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Text(text) => write!(f, "{:?}", text),
            WireValue::Bool(flag) => write!(f, "{}", flag),
            WireValue::Int(n) => write!(f, "{}", n),
            WireValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|item| format!("{:?}", item)).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        WireValue::Text(value.to_string())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        WireValue::Text(value)
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        WireValue::Bool(value)
    }
}

impl From<WireValue> for FormValue {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Text(text) => FormValue::Text(text),
            WireValue::Bool(flag) => FormValue::Bool(flag),
            WireValue::Int(n) => FormValue::Int(n),
            WireValue::List(items) => FormValue::from(items),
        }
    }
}

/// Wire field name to value, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireFields {
    fields: BTreeMap<String, WireValue>,
}

impl WireFields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<WireValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.fields.get(key)
    }

    /// Text of a field, if it is set and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(WireValue::as_str)
    }

    /// Returns true when the field is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop every field whose value is empty.
    pub fn retain_non_empty(&mut self) {
        self.fields.retain(|_, value| !value.is_empty());
    }

    /// Convert into a form source for encoding.
    pub fn into_form_source(self) -> FormSource {
        FormSource::Map(
            self.fields
                .into_iter()
                .map(|(key, value)| (key, FormValue::from(value)))
                .collect(),
        )
    }
}

impl IntoIterator for WireFields {
    type Item = (String, WireValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, WireValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    #[test]
    fn test_is_empty() {
        assert!(WireValue::Text(String::new()).is_empty());
        assert!(WireValue::List(vec![]).is_empty());
        assert!(!WireValue::Bool(false).is_empty());
        assert!(!WireValue::Int(0).is_empty());
    }

    #[test]
    fn test_retain_non_empty() {
        let mut fields = WireFields::new();
        fields.insert("subject", "");
        fields.insert("attachments", WireValue::List(vec![]));
        fields.insert("isTransactional", true);
        fields.insert("from", "a@b.com");

        fields.retain_non_empty();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["from", "isTransactional"]);
    }

    #[test]
    fn test_into_form_source_encodes() {
        let mut fields = WireFields::new();
        fields.insert("attachments", WireValue::List(vec!["a.pdf".into(), "b.pdf".into()]));
        fields.insert("encodingType", WireValue::Int(4));
        fields.insert("trackOpens", false);

        assert_eq!(
            encode(&fields.into_form_source()).unwrap(),
            "attachments=a.pdf&attachments=b.pdf&encodingType=4&trackOpens=false"
        );
    }
}
