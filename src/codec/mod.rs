//! Repeated-key `application/x-www-form-urlencoded` codec.
//!
//! The Elastic Email API does not understand the bracket convention
//! (`key[]=a&key[]=b`) that most form encoders emit for list values. It wants
//! the key repeated once per element instead (`key=a&key=b`), and it answers
//! in the same shape. This module provides both directions:
//!
//! - [`encode`] / [`encode_with`] turn a [`FormSource`] into a query string
//! - [`decode`] / [`decode_into`] turn a query string into a [`DecodedQuery`]
//!   where every key maps to a list of values, even for a single occurrence
//!
//! # Examples
//!
//! ```rust
//! use integrations_elastic_email::codec::{decode, encode, FormSource, FormValue};
//!
//! let source = FormSource::pairs([("to", "a@example.com"), ("to", "b@example.com")]);
//! let body = encode(&source)?;
//! assert_eq!(body, "to=a%40example.com&to=b%40example.com");
//!
//! let decoded = decode(&body)?;
//! assert_eq!(decoded["to"].len(), 2);
//! # Ok::<(), integrations_elastic_email::codec::CodecError>(())
//! ```

mod decode;
mod encode;

pub use decode::{decode, decode_into, DecodedQuery};
pub use encode::{encode, encode_with};

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Errors raised by the form codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A value held a nested mapping or a list of mappings/pairs.
    #[error("Nested values are not supported by the form encoding (key: {key})")]
    NestedValue {
        /// The key whose value was nested.
        key: String,
    },

    /// The top-level input was not a mapping, a pair list or a list of mappings.
    #[error("Unsupported form source: expected a map, a list of pairs or a list of maps, got {found}")]
    UnsupportedSource {
        /// Description of what was supplied instead.
        found: String,
    },

    /// A fragment of the query string was not valid percent-encoding.
    #[error("Invalid form encoding: {raw:?}")]
    BadEncoding {
        /// The raw, undecoded fragment.
        raw: String,
    },
}

/// A single value in a form source.
///
/// Scalars are stringified on encode. `List` repeats the key once per element.
/// `Map` exists so that dynamic input can be represented faithfully; encoding
/// it (or a list containing it) fails with [`CodecError::NestedValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Valueless key; encodes as a bare `key`.
    Null,
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value, encoded as `true` / `false`.
    Bool(bool),
    /// Sequence of values sharing one key.
    List(Vec<FormValue>),
    /// Ordered nested mapping. Never encodable.
    Map(Vec<(String, FormValue)>),
}

impl FormValue {
    /// Returns true for the scalar variants.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FormValue::List(_) | FormValue::Map(_))
    }

    fn is_empty_collection(&self) -> bool {
        match self {
            FormValue::List(items) => items.is_empty(),
            FormValue::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Null => Ok(()),
            FormValue::Text(s) => f.write_str(s),
            FormValue::Int(i) => write!(f, "{}", i),
            FormValue::Float(x) => write!(f, "{}", x),
            FormValue::Bool(b) => write!(f, "{}", b),
            FormValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FormValue::Map(entries) => {
                let parts: Vec<String> =
                    entries.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Int(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
    fn from(values: Vec<T>) -> Self {
        FormValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FormValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FormValue::Null,
            Value::Bool(b) => FormValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FormValue::Int(i),
                None => FormValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FormValue::Text(s),
            Value::Array(items) => FormValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => {
                FormValue::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Input accepted by [`encode`].
///
/// The variant is chosen once, up front, and each has its own ordering rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSource {
    /// Unordered mapping. Keys are emitted in lexicographic order.
    Map(BTreeMap<String, FormValue>),
    /// Ordered pairs. Order and duplicate keys are preserved.
    Pairs(Vec<(String, FormValue)>),
    /// Several mappings, encoded one after another and concatenated.
    Maps(Vec<BTreeMap<String, FormValue>>),
}

impl FormSource {
    /// Build a [`FormSource::Map`] from any key/value iterator.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FormValue>,
    {
        FormSource::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Build a [`FormSource::Pairs`] from any key/value iterator.
    pub fn pairs<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FormValue>,
    {
        FormSource::Pairs(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<serde_json::Value> for FormSource {
    type Error = CodecError;

    /// Classify dynamic JSON input.
    ///
    /// - object: [`FormSource::Map`]
    /// - array of objects: [`FormSource::Maps`]
    /// - array of `[key, value]` arrays with string keys: [`FormSource::Pairs`]
    /// - empty array: empty [`FormSource::Pairs`]
    ///
    /// Anything else is [`CodecError::UnsupportedSource`].
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Object(entries) => Ok(FormSource::Map(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            )),
            Value::Array(items) if items.is_empty() => Ok(FormSource::Pairs(Vec::new())),
            Value::Array(items) if items.iter().all(Value::is_object) => Ok(FormSource::Maps(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(entries) => {
                            Some(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
                        }
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Array(items) => {
                let mut pairs = Vec::with_capacity(items.len());
                for item in items {
                    let pair = match item {
                        Value::Array(pair) => <[Value; 2]>::try_from(pair).map_err(Value::Array),
                        other => Err(other),
                    };
                    match pair {
                        Ok([Value::String(key), value]) => pairs.push((key, value.into())),
                        Ok([key, value]) => {
                            return Err(CodecError::UnsupportedSource {
                                found: format!("pair with non-string key [{}, {}]", key, value),
                            })
                        }
                        Err(other) => {
                            return Err(CodecError::UnsupportedSource {
                                found: format!("array element {}", other),
                            })
                        }
                    }
                }
                Ok(FormSource::Pairs(pairs))
            }
            other => Err(CodecError::UnsupportedSource {
                found: other.to_string(),
            }),
        }
    }
}
