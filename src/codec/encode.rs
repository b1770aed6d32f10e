//! Form encoding with repeated keys.

use url::form_urlencoded::byte_serialize;

use super::{CodecError, FormSource, FormValue};

/// Encode a form source, stringifying scalars with their `Display` form.
///
/// # Errors
///
/// Returns [`CodecError::NestedValue`] when any value is a non-empty mapping
/// or a list holding mappings or lists.
///
/// # Examples
///
/// ```rust
/// use integrations_elastic_email::codec::{encode, FormSource, FormValue};
///
/// let source = FormSource::map([("foo", FormValue::from(vec!["bar", "bat"]))]);
/// assert_eq!(encode(&source)?, "foo=bar&foo=bat");
/// # Ok::<(), integrations_elastic_email::codec::CodecError>(())
/// ```
pub fn encode(source: &FormSource) -> Result<String, CodecError> {
    encode_with(source, |value| value.to_string())
}

/// Encode a form source, stringifying scalars with `formatter`.
///
/// The formatter only ever sees scalar values. Its output is percent-encoded
/// afterwards, so it should return the plain text.
pub fn encode_with<F>(source: &FormSource, formatter: F) -> Result<String, CodecError>
where
    F: Fn(&FormValue) -> String,
{
    let mut segments = Vec::new();

    match source {
        FormSource::Map(map) => push_entries(&mut segments, map.iter(), &formatter)?,
        FormSource::Pairs(pairs) => {
            push_entries(&mut segments, pairs.iter().map(|(k, v)| (k, v)), &formatter)?
        }
        FormSource::Maps(maps) => {
            for map in maps {
                push_entries(&mut segments, map.iter(), &formatter)?;
            }
        }
    }

    Ok(segments.join("&"))
}

fn push_entries<'a, I, F>(
    segments: &mut Vec<String>,
    entries: I,
    formatter: &F,
) -> Result<(), CodecError>
where
    I: Iterator<Item = (&'a String, &'a FormValue)>,
    F: Fn(&FormValue) -> String,
{
    for (key, value) in entries {
        if value.is_empty_collection() {
            continue;
        }

        match value {
            FormValue::Map(_) => return Err(nested(key)),
            FormValue::List(items) => {
                if items.iter().any(|item| !item.is_scalar()) {
                    return Err(nested(key));
                }
                for item in items {
                    push_segment(segments, key, item, formatter);
                }
            }
            scalar => push_segment(segments, key, scalar, formatter),
        }
    }

    Ok(())
}

fn push_segment<F>(segments: &mut Vec<String>, key: &str, value: &FormValue, formatter: &F)
where
    F: Fn(&FormValue) -> String,
{
    let segment = match value {
        FormValue::Null => escape(key),
        scalar => format!("{}={}", escape(key), escape(&formatter(scalar))),
    };

    // A bare empty key would otherwise leave an empty `&&` gap.
    if !segment.is_empty() {
        segments.push(segment);
    }
}

fn escape(input: &str) -> String {
    byte_serialize(input.as_bytes()).collect()
}

fn nested(key: &str) -> CodecError {
    CodecError::NestedValue {
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_encode_map_sorts_keys() {
        let source = FormSource::map([("foo", "bar"), ("baz", "bat")]);
        assert_eq!(encode(&source).unwrap(), "baz=bat&foo=bar");
    }

    #[test]
    fn test_encode_pairs_preserves_order() {
        let source = FormSource::pairs([("foo", "bar"), ("baz", "bat")]);
        assert_eq!(encode(&source).unwrap(), "foo=bar&baz=bat");
    }

    #[test]
    fn test_encode_pairs_preserves_duplicates() {
        let source = FormSource::pairs([("foo", "bar"), ("foo", "bat")]);
        assert_eq!(encode(&source).unwrap(), "foo=bar&foo=bat");
    }

    #[test]
    fn test_encode_list_values_repeat_the_key() {
        let source = FormSource::map([("foo", vec!["bar", "bat"])]);
        assert_eq!(encode(&source).unwrap(), "foo=bar&foo=bat");
    }

    #[test]
    fn test_encode_list_of_maps_concatenates() {
        let maps = vec![
            BTreeMap::from([("k".to_string(), FormValue::from("v1"))]),
            BTreeMap::new(),
            BTreeMap::from([("k".to_string(), FormValue::from("v2"))]),
        ];
        let encoded = encode(&FormSource::Maps(maps)).unwrap();
        assert_eq!(encoded, "k=v1&k=v2");
    }

    #[test]
    fn test_encode_rejects_nested_map() {
        let source = FormSource::map([(
            "foo",
            FormValue::Map(vec![("bar".to_string(), FormValue::from("baz"))]),
        )]);
        let err = encode(&source).unwrap_err();
        assert_eq!(err, CodecError::NestedValue { key: "foo".into() });
    }

    #[test]
    fn test_encode_rejects_list_of_pairs() {
        let source = FormSource::map([(
            "foo",
            FormValue::List(vec![FormValue::List(vec!["bar".into(), "baz".into()])]),
        )]);
        let err = encode(&source).unwrap_err();
        assert_eq!(err, CodecError::NestedValue { key: "foo".into() });

        let source = FormSource::map([(
            "foo",
            FormValue::List(vec![FormValue::Map(vec![("bar".into(), "baz".into())])]),
        )]);
        assert!(matches!(
            encode(&source),
            Err(CodecError::NestedValue { ref key }) if key == "foo"
        ));
    }

    #[test]
    fn test_encode_skips_empty_collections() {
        let source = FormSource::pairs([
            ("a", FormValue::List(vec![])),
            ("b", FormValue::from("1")),
            ("c", FormValue::Map(vec![])),
        ]);
        assert_eq!(encode(&source).unwrap(), "b=1");
    }

    #[test]
    fn test_encode_escapes_keys_and_values() {
        let source = FormSource::pairs([("msg To", "A B <a@b.com>;c&d=e")]);
        assert_eq!(
            encode(&source).unwrap(),
            "msg+To=A+B+%3Ca%40b.com%3E%3Bc%26d%3De"
        );
    }

    #[test]
    fn test_encode_scalars() {
        let source = FormSource::pairs([
            ("flag", FormValue::Bool(false)),
            ("count", FormValue::Int(7)),
            ("bare", FormValue::Null),
        ]);
        assert_eq!(encode(&source).unwrap(), "flag=false&count=7&bare");
    }

    #[test]
    fn test_encode_with_custom_formatter() {
        let source = FormSource::pairs([("flag", FormValue::Bool(true)), ("n", FormValue::Int(2))]);
        let encoded = encode_with(&source, |value| match value {
            FormValue::Bool(true) => "1".to_string(),
            FormValue::Bool(false) => "0".to_string(),
            other => other.to_string(),
        })
        .unwrap();
        assert_eq!(encoded, "flag=1&n=2");
    }

    #[test]
    fn test_encode_empty_sources() {
        assert_eq!(encode(&FormSource::Map(BTreeMap::new())).unwrap(), "");
        assert_eq!(encode(&FormSource::Pairs(Vec::new())).unwrap(), "");
        assert_eq!(encode(&FormSource::Maps(Vec::new())).unwrap(), "");
    }
}
