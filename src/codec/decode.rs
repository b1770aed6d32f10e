//! Form decoding into key → list-of-values.

use std::borrow::Cow;
use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use super::CodecError;

/// Decoded query string.
///
/// Every key maps to the list of its values in order of appearance. A
/// segment without `=` contributes `None`.
pub type DecodedQuery = BTreeMap<String, Vec<Option<String>>>;

/// Decode a repeated-key query string.
///
/// # Errors
///
/// Returns [`CodecError::BadEncoding`] when a key or value contains a `%`
/// that is not followed by two hex digits, or decodes to invalid UTF-8.
///
/// # Examples
///
/// ```rust
/// use integrations_elastic_email::codec::decode;
///
/// let query = decode("foo=bar&foo=baz&flag")?;
/// assert_eq!(query["foo"], vec![Some("bar".to_string()), Some("baz".to_string())]);
/// assert_eq!(query["flag"], vec![None]);
/// assert!(decode("")?.is_empty());
/// # Ok::<(), integrations_elastic_email::codec::CodecError>(())
/// ```
pub fn decode(query: &str) -> Result<DecodedQuery, CodecError> {
    decode_into(query, DecodedQuery::new())
}

/// Decode a query string on top of an existing mapping.
///
/// An empty `query` returns `initial` untouched. Otherwise the values decoded
/// for a key are placed ahead of any values `initial` already held for it.
pub fn decode_into(query: &str, initial: DecodedQuery) -> Result<DecodedQuery, CodecError> {
    if query.is_empty() {
        return Ok(initial);
    }

    let mut observations = Vec::new();
    for segment in query.split('&').filter(|segment| !segment.is_empty()) {
        let (raw_key, raw_value) = match segment.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (segment, None),
        };
        let key = unescape(raw_key)?;
        let value = raw_value.map(unescape).transpose()?;
        observations.push((key, value));
    }

    let mut grouped = DecodedQuery::new();
    for (key, value) in observations {
        grouped.entry(key).or_default().push(value);
    }

    let mut result = initial;
    for (key, mut values) in grouped {
        let existing = result.entry(key).or_default();
        values.append(existing);
        *existing = values;
    }

    Ok(result)
}

fn unescape(raw: &str) -> Result<String, CodecError> {
    let bytes = raw.as_bytes();
    let malformed = raw.match_indices('%').any(|(idx, _)| {
        bytes
            .get(idx + 1..idx + 3)
            .map_or(true, |hex| !hex.iter().all(u8::is_ascii_hexdigit))
    });
    if malformed {
        return Err(bad_encoding(raw));
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| bad_encoding(raw))
}

fn bad_encoding(raw: &str) -> CodecError {
    CodecError::BadEncoding {
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_decode_empty_string() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_single_value_is_a_list() {
        let query = decode("foo=bar").unwrap();
        assert_eq!(query["foo"], some(&["bar"]));
    }

    #[test]
    fn test_decode_repeated_keys_keep_order() {
        let query = decode("foo=bar&other=1&foo=baz&foo=bat").unwrap();
        assert_eq!(query["foo"], some(&["bar", "baz", "bat"]));
        assert_eq!(query["other"], some(&["1"]));
    }

    #[test]
    fn test_decode_valueless_key() {
        let query = decode("flag&foo=").unwrap();
        assert_eq!(query["flag"], vec![None]);
        assert_eq!(query["foo"], some(&[""]));
    }

    #[test]
    fn test_decode_splits_on_first_equals() {
        let query = decode("expr=a=b").unwrap();
        assert_eq!(query["expr"], some(&["a=b"]));
    }

    #[test]
    fn test_decode_unescapes_form_encoding() {
        let query = decode("msg+To=A+B+%3Ca%40b.com%3E&plus=1%2B1").unwrap();
        assert_eq!(query["msg To"], some(&["A B <a@b.com>"]));
        assert_eq!(query["plus"], some(&["1+1"]));
    }

    #[test]
    fn test_decode_ignores_empty_segments() {
        let query = decode("&a=1&&b=2&").unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(query["a"], some(&["1"]));
        assert_eq!(query["b"], some(&["2"]));
    }

    #[test]
    fn test_decode_bad_percent_escape() {
        let err = decode("foo=%zz").unwrap_err();
        assert_eq!(err, CodecError::BadEncoding { raw: "%zz".into() });

        let err = decode("foo=100%").unwrap_err();
        assert_eq!(err, CodecError::BadEncoding { raw: "100%".into() });

        let err = decode("%4=bar").unwrap_err();
        assert_eq!(err, CodecError::BadEncoding { raw: "%4".into() });
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode("foo=%FF").unwrap_err();
        assert_eq!(err, CodecError::BadEncoding { raw: "%FF".into() });
    }

    #[test]
    fn test_decode_into_empty_returns_initial() {
        let mut initial = DecodedQuery::new();
        initial.insert("seed".into(), some(&["x"]));

        let result = decode_into("", initial.clone()).unwrap();
        assert_eq!(result, initial);
    }

    #[test]
    fn test_decode_into_places_decoded_values_first() {
        let mut initial = DecodedQuery::new();
        initial.insert("foo".into(), some(&["seed"]));

        let result = decode_into("foo=a&foo=b&bar=c", initial).unwrap();
        assert_eq!(result["foo"], some(&["a", "b", "seed"]));
        assert_eq!(result["bar"], some(&["c"]));
    }
}
