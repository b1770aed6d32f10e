//! Rendering of wire fields with the API key masked.

use crate::types::WireFields;

use super::API_KEY_FIELD;

/// Replacement text for the API key.
pub const FILTERED: &str = "[FILTERED]";

/// Render `fields` for diagnostics, with the API key replaced by [`FILTERED`].
///
/// The output looks like `{"apikey" => "[FILTERED]", "from" => "a@b.com"}`.
pub fn redacted(fields: &WireFields) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|(key, value)| {
            if key == API_KEY_FIELD {
                format!("{:?} => {:?}", key, FILTERED)
            } else {
                format!("{:?} => {}", key, value)
            }
        })
        .collect();

    format!("{{{}}}", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireValue;

    #[test]
    fn test_redacted_masks_api_key() {
        let mut fields = WireFields::new();
        fields.insert("apikey", "very-secret-key");
        fields.insert("from", "a@b.com");
        fields.insert("isTransactional", true);
        fields.insert("attachments", WireValue::List(vec!["x.pdf".into()]));

        let rendered = redacted(&fields);
        assert!(!rendered.contains("very-secret-key"));
        assert_eq!(
            rendered,
            r#"{"apikey" => "[FILTERED]", "attachments" => ["x.pdf"], "from" => "a@b.com", "isTransactional" => true}"#
        );
    }

    #[test]
    fn test_redacted_empty() {
        assert_eq!(redacted(&WireFields::new()), "{}");
    }
}
