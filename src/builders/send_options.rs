//! Send-option builders on [`Message`].
//!
//! Every builder consumes the message and returns it with one option set.
//! The typed `with_*` methods cannot fail. [`Message::with_send_option`]
//! accepts a name and an untyped [`OptionValue`] and checks both.

use crate::builders::BuilderError;
use crate::types::{
    CharsetPart, EncodingType, Message, OptionValue, Segment, SendOption, SendOptions,
    UtmParameters,
};

impl Message {
    fn with_option(mut self, option: SendOption) -> Self {
        self.send_options
            .get_or_insert_with(SendOptions::new)
            .set(option);
        self
    }

    /// Attach previously uploaded files by name.
    pub fn with_attachments<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_option(SendOption::Attachments(
            names.into_iter().map(Into::into).collect(),
        ))
    }

    /// Set the channel. Names longer than 191 characters are truncated.
    pub fn with_channel(self, channel: impl Into<String>) -> Self {
        self.with_option(SendOption::channel(channel))
    }

    /// Set the global charset (`part = None`) or the charset of one body part.
    pub fn with_charset(self, part: Option<CharsetPart>, charset: impl Into<String>) -> Self {
        self.with_option(SendOption::charset(part, charset))
    }

    /// Set the data source.
    pub fn with_data_source(self, data_source: impl Into<String>) -> Self {
        self.with_option(SendOption::DataSource(data_source.into()))
    }

    /// Set the transfer encoding.
    pub fn with_encoding_type(self, encoding: EncodingType) -> Self {
        self.with_option(SendOption::EncodingType(encoding))
    }

    /// Send to contact lists.
    pub fn with_lists<I, S>(self, lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_option(SendOption::lists(lists))
    }

    /// Set merge fields. Keys are sent as `merge_<key>`.
    pub fn with_merge<I, K, V>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.with_option(SendOption::merge(fields))
    }

    /// Name the attachment holding CSV merge data.
    pub fn with_merge_source_filename(self, filename: impl Into<String>) -> Self {
        self.with_option(SendOption::MergeSourceFilename(filename.into()))
    }

    /// Send through a dedicated IP pool.
    pub fn with_pool_name(self, pool: impl Into<String>) -> Self {
        self.with_option(SendOption::PoolName(pool.into()))
    }

    /// Set the postback value.
    pub fn with_post_back(self, post_back: impl Into<String>) -> Self {
        self.with_option(SendOption::PostBack(post_back.into()))
    }

    /// Send to segments. [`Segment::All`] selects every contact.
    pub fn with_segments<I, S>(self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        self.with_option(SendOption::segments(segments))
    }

    /// Use a stored template.
    pub fn with_template(self, template: impl Into<String>) -> Self {
        self.with_option(SendOption::Template(template.into()))
    }

    /// Delay delivery. Clamped to between 1 minute and one year.
    pub fn with_time_off_set_minutes(self, minutes: i64) -> Self {
        self.with_option(SendOption::time_off_set_minutes(minutes))
    }

    /// Enable or disable click tracking.
    pub fn with_track_clicks(self, enabled: bool) -> Self {
        self.with_option(SendOption::TrackClicks(enabled))
    }

    /// Enable or disable open tracking.
    pub fn with_track_opens(self, enabled: bool) -> Self {
        self.with_option(SendOption::TrackOpens(enabled))
    }

    /// Set UTM parameters. Fields left `None` keep their current value.
    pub fn with_utm_parameters(self, utm: UtmParameters) -> Self {
        utm.into_options()
            .into_iter()
            .fold(self, |message, option| message.with_option(option))
    }

    /// Set an option by name from an untyped value.
    ///
    /// Accepted names are the option names (`"pool_name"`, `"track_opens"`,
    /// ...) plus `"utm_parameters"`, which takes pairs keyed by `campaign`,
    /// `content`, `medium` or `source`.
    ///
    /// # Errors
    ///
    /// - [`BuilderError::UnknownOption`] for an unrecognized name
    /// - [`BuilderError::InvalidValue`] when the value has the wrong shape
    ///
    /// # Examples
    ///
    /// ```rust
    /// use integrations_elastic_email::types::{Message, OptionValue};
    ///
    /// let message = Message::new().with_send_option("time_off_set_minutes", OptionValue::Int(0))?;
    /// assert!(Message::new().with_send_option("time_off_set_minutes", "soon".into()).is_err());
    /// assert!(Message::new().with_send_option("colour", "red".into()).is_err());
    /// # Ok::<(), integrations_elastic_email::builders::BuilderError>(())
    /// ```
    pub fn with_send_option(self, name: &str, value: OptionValue) -> Result<Self, BuilderError> {
        let options = parse_option(name, value)?;
        Ok(options
            .into_iter()
            .fold(self, |message, option| message.with_option(option)))
    }

    /// Store raw options under the deprecated alias.
    ///
    /// They are only read when no typed option has been set. Unknown names and
    /// malformed values are dropped at delivery time instead of failing.
    #[deprecated(note = "use the `with_*` send-option builders or `with_send_option`")]
    pub fn with_legacy_send_options<I, K>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: Into<String>,
    {
        self.legacy_send_options = Some(
            options
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        );
        self
    }
}

impl SendOptions {
    /// Parse raw options, silently dropping unknown names and malformed values.
    pub fn from_raw<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, OptionValue)>,
    {
        entries
            .into_iter()
            .filter_map(|(name, value)| parse_option(name, value.clone()).ok())
            .flatten()
            .collect()
    }
}

/// Names accepted by [`parse_option`].
const OPTION_NAMES: &[&str] = &[
    "attachments",
    "channel",
    "charset",
    "charset_body_amp",
    "charset_body_html",
    "charset_body_text",
    "data_source",
    "encoding_type",
    "lists",
    "merge",
    "merge_source_filename",
    "pool_name",
    "post_back",
    "segments",
    "template",
    "time_off_set_minutes",
    "track_clicks",
    "track_opens",
    "utm_campaign",
    "utm_content",
    "utm_medium",
    "utm_source",
    "utm_parameters",
];

/// Parse one named option. `utm_parameters` may yield several options.
///
/// A null value for a known option yields nothing, except for
/// `encoding_type`, where it selects the default encoding.
pub(crate) fn parse_option(name: &str, value: OptionValue) -> Result<Vec<SendOption>, BuilderError> {
    if !OPTION_NAMES.contains(&name) {
        return Err(BuilderError::unknown_option(name));
    }
    if matches!(value, OptionValue::Null) && name != "encoding_type" {
        return Ok(Vec::new());
    }

    let option = match name {
        "attachments" => SendOption::Attachments(text_list(name, value)?),
        "channel" => SendOption::channel(text(name, value)?),
        "charset" => SendOption::charset(None, text(name, value)?),
        "charset_body_amp" => SendOption::charset(Some(CharsetPart::Amp), text(name, value)?),
        "charset_body_html" => SendOption::charset(Some(CharsetPart::Html), text(name, value)?),
        "charset_body_text" => SendOption::charset(Some(CharsetPart::Text), text(name, value)?),
        "data_source" => SendOption::DataSource(text(name, value)?),
        "encoding_type" => SendOption::EncodingType(encoding_type(name, value)?),
        "lists" => SendOption::lists(text_list(name, value)?),
        "merge" => SendOption::merge(merge_fields(name, value)?),
        "merge_source_filename" => SendOption::MergeSourceFilename(text(name, value)?),
        "pool_name" => SendOption::PoolName(text(name, value)?),
        "post_back" => SendOption::PostBack(text(name, value)?),
        "segments" => SendOption::segments(segments(name, value)?),
        "template" => SendOption::Template(text(name, value)?),
        "time_off_set_minutes" => match value {
            OptionValue::Int(minutes) => SendOption::time_off_set_minutes(minutes),
            _ => return Err(BuilderError::invalid_value(name, "expected an integer")),
        },
        "track_clicks" => SendOption::TrackClicks(boolean(name, value)?),
        "track_opens" => SendOption::TrackOpens(boolean(name, value)?),
        "utm_campaign" => SendOption::UtmCampaign(text(name, value)?),
        "utm_content" => SendOption::UtmContent(text(name, value)?),
        "utm_medium" => SendOption::UtmMedium(text(name, value)?),
        "utm_source" => SendOption::UtmSource(text(name, value)?),
        "utm_parameters" => return Ok(utm_parameters(name, value)?.into_options()),
        _ => return Err(BuilderError::unknown_option(name)),
    };

    Ok(vec![option])
}

fn text(name: &str, value: OptionValue) -> Result<String, BuilderError> {
    match value {
        OptionValue::Text(text) => Ok(text),
        _ => Err(BuilderError::invalid_value(name, "expected a string")),
    }
}

fn text_list(name: &str, value: OptionValue) -> Result<Vec<String>, BuilderError> {
    match value {
        OptionValue::Text(text) => Ok(vec![text]),
        OptionValue::List(items) => items.into_iter().map(|item| text(name, item)).collect(),
        _ => Err(BuilderError::invalid_value(
            name,
            "expected a string or a list of strings",
        )),
    }
}

fn boolean(name: &str, value: OptionValue) -> Result<bool, BuilderError> {
    match value {
        OptionValue::Bool(flag) => Ok(flag),
        _ => Err(BuilderError::invalid_value(name, "expected a boolean")),
    }
}

fn encoding_type(name: &str, value: OptionValue) -> Result<EncodingType, BuilderError> {
    let encoding = match &value {
        OptionValue::Null => Some(EncodingType::default()),
        OptionValue::Text(text) => EncodingType::from_name(text),
        OptionValue::Int(code) => EncodingType::from_code(*code),
        _ => None,
    };

    encoding.ok_or_else(|| {
        BuilderError::invalid_value(
            name,
            "expected one of none, raw_7bit, raw_8bit, quoted_printable, base64, uue",
        )
    })
}

fn segments(name: &str, value: OptionValue) -> Result<Vec<Segment>, BuilderError> {
    fn one(name: &str, value: OptionValue) -> Result<Segment, BuilderError> {
        match value {
            OptionValue::All => Ok(Segment::All),
            OptionValue::Text(text) => Ok(Segment::Name(text)),
            _ => Err(BuilderError::invalid_value(
                name,
                "expected the all sentinel, a string or a list of them",
            )),
        }
    }

    match value {
        OptionValue::List(items) => items.into_iter().map(|item| one(name, item)).collect(),
        single => Ok(vec![one(name, single)?]),
    }
}

fn merge_fields(name: &str, value: OptionValue) -> Result<Vec<(String, String)>, BuilderError> {
    fn scalar(name: &str, value: OptionValue) -> Result<String, BuilderError> {
        match value {
            OptionValue::Text(text) => Ok(text),
            OptionValue::Int(n) => Ok(n.to_string()),
            OptionValue::Bool(flag) => Ok(flag.to_string()),
            _ => Err(BuilderError::invalid_value(
                name,
                "merge values must be strings, integers or booleans",
            )),
        }
    }

    match value {
        OptionValue::Pairs(pairs) => pairs
            .into_iter()
            .map(|(key, value)| scalar(name, value).map(|value| (key, value)))
            .collect(),
        OptionValue::List(groups) => {
            let mut fields = Vec::new();
            for group in groups {
                match group {
                    OptionValue::Pairs(_) => fields.extend(merge_fields(name, group)?),
                    _ => {
                        return Err(BuilderError::invalid_value(
                            name,
                            "expected key/value pairs or a list of them",
                        ))
                    }
                }
            }
            Ok(fields)
        }
        _ => Err(BuilderError::invalid_value(
            name,
            "expected key/value pairs or a list of them",
        )),
    }
}

fn utm_parameters(name: &str, value: OptionValue) -> Result<UtmParameters, BuilderError> {
    let OptionValue::Pairs(pairs) = value else {
        return Err(BuilderError::invalid_value(name, "expected key/value pairs"));
    };

    let mut utm = UtmParameters::default();
    for (key, value) in pairs {
        let slot = match key.as_str() {
            "campaign" => &mut utm.campaign,
            "content" => &mut utm.content,
            "medium" => &mut utm.medium,
            "source" => &mut utm.source,
            other => {
                return Err(BuilderError::invalid_value(
                    name,
                    format!("unknown utm key '{}'", other),
                ))
            }
        };
        *slot = Some(text(name, value)?);
    }

    Ok(utm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(message: &Message) -> &SendOptions {
        message.send_options.as_ref().unwrap()
    }

    fn pairs(entries: &[(&str, &str)]) -> OptionValue {
        OptionValue::Pairs(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), OptionValue::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_builders_do_not_touch_other_fields() {
        let message = Message {
            subject: Some("keep".into()),
            ..Message::default()
        }
        .with_pool_name("pool");

        assert_eq!(message.subject.as_deref(), Some("keep"));
        assert_eq!(
            options(&message).get("pool_name"),
            Some(&SendOption::PoolName("pool".into()))
        );
    }

    #[test]
    fn test_builders_accumulate() {
        let message = Message::new()
            .with_attachments(["a.pdf"])
            .with_channel("web")
            .with_data_source("crm")
            .with_encoding_type(EncodingType::Raw8Bit)
            .with_lists(["l1", "l2"])
            .with_merge([("name", "Jane")])
            .with_merge_source_filename("data.csv")
            .with_post_back("pb")
            .with_template("tpl")
            .with_time_off_set_minutes(0)
            .with_track_clicks(true)
            .with_track_opens(false)
            .with_charset(Some(CharsetPart::Text), "ascii");

        let options = options(&message);
        assert_eq!(options.len(), 13);
        assert_eq!(options.get("lists"), Some(&SendOption::Lists("l1;l2".into())));
        assert_eq!(
            options.get("time_off_set_minutes"),
            Some(&SendOption::TimeOffSetMinutes(1))
        );
        assert_eq!(
            options.get("charset_body_text"),
            Some(&SendOption::CharsetBodyText("ascii".into()))
        );
    }

    #[test]
    fn test_utm_parameters_merge() {
        let message = Message::new()
            .with_utm_parameters(UtmParameters {
                campaign: Some("spring".into()),
                source: Some("mail".into()),
                ..Default::default()
            })
            .with_utm_parameters(UtmParameters {
                source: Some("web".into()),
                medium: Some("banner".into()),
                ..Default::default()
            });

        let options = options(&message);
        assert_eq!(options.get("utm_campaign"), Some(&SendOption::UtmCampaign("spring".into())));
        assert_eq!(options.get("utm_source"), Some(&SendOption::UtmSource("web".into())));
        assert_eq!(options.get("utm_medium"), Some(&SendOption::UtmMedium("banner".into())));
        assert_eq!(options.get("utm_content"), None);
    }

    #[test]
    fn test_with_send_option_unknown_name() {
        let err = Message::new()
            .with_send_option("colour", "red".into())
            .unwrap_err();
        assert_eq!(err, BuilderError::unknown_option("colour"));
    }

    #[test]
    fn test_with_send_option_time_offset_requires_integer() {
        let err = Message::new()
            .with_send_option("time_off_set_minutes", "20".into())
            .unwrap_err();
        assert!(matches!(
            err,
            BuilderError::InvalidValue { ref field, .. } if field == "time_off_set_minutes"
        ));

        let message = Message::new()
            .with_send_option("time_off_set_minutes", OptionValue::Int(524_161))
            .unwrap();
        assert_eq!(
            options(&message).get("time_off_set_minutes"),
            Some(&SendOption::TimeOffSetMinutes(524_160))
        );
    }

    #[test]
    fn test_with_send_option_segments() {
        let value = OptionValue::List(vec![
            "vip".into(),
            OptionValue::All,
            "vip".into(),
        ]);
        let message = Message::new().with_send_option("segments", value).unwrap();
        assert_eq!(
            options(&message).get("segments"),
            Some(&SendOption::Segments("vip;0".into()))
        );

        let message = Message::new()
            .with_send_option("segments", OptionValue::All)
            .unwrap();
        assert_eq!(
            options(&message).get("segments"),
            Some(&SendOption::Segments("0".into()))
        );
    }

    #[test]
    fn test_with_send_option_merge_list_of_maps() {
        let value = OptionValue::List(vec![pairs(&[("a", "1")]), pairs(&[("b", "2")])]);
        let message = Message::new().with_send_option("merge", value).unwrap();
        assert_eq!(
            options(&message).get("merge"),
            Some(&SendOption::Merge(vec![
                ("merge_a".into(), "1".into()),
                ("merge_b".into(), "2".into()),
            ]))
        );

        let err = Message::new()
            .with_send_option("merge", "flat".into())
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidValue { .. }));
    }

    #[test]
    fn test_with_send_option_encoding_type() {
        let message = Message::new()
            .with_send_option("encoding_type", "quoted_printable".into())
            .unwrap();
        assert_eq!(
            options(&message).get("encoding_type"),
            Some(&SendOption::EncodingType(EncodingType::QuotedPrintable))
        );

        let message = Message::new()
            .with_send_option("encoding_type", OptionValue::Null)
            .unwrap();
        assert_eq!(
            options(&message).get("encoding_type"),
            Some(&SendOption::EncodingType(EncodingType::Base64))
        );

        assert!(Message::new()
            .with_send_option("encoding_type", "zip".into())
            .is_err());
    }

    #[test]
    fn test_with_send_option_null_leaves_message_unchanged() {
        for name in ["pool_name", "template", "attachments", "segments", "track_opens", "lists"] {
            let message = Message::new().with_send_option(name, OptionValue::Null).unwrap();
            assert_eq!(message, Message::new(), "{} should be a no-op", name);
        }

        let message = Message::new()
            .with_pool_name("kept")
            .with_send_option("pool_name", OptionValue::Null)
            .unwrap();
        assert_eq!(
            options(&message).get("pool_name"),
            Some(&SendOption::PoolName("kept".into()))
        );

        let fields = crate::pipeline::to_wire_fields(
            &Message::new().with_send_option("pool_name", OptionValue::Null).unwrap(),
            &secrecy::SecretString::new("key".to_string()),
            &crate::config::PipelinePolicy::default(),
        );
        assert!(!fields.contains_key("poolName"));

        let err = Message::new()
            .with_send_option("colour", OptionValue::Null)
            .unwrap_err();
        assert_eq!(err, BuilderError::unknown_option("colour"));
    }

    #[test]
    fn test_with_send_option_utm_parameters() {
        let message = Message::new()
            .with_send_option("utm_parameters", pairs(&[("campaign", "c"), ("medium", "m")]))
            .unwrap();
        assert_eq!(options(&message).len(), 2);

        let err = Message::new()
            .with_send_option("utm_parameters", pairs(&[("term", "t")]))
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidValue { .. }));
    }

    #[test]
    fn test_with_send_option_attachments_accepts_single_string() {
        let message = Message::new()
            .with_send_option("attachments", "one.pdf".into())
            .unwrap();
        assert_eq!(
            options(&message).get("attachments"),
            Some(&SendOption::Attachments(vec!["one.pdf".into()]))
        );
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_options_are_stored_raw() {
        let message = Message::new().with_legacy_send_options([
            ("template", OptionValue::from("tpl")),
            ("bogus", OptionValue::from(true)),
        ]);

        assert!(message.send_options.is_none());
        assert_eq!(message.legacy_send_options.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_from_raw_drops_unknown_and_malformed() {
        let raw = vec![
            ("template".to_string(), OptionValue::from("tpl")),
            ("bogus".to_string(), OptionValue::from("x")),
            ("track_opens".to_string(), OptionValue::from("yes")),
            ("time_off_set_minutes".to_string(), OptionValue::Null),
            ("pool_name".to_string(), OptionValue::from("pool")),
        ];

        let options = SendOptions::from_raw(&raw);
        assert_eq!(options.len(), 2);
        assert!(options.get("template").is_some());
        assert!(options.get("pool_name").is_some());
    }
}
