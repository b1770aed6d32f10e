//! Provider-specific send options.
//!
//! Each [`SendOption`] variant carries an already-normalized payload: the
//! constructors on `SendOption` apply the truncation, clamping, joining and
//! prefixing rules, so the pipeline only has to map variants to wire keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::WireValue;

/// Longest channel name the API accepts.
pub const MAX_CHANNEL_LEN: usize = 191;

/// Smallest accepted delivery delay, in minutes.
pub const MIN_TIME_OFF_SET_MINUTES: i64 = 1;

/// Largest accepted delivery delay, in minutes (one year).
pub const MAX_TIME_OFF_SET_MINUTES: i64 = 524_160;

/// Prefix applied to merge field names on the wire.
pub const MERGE_PREFIX: &str = "merge_";

/// Content-transfer encoding requested for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingType {
    /// No encoding.
    None,
    /// 7-bit raw.
    #[serde(rename = "raw_7bit")]
    Raw7Bit,
    /// 8-bit raw.
    #[serde(rename = "raw_8bit")]
    Raw8Bit,
    /// Quoted-printable.
    QuotedPrintable,
    /// Base64.
    #[default]
    Base64,
    /// Uuencode.
    Uue,
}

impl EncodingType {
    /// Numeric code sent on the wire.
    pub fn code(self) -> i64 {
        match self {
            EncodingType::None => 0,
            EncodingType::Raw7Bit => 1,
            EncodingType::Raw8Bit => 2,
            EncodingType::QuotedPrintable => 3,
            EncodingType::Base64 => 4,
            EncodingType::Uue => 5,
        }
    }

    /// Look up an encoding by its option name (`"raw_7bit"`, `"base64"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(EncodingType::None),
            "raw_7bit" => Some(EncodingType::Raw7Bit),
            "raw_8bit" => Some(EncodingType::Raw8Bit),
            "quoted_printable" => Some(EncodingType::QuotedPrintable),
            "base64" => Some(EncodingType::Base64),
            "uue" => Some(EncodingType::Uue),
            _ => None,
        }
    }

    /// Look up an encoding by its numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(EncodingType::None),
            1 => Some(EncodingType::Raw7Bit),
            2 => Some(EncodingType::Raw8Bit),
            3 => Some(EncodingType::QuotedPrintable),
            4 => Some(EncodingType::Base64),
            5 => Some(EncodingType::Uue),
            _ => None,
        }
    }
}

/// Body part a charset applies to. `None` at the call site means the global charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharsetPart {
    /// AMP body.
    Amp,
    /// HTML body.
    Html,
    /// Text body.
    Text,
}

/// One entry of a segment selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Every contact. Sent as `"0"`.
    All,
    /// A named segment.
    Name(String),
}

impl Segment {
    fn wire_name(&self) -> &str {
        match self {
            Segment::All => "0",
            Segment::Name(name) => name,
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Name(name.to_string())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Name(name)
    }
}

/// UTM tracking parameters. Unset fields leave existing values alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParameters {
    /// `utm_campaign`.
    pub campaign: Option<String>,
    /// `utm_content`.
    pub content: Option<String>,
    /// `utm_medium`.
    pub medium: Option<String>,
    /// `utm_source`.
    pub source: Option<String>,
}

impl UtmParameters {
    pub(crate) fn into_options(self) -> Vec<SendOption> {
        [
            self.campaign.map(SendOption::UtmCampaign),
            self.content.map(SendOption::UtmContent),
            self.medium.map(SendOption::UtmMedium),
            self.source.map(SendOption::UtmSource),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A single normalized send option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOption {
    /// Names of previously uploaded attachments.
    Attachments(Vec<String>),
    /// Channel name, at most [`MAX_CHANNEL_LEN`] characters.
    Channel(String),
    /// Global charset.
    Charset(String),
    /// Charset of the AMP body.
    CharsetBodyAmp(String),
    /// Charset of the HTML body.
    CharsetBodyHtml(String),
    /// Charset of the text body.
    CharsetBodyText(String),
    /// Data source name.
    DataSource(String),
    /// Transfer encoding.
    EncodingType(EncodingType),
    /// Contact lists, `;`-separated.
    Lists(String),
    /// Merge fields, keys already carrying [`MERGE_PREFIX`].
    Merge(Vec<(String, String)>),
    /// Attachment holding CSV merge data.
    MergeSourceFilename(String),
    /// Dedicated IP pool.
    PoolName(String),
    /// Postback value returned in notifications.
    PostBack(String),
    /// Segments, `;`-separated, `"0"` meaning all.
    Segments(String),
    /// Template name.
    Template(String),
    /// Delivery delay in minutes, within the accepted range.
    TimeOffSetMinutes(i64),
    /// Click tracking.
    TrackClicks(bool),
    /// Open tracking.
    TrackOpens(bool),
    /// `utm_campaign` tracking parameter.
    UtmCampaign(String),
    /// `utm_content` tracking parameter.
    UtmContent(String),
    /// `utm_medium` tracking parameter.
    UtmMedium(String),
    /// `utm_source` tracking parameter.
    UtmSource(String),
}

impl SendOption {
    /// Truncates to [`MAX_CHANNEL_LEN`] characters.
    pub fn channel(name: impl Into<String>) -> Self {
        let name: String = name.into();
        SendOption::Channel(name.chars().take(MAX_CHANNEL_LEN).collect())
    }

    /// Global charset, or the charset of one body part.
    pub fn charset(part: Option<CharsetPart>, charset: impl Into<String>) -> Self {
        let charset = charset.into();
        match part {
            None => SendOption::Charset(charset),
            Some(CharsetPart::Amp) => SendOption::CharsetBodyAmp(charset),
            Some(CharsetPart::Html) => SendOption::CharsetBodyHtml(charset),
            Some(CharsetPart::Text) => SendOption::CharsetBodyText(charset),
        }
    }

    /// Joins list names with `;`.
    pub fn lists<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        SendOption::Lists(names.join(";"))
    }

    /// Prefixes every key with [`MERGE_PREFIX`].
    pub fn merge<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        SendOption::Merge(
            fields
                .into_iter()
                .map(|(k, v)| (format!("{}{}", MERGE_PREFIX, k.as_ref()), v.into()))
                .collect(),
        )
    }

    /// Maps [`Segment::All`] to `"0"`, drops repeats (first occurrence wins)
    /// and joins with `;`.
    pub fn segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        let mut seen: Vec<String> = Vec::new();
        for segment in segments {
            let name = segment.into().wire_name().to_string();
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        SendOption::Segments(seen.join(";"))
    }

    /// Clamps into `[MIN_TIME_OFF_SET_MINUTES, MAX_TIME_OFF_SET_MINUTES]`.
    pub fn time_off_set_minutes(minutes: i64) -> Self {
        SendOption::TimeOffSetMinutes(
            minutes.clamp(MIN_TIME_OFF_SET_MINUTES, MAX_TIME_OFF_SET_MINUTES),
        )
    }

    /// Option name, as accepted by the dynamic builder.
    pub fn name(&self) -> &'static str {
        match self {
            SendOption::Attachments(_) => "attachments",
            SendOption::Channel(_) => "channel",
            SendOption::Charset(_) => "charset",
            SendOption::CharsetBodyAmp(_) => "charset_body_amp",
            SendOption::CharsetBodyHtml(_) => "charset_body_html",
            SendOption::CharsetBodyText(_) => "charset_body_text",
            SendOption::DataSource(_) => "data_source",
            SendOption::EncodingType(_) => "encoding_type",
            SendOption::Lists(_) => "lists",
            SendOption::Merge(_) => "merge",
            SendOption::MergeSourceFilename(_) => "merge_source_filename",
            SendOption::PoolName(_) => "pool_name",
            SendOption::PostBack(_) => "post_back",
            SendOption::Segments(_) => "segments",
            SendOption::Template(_) => "template",
            SendOption::TimeOffSetMinutes(_) => "time_off_set_minutes",
            SendOption::TrackClicks(_) => "track_clicks",
            SendOption::TrackOpens(_) => "track_opens",
            SendOption::UtmCampaign(_) => "utm_campaign",
            SendOption::UtmContent(_) => "utm_content",
            SendOption::UtmMedium(_) => "utm_medium",
            SendOption::UtmSource(_) => "utm_source",
        }
    }

    /// Wire entries for this option. `Merge` yields one entry per field.
    pub fn wire_entries(&self) -> Vec<(String, WireValue)> {
        let single = |key: &str, value: WireValue| vec![(key.to_string(), value)];
        let text = |key: &str, value: &str| single(key, WireValue::Text(value.to_string()));

        match self {
            SendOption::Attachments(names) => single("attachments", WireValue::List(names.clone())),
            SendOption::Channel(v) => text("channel", v),
            SendOption::Charset(v) => text("charset", v),
            SendOption::CharsetBodyAmp(v) => text("charsetBodyAmp", v),
            SendOption::CharsetBodyHtml(v) => text("charsetBodyHtml", v),
            SendOption::CharsetBodyText(v) => text("charsetBodyText", v),
            SendOption::DataSource(v) => text("dataSource", v),
            SendOption::EncodingType(encoding) => {
                single("encodingType", WireValue::Int(encoding.code()))
            }
            SendOption::Lists(v) => text("lists", v),
            SendOption::Merge(fields) => fields
                .iter()
                .map(|(k, v)| (k.clone(), WireValue::Text(v.clone())))
                .collect(),
            SendOption::MergeSourceFilename(v) => text("mergeSourceFilename", v),
            SendOption::PoolName(v) => text("poolName", v),
            SendOption::PostBack(v) => text("postBack", v),
            SendOption::Segments(v) => text("segments", v),
            SendOption::Template(v) => text("template", v),
            SendOption::TimeOffSetMinutes(minutes) => {
                single("timeOffSetMinutes", WireValue::Int(*minutes))
            }
            SendOption::TrackClicks(flag) => single("trackClicks", WireValue::Bool(*flag)),
            SendOption::TrackOpens(flag) => single("trackOpens", WireValue::Bool(*flag)),
            SendOption::UtmCampaign(v) => text("utmCampaign", v),
            SendOption::UtmContent(v) => text("utmContent", v),
            SendOption::UtmMedium(v) => text("utmMedium", v),
            SendOption::UtmSource(v) => text("utmSource", v),
        }
    }
}

/// The set of options attached to a message, at most one per option name.
///
/// Setting an option replaces any earlier value for the same name and leaves
/// the others untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    options: BTreeMap<&'static str, SendOption>,
}

impl SendOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an option.
    pub fn set(&mut self, option: SendOption) {
        self.options.insert(option.name(), option);
    }

    /// Look up an option by name.
    pub fn get(&self, name: &str) -> Option<&SendOption> {
        self.options.get(name)
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true when no option is set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterate over the options in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SendOption> {
        self.options.values()
    }
}

impl FromIterator<SendOption> for SendOptions {
    fn from_iter<T: IntoIterator<Item = SendOption>>(iter: T) -> Self {
        let mut options = SendOptions::new();
        for option in iter {
            options.set(option);
        }
        options
    }
}

/// Untyped option value, for options supplied at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// No value.
    Null,
    /// The "every segment" sentinel.
    All,
    /// Text.
    Text(String),
    /// Integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// List of values.
    List(Vec<OptionValue>),
    /// Ordered key/value mapping.
    Pairs(Vec<(String, OptionValue)>),
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        OptionValue::List(values.into_iter().map(Into::into).collect())
    }
}
