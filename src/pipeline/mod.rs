//! Message-to-wire transformation.
//!
//! [`to_wire_fields`] turns a [`Message`] and an API key into the flat field
//! mapping the send endpoint expects. It runs a fixed list of steps in order;
//! a later step may overwrite what an earlier one set (an explicit `charset`
//! send option replaces the global default, for instance). The last step drops
//! every empty value.
//!
//! The transformation never fails. Send options that cannot be used are left
//! out of the mapping.

mod redact;

pub use redact::{redacted, FILTERED};

use secrecy::{ExposeSecret, SecretString};

use crate::config::PipelinePolicy;
use crate::types::{Address, Message, SendOptions, WireFields, WireValue};

/// Wire key of the API key.
pub const API_KEY_FIELD: &str = "apikey";

/// Prefix of custom header fields.
pub const HEADER_PREFIX: &str = "headers_";

struct Input<'a> {
    message: &'a Message,
    api_key: &'a SecretString,
    policy: &'a PipelinePolicy,
}

type Step = fn(&Input<'_>, &mut WireFields);

const STEPS: &[Step] = &[
    put_from,
    put_recipients,
    put_bodies,
    put_charset,
    put_headers,
    put_api_key,
    put_send_options,
    put_transactional,
    put_subject,
    drop_empty,
];

/// Build the wire fields for `message`.
///
/// # Examples
///
/// ```rust
/// use integrations_elastic_email::builders::MessageBuilder;
/// use integrations_elastic_email::config::PipelinePolicy;
/// use integrations_elastic_email::pipeline::to_wire_fields;
/// use secrecy::SecretString;
///
/// let message = MessageBuilder::new()
///     .from(("From", "from@foo.com"))
///     .to(("To", "to@bar.com"))
///     .subject("My Subject")
///     .build()?;
///
/// let key = SecretString::new("my-key".to_string());
/// let fields = to_wire_fields(&message, &key, &PipelinePolicy::default());
///
/// assert_eq!(fields.text("fromName"), Some("From"));
/// assert_eq!(fields.text("msgTo"), Some("To <to@bar.com>"));
/// assert_eq!(fields.text("charset"), Some("utf-8"));
/// # Ok::<(), integrations_elastic_email::builders::BuilderError>(())
/// ```
pub fn to_wire_fields(
    message: &Message,
    api_key: &SecretString,
    policy: &PipelinePolicy,
) -> WireFields {
    let input = Input {
        message,
        api_key,
        policy,
    };

    let mut fields = WireFields::new();
    for step in STEPS {
        step(&input, &mut fields);
    }
    fields
}

fn put_address(fields: &mut WireFields, email_key: &str, name_key: &str, address: &Address) {
    fields.insert(email_key, address.email.as_str());
    if let Some(name) = address.display_name() {
        fields.insert(name_key, name);
    }
}

fn join_addresses(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(Address::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

fn put_from(input: &Input<'_>, fields: &mut WireFields) {
    if let Some(from) = &input.message.from {
        put_address(fields, "from", "fromName", from);
    }
}

fn put_recipients(input: &Input<'_>, fields: &mut WireFields) {
    let message = input.message;
    fields.insert("msgTo", join_addresses(&message.to));
    fields.insert("msgCc", join_addresses(&message.cc));
    fields.insert("msgBcc", join_addresses(&message.bcc));
}

fn put_bodies(input: &Input<'_>, fields: &mut WireFields) {
    if let Some(html) = &input.message.html_body {
        fields.insert("bodyHtml", html.as_str());
    }
    if let Some(text) = &input.message.text_body {
        fields.insert("bodyText", text.as_str());
    }
}

fn put_charset(input: &Input<'_>, fields: &mut WireFields) {
    fields.insert("charset", input.policy.charset.as_str());
}

fn put_headers(input: &Input<'_>, fields: &mut WireFields) {
    for (key, value) in &input.message.headers {
        if key.eq_ignore_ascii_case("reply-to") {
            put_address(fields, "replyTo", "replyToName", &Address::parse(value));
        } else {
            fields.insert(
                format!("{}{}", HEADER_PREFIX, key),
                format!("{}: {}", key, value),
            );
        }
    }
}

fn put_api_key(input: &Input<'_>, fields: &mut WireFields) {
    fields.insert(API_KEY_FIELD, input.api_key.expose_secret().as_str());
}

fn put_send_options(input: &Input<'_>, fields: &mut WireFields) {
    let message = input.message;
    let legacy;
    let options = match (&message.send_options, &message.legacy_send_options) {
        (Some(options), _) => options,
        (None, Some(raw)) => {
            legacy = SendOptions::from_raw(raw);
            &legacy
        }
        (None, None) => return,
    };

    for option in options.iter() {
        for (key, value) in option.wire_entries() {
            fields.insert(key, value);
        }
    }
}

fn put_transactional(input: &Input<'_>, fields: &mut WireFields) {
    fields.insert("isTransactional", WireValue::Bool(input.policy.transactional));
}

fn put_subject(input: &Input<'_>, fields: &mut WireFields) {
    if let Some(subject) = &input.message.subject {
        fields.insert("subject", subject.as_str());
    }
}

fn drop_empty(_: &Input<'_>, fields: &mut WireFields) {
    fields.retain_non_empty();
}
