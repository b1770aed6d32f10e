//! Elastic Email Integration Module
//!
//! Sends transactional email through the Elastic Email v2 HTTP API.
//!
//! # Features
//!
//! - **Message pipeline**: turns a structured [`Message`] into the flat field
//!   mapping the API expects (address formatting, headers, reply-to, fixed
//!   charset and transactional flag)
//! - **Send options**: typed builders for attachments, lists, segments, merge
//!   fields, tracking flags, UTM parameters and more
//! - **Repeated-key form codec**: encodes list values as `key=a&key=b` and
//!   decodes every key to a list of values
//! - **Redaction**: the API key never appears in error messages or logs
//! - **Pluggable transport**: reqwest by default, a mock for tests
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_elastic_email::{deliver, ElasticEmailConfig, MessageBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ElasticEmailConfig::from_env()?;
//!
//!     let message = MessageBuilder::new()
//!         .from(("Shop", "shop@example.com"))
//!         .to("customer@example.com")
//!         .subject("Your order")
//!         .html("<p>Thanks for your order!</p>")
//!         .build()?
//!         .with_template("order-confirmation")
//!         .with_merge([("order_id", "1234")]);
//!
//!     let response = deliver(&message, config).await?;
//!     println!("status: {}", response.status_code);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod builders;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod types;

pub use builders::{BuilderError, MessageBuilder};
pub use client::{DeliveryResponse, ElasticEmailClient};
pub use codec::{decode, encode, CodecError, FormSource, FormValue};
pub use config::{validate_config, ApiKey, ConfigError, ElasticEmailConfig, PipelinePolicy};
pub use error::{ElasticEmailError, ElasticEmailResult};
pub use types::{
    Address, CharsetPart, EncodingType, Message, OptionValue, Segment, SendOption, SendOptions,
    SendResult, UtmParameters,
};

/// Deliver `message` with a one-off client built from `config`.
///
/// # Errors
///
/// See [`ElasticEmailClient::new`] and [`ElasticEmailClient::deliver`].
pub async fn deliver(
    message: &Message,
    config: ElasticEmailConfig,
) -> ElasticEmailResult<DeliveryResponse> {
    ElasticEmailClient::new(config)?.deliver(message).await
}
