//! Elastic Email client.
//!
//! [`ElasticEmailClient`] ties the pieces together: it turns a message into
//! wire fields, form-encodes them and POSTs the result to the send endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_elastic_email::{ElasticEmailClient, ElasticEmailConfig, MessageBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ElasticEmailConfig::builder()
//!     .api_key("my-api-key")
//!     .build()?;
//! let client = ElasticEmailClient::new(config)?;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .text("Email body")
//!     .build()?
//!     .with_track_opens(true);
//!
//! let response = client.deliver(&message).await?;
//! let result = response.send_result()?;
//! println!("accepted: {}", result.success);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::codec::encode;
use crate::config::{validate_config, ElasticEmailConfig};
use crate::error::{ElasticEmailError, ElasticEmailResult};
use crate::http::{HttpRequest, ReqwestTransport, Transport};
use crate::pipeline::{redacted, to_wire_fields};
use crate::types::{Message, SendResult};

const FAILURE_PREAMBLE: &str =
    "There was a problem sending the email through the Elastic Email API.";

/// Outcome of a delivery the API accepted with a status of 299 or below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Raw response body.
    pub body: String,
}

impl DeliveryResponse {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ElasticEmailResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse the body as the send endpoint's result envelope.
    pub fn send_result(&self) -> ElasticEmailResult<SendResult> {
        self.json()
    }
}

/// Client for the Elastic Email send endpoint.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ElasticEmailClient {
    config: Arc<ElasticEmailConfig>,
    api_key: SecretString,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ElasticEmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticEmailClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ElasticEmailClient {
    /// Create a client with the reqwest transport.
    ///
    /// # Errors
    ///
    /// - [`ElasticEmailError::Configuration`] when no usable API key is configured
    /// - [`ElasticEmailError::Transport`] if the HTTP client cannot be built
    pub fn new(config: ElasticEmailConfig) -> ElasticEmailResult<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`ElasticEmailError::Configuration`] when no usable API key is configured.
    pub fn with_transport(
        config: ElasticEmailConfig,
        transport: Arc<dyn Transport>,
    ) -> ElasticEmailResult<Self> {
        let config = validate_config(config)?;
        let api_key = config.resolved_api_key()?;

        Ok(Self {
            config: Arc::new(config),
            api_key,
            transport,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ElasticEmailConfig {
        &self.config
    }

    /// Attachments are sent by name, so the client supports them.
    pub fn supports_attachments() -> bool {
        true
    }

    /// Deliver a message.
    ///
    /// # Errors
    ///
    /// - [`ElasticEmailError::Codec`] if the wire fields cannot be encoded
    /// - [`ElasticEmailError::Api`] when the transport fails or the API answers
    ///   with a status above 299. The message embeds the response body (or the
    ///   transport error) and the sent parameters with the API key masked.
    pub async fn deliver(&self, message: &Message) -> ElasticEmailResult<DeliveryResponse> {
        let fields = to_wire_fields(message, &self.api_key, &self.config.pipeline);
        let body = encode(&fields.clone().into_form_source())?;
        let url = self.config.send_url();

        debug!(
            recipients = message.recipient_count(),
            url = %url,
            "Sending email through Elastic Email"
        );

        let response = match self.transport.send(HttpRequest::form_post(url, body)).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Elastic Email request failed");
                return Err(ElasticEmailError::Api {
                    status: None,
                    message: format!(
                        "{}\n\nError:\n{}\n\nParameters:\n{}",
                        FAILURE_PREAMBLE,
                        err,
                        redacted(&fields)
                    ),
                });
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "Elastic Email rejected the email");
            return Err(ElasticEmailError::Api {
                status: Some(response.status),
                message: format!(
                    "{}\n\nResponse:\n{}\n\nParameters:\n{}",
                    FAILURE_PREAMBLE,
                    response.body,
                    redacted(&fields)
                ),
            });
        }

        info!(status = response.status, "Elastic Email accepted the email");

        Ok(DeliveryResponse {
            status_code: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}
