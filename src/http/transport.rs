//! Transport trait and the reqwest-backed implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ElasticEmailConfig;
use crate::error::{ElasticEmailError, ElasticEmailResult};

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// POST.
    Post,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
        }
    }
}

/// An outgoing request.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<String>,
}

impl HttpRequest {
    /// A POST with a form-encoded body.
    pub fn form_post(url: impl Into<String>, body: String) -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            super::FORM_CONTENT_TYPE.to_string(),
        );

        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers,
            body: Some(body),
        }
    }
}

/// A received response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Returns true for statuses up to 299.
    pub fn is_success(&self) -> bool {
        self.status <= 299
    }
}

/// Trait for HTTP transport implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    async fn send(&self, request: HttpRequest) -> ElasticEmailResult<HttpResponse>;
}

/// Reqwest-based HTTP transport.
///
/// No retries. Redirects follow reqwest's default policy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> ElasticEmailResult<Self> {
        Self::build(timeout, connect_timeout, None)
    }

    /// Create a transport from client configuration.
    pub fn from_config(config: &ElasticEmailConfig) -> ElasticEmailResult<Self> {
        Self::build(
            config.timeout,
            config.connect_timeout,
            config.user_agent.as_deref(),
        )
    }

    fn build(
        timeout: Duration,
        connect_timeout: Duration,
        user_agent: Option<&str>,
    ) -> ElasticEmailResult<Self> {
        let user_agent = user_agent.map(str::to_string).unwrap_or_else(|| {
            format!("integrations-elastic-email/{}", env!("CARGO_PKG_VERSION"))
        });

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ElasticEmailError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                retryable: false,
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ElasticEmailResult<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (key.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
