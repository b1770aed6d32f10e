//! Configuration module for the Elastic Email client.
//!
//! This module provides configuration types and builders for:
//!
//! - The API key, given literally or as an environment-variable reference
//! - The base URL (overridable for tests)
//! - Request and connect timeouts, user agent
//! - The fixed wire policy ([`PipelinePolicy`]): global charset and the
//!   transactional flag

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;

pub use error::ConfigError;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.elasticemail.com";

/// Path of the send operation, relative to the base URL.
pub const SEND_PATH: &str = "/v2/email/send";

/// Environment variable read by [`ElasticEmailConfig::from_env`] for the API key.
pub const ENV_API_KEY: &str = "ELASTIC_EMAIL_API_KEY";

/// Environment variable read by [`ElasticEmailConfig::from_env`] for the base URL.
pub const ENV_BASE_URL: &str = "ELASTIC_EMAIL_BASE_URL";

/// Source of the API key.
#[derive(Clone)]
pub enum ApiKey {
    /// The key itself.
    Literal(SecretString),
    /// Name of an environment variable holding the key.
    Env(String),
}

impl ApiKey {
    /// Wrap a literal key.
    pub fn new(key: impl Into<String>) -> Self {
        ApiKey::Literal(SecretString::new(key.into()))
    }

    /// Reference an environment variable, read at validation time.
    pub fn from_env_var(name: impl Into<String>) -> Self {
        ApiKey::Env(name.into())
    }

    /// Resolve to the key itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for `api_key` when the literal key
    /// is empty or the variable is unset or empty.
    pub fn resolve(&self) -> Result<SecretString, ConfigError> {
        let missing = || ConfigError::MissingField {
            field: "api_key".to_string(),
        };

        match self {
            ApiKey::Literal(key) if key.expose_secret().is_empty() => Err(missing()),
            ApiKey::Literal(key) => Ok(key.clone()),
            ApiKey::Env(name) => match std::env::var(name) {
                Ok(value) if !value.is_empty() => Ok(SecretString::new(value)),
                _ => {
                    debug!(variable = %name, "API key environment variable is unset or empty");
                    Err(missing())
                }
            },
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKey::Literal(_) => f.write_str("ApiKey::Literal([FILTERED])"),
            ApiKey::Env(name) => write!(f, "ApiKey::Env({:?})", name),
        }
    }
}

/// Wire values the pipeline sets on every message.
///
/// These are fixed by policy: every send is marked transactional and the
/// global charset is UTF-8. They are kept configurable so the policy is
/// visible, not because callers are expected to change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePolicy {
    /// Value of the global `charset` wire field.
    pub charset: String,
    /// Value of the `isTransactional` wire field.
    pub transactional: bool,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            charset: "utf-8".to_string(),
            transactional: true,
        }
    }
}

/// Configuration for the Elastic Email client.
#[derive(Debug, Clone)]
pub struct ElasticEmailConfig {
    /// API key source. Required by [`validate_config`].
    pub api_key: Option<ApiKey>,

    /// Base URL of the API, without the send path.
    pub base_url: String,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Custom user agent string.
    pub user_agent: Option<String>,

    /// Fixed wire policy.
    pub pipeline: PipelinePolicy,
}

impl Default for ElasticEmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
            pipeline: PipelinePolicy::default(),
        }
    }
}

impl ElasticEmailConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_elastic_email::config::ElasticEmailConfig;
    ///
    /// let config = ElasticEmailConfig::builder()
    ///     .api_key("my-api-key")
    ///     .build()?;
    /// # Ok::<(), integrations_elastic_email::config::ConfigError>(())
    /// ```
    pub fn builder() -> ElasticEmailConfigBuilder {
        ElasticEmailConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads [`ENV_API_KEY`] (required) and [`ENV_BASE_URL`] (optional). The
    /// key is resolved immediately.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder().api_key_env(ENV_API_KEY);
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            builder = builder.base_url(base_url);
        }
        validate_config(builder.build()?)
    }

    /// Full URL of the send operation.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_elastic_email::config::ElasticEmailConfig;
    ///
    /// let config = ElasticEmailConfig::builder()
    ///     .api_key("key")
    ///     .base_url("http://localhost:4000/")
    ///     .build()?;
    /// assert_eq!(config.send_url(), "http://localhost:4000/v2/email/send");
    /// # Ok::<(), integrations_elastic_email::config::ConfigError>(())
    /// ```
    pub fn send_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEND_PATH)
    }

    /// Resolve the API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no key is configured or it resolves to nothing.
    pub fn resolved_api_key(&self) -> Result<SecretString, ConfigError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "api_key".to_string(),
            })?
            .resolve()
    }
}

/// Check that a usable API key is present and resolve it eagerly.
///
/// An environment-variable reference is replaced by the literal key it
/// resolves to, so nothing downstream reads the environment.
///
/// # Errors
///
/// Returns [`ConfigError`] when the key is absent, empty, or references an
/// unset/empty environment variable.
///
/// # Example
///
/// ```
/// use integrations_elastic_email::config::{validate_config, ElasticEmailConfig};
///
/// let missing = ElasticEmailConfig::default();
/// assert!(validate_config(missing).is_err());
///
/// let config = ElasticEmailConfig::builder().api_key("key").build()?;
/// assert!(validate_config(config).is_ok());
/// # Ok::<(), integrations_elastic_email::config::ConfigError>(())
/// ```
pub fn validate_config(config: ElasticEmailConfig) -> Result<ElasticEmailConfig, ConfigError> {
    let key = config.resolved_api_key()?;
    Ok(ElasticEmailConfig {
        api_key: Some(ApiKey::Literal(key)),
        ..config
    })
}

/// Builder for creating client configurations.
#[derive(Debug, Default)]
pub struct ElasticEmailConfigBuilder {
    api_key: Option<ApiKey>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    pipeline: Option<PipelinePolicy>,
}

impl ElasticEmailConfigBuilder {
    /// Set a literal API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(key));
        self
    }

    /// Read the API key from an environment variable at validation time.
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::from_env_var(name));
        self
    }

    /// Override the base URL (tests, proxies).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Replace the fixed wire policy.
    pub fn pipeline(mut self, policy: PipelinePolicy) -> Self {
        self.pipeline = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// The API key is not checked here; see [`validate_config`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL does not parse.
    pub fn build(self) -> Result<ElasticEmailConfig, ConfigError> {
        let defaults = ElasticEmailConfig::default();
        let base_url = self.base_url.unwrap_or(defaults.base_url);

        url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            message: e.to_string(),
        })?;

        Ok(ElasticEmailConfig {
            api_key: self.api_key,
            base_url,
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            user_agent: self.user_agent,
            pipeline: self.pipeline.unwrap_or(defaults.pipeline),
        })
    }
}
