//! HTTP client configured for manual redirect handling

use mosdeps_config::NetworkConfig;
use mosdeps_errors::{ConfigError, Error};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// No connect timeout when `None`
    pub connect_timeout: Option<Duration>,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::from(&NetworkConfig::default())
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout_secs.map(Duration::from_secs),
            max_redirects: config.max_redirects,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP client wrapper
///
/// Automatic redirects are disabled; callers see 3xx responses as-is.
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .user_agent(&config.user_agent);

        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let client = builder.build().map_err(|e| ConfigError::Invalid {
            message: format!("http client: {e}"),
        })?;

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Issue a single GET request without following redirects
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response was received.
    pub async fn get(&self, url: Url) -> Result<Response, reqwest::Error> {
        self.client.get(url).send().await
    }
}
