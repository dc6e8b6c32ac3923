//! reqwest-backed [`ConnectionFactory`].

use std::sync::Arc;
use std::time::Duration;

use horizon_favicon_core::logging::targets;
use reqwest::redirect::Policy;
use url::Url;

use super::response::HttpConnection;
use super::runtime;
use crate::connection::{Connection, ConnectionFactory};
use crate::error::{NetworkError, Result};

/// Default cap on a favicon response body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Settings for [`HttpClient`].
///
/// The defaults suit favicon services: short timeouts, because a slow
/// supplier only delays the next one in the chain, and a 1 MiB body cap.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Whole-request deadline, from connect to the last body byte.
    pub timeout: Option<Duration>,
    /// Deadline for establishing the TCP/TLS connection.
    pub connect_timeout: Option<Duration>,
    /// Redirect hops allowed per request. `0` disables redirects.
    pub max_redirects: usize,
    pub user_agent: Option<String>,
    /// Bodies larger than this fail with [`NetworkError::BodyTooLarge`].
    pub max_body_bytes: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
            connect_timeout: Some(Duration::from_secs(5)),
            max_redirects: 10,
            user_agent: Some(concat!("HorizonFavicon/", env!("CARGO_PKG_VERSION")).to_string()),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl HttpClientConfig {
    fn reqwest_client(&self) -> Result<reqwest::Client> {
        let redirects = match self.max_redirects {
            0 => Policy::none(),
            hops => Policy::limited(hops),
        };
        let mut builder = reqwest::Client::builder().redirect(redirects);
        if let Some(deadline) = self.timeout {
            builder = builder.timeout(deadline);
        }
        if let Some(deadline) = self.connect_timeout {
            builder = builder.connect_timeout(deadline);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder
            .build()
            .map_err(|e| NetworkError::Config(e.to_string()))
    }
}

/// Fluent construction of an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    pub fn timeout(mut self, deadline: Duration) -> Self {
        self.config.timeout = Some(deadline);
        self
    }

    pub fn connect_timeout(mut self, deadline: Duration) -> Self {
        self.config.connect_timeout = Some(deadline);
        self
    }

    /// Clear both the request and the connect deadline.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self.config.connect_timeout = None;
        self
    }

    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.config.max_redirects = hops;
        self
    }

    /// Treat 3xx responses as final.
    pub fn no_redirects(self) -> Self {
        self.max_redirects(0)
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let client = self.config.reqwest_client()?;
        tracing::debug!(
            target: targets::NET,
            timeout = ?self.config.timeout,
            max_body_bytes = self.config.max_body_bytes,
            "http connection factory ready"
        );
        Ok(HttpClient {
            shared: Arc::new(Shared {
                client,
                config: self.config,
            }),
        })
    }
}

struct Shared {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A [`ConnectionFactory`] that issues real GET requests.
///
/// Clones share one reqwest connection pool. [`open`](ConnectionFactory::open)
/// waits for the response headers on the shared runtime, so it belongs on a
/// background executor and never on the UI thread.
#[derive(Clone)]
pub struct HttpClient {
    shared: Arc<Shared>,
}

impl HttpClient {
    /// A client with [`HttpClientConfig::default`].
    pub fn new() -> Result<Self> {
        HttpClientBuilder::new().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.shared.config
    }
}

impl ConnectionFactory for HttpClient {
    fn open(&self, url: &Url) -> Result<Box<dyn Connection>> {
        tracing::trace!(target: targets::NET, %url, "GET");
        let pending = self.shared.client.get(url.clone()).send();
        let response = runtime::block_on(pending)??;
        tracing::trace!(
            target: targets::NET,
            %url,
            status = response.status().as_u16(),
            "headers received"
        );
        let limit = self.shared.config.max_body_bytes;
        Ok(Box::new(HttpConnection::new(response, limit)))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HttpClient").field(&self.shared.config).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_favour_short_fetches() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(config.user_agent.unwrap().starts_with("HorizonFavicon/"));
    }

    #[test]
    fn test_builder_overrides() {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(3))
            .no_redirects()
            .max_body_bytes(64)
            .user_agent("favicon-check")
            .build()
            .unwrap();

        let config = client.config();
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.max_redirects, 0);
        assert_eq!(config.max_body_bytes, 64);
        assert_eq!(config.user_agent.as_deref(), Some("favicon-check"));
    }

    #[test]
    fn test_no_timeout_clears_both_deadlines() {
        let client = HttpClient::builder().no_timeout().build().unwrap();
        assert!(client.config().timeout.is_none());
        assert!(client.config().connect_timeout.is_none());
    }

    #[test]
    fn test_clones_share_config() {
        let client = HttpClient::new().unwrap();
        let copy = client.clone();
        assert!(std::ptr::eq(client.config(), copy.config()));
    }
}
