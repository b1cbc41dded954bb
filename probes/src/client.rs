//! Pooled HTTP client

use std::time::Duration;

use pacebench_core::{BenchError, BenchResult};
use reqwest::Client;

/// HTTP client configuration
///
/// Defaults favour many short requests against one host: a large idle pool
/// and a request timeout in seconds rather than minutes.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Idle connection timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Request timeout
    pub request_timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// TCP keepalive interval
    pub tcp_keepalive: Option<Duration>,

    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 256,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            tcp_keepalive: Some(Duration::from_secs(60)),
            user_agent: format!("pacebench/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Size the idle pool, usually to the worker count
    pub fn with_pool_max_idle(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }
}

/// Shared `reqwest` client; clones share one connection pool
#[derive(Debug, Clone)]
pub struct HttpClientPool {
    client: Client,
    config: HttpConfig,
}

impl HttpClientPool {
    /// Build a client from `config`
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] if the TLS backend or another client
    /// setting cannot be initialised.
    pub fn new(config: &HttpConfig) -> BenchResult<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        if let Some(keepalive) = config.tcp_keepalive {
            builder = builder.tcp_keepalive(keepalive);
        }

        let client = builder
            .build()
            .map_err(|e| BenchError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Configuration the client was built from
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("pacebench/"));
    }

    #[test]
    fn test_config_builders() {
        let config = HttpConfig::default()
            .with_request_timeout(Duration::from_secs(2))
            .with_connect_timeout(Duration::from_millis(500))
            .with_pool_max_idle(8);

        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_millis(500));
        assert_eq!(config.pool_max_idle_per_host, 8);
    }

    #[test]
    fn test_pool_keeps_config() {
        let config = HttpConfig::default().with_pool_max_idle(4);
        let pool = HttpClientPool::new(&config).unwrap();
        assert_eq!(pool.config().pool_max_idle_per_host, 4);
    }
}
