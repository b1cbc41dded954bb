//! HTTP probe

use async_trait::async_trait;
use pacebench_core::{BenchResult, Probe, ProbeError, ProbeOutcome};

use crate::client::{HttpClientPool, HttpConfig};
use crate::request::RequestTemplate;

/// Sends one request per token and reads the whole response body
///
/// Responses with status 400 or above are failed units.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    name: String,
    pool: HttpClientPool,
    template: RequestTemplate,
}

impl HttpProbe {
    /// Build a probe with its own client pool
    pub fn new(template: RequestTemplate, config: &HttpConfig) -> BenchResult<Self> {
        Ok(Self::with_pool(template, HttpClientPool::new(config)?))
    }

    /// Build a probe on an existing pool
    pub fn with_pool(template: RequestTemplate, pool: HttpClientPool) -> Self {
        let name = format!("{} {}", template.method(), template.url());
        tracing::debug!(
            target_url = %template.url(),
            headers = template.headers().len(),
            timeout = ?pool.config().request_timeout,
            "HTTP probe ready"
        );
        Self {
            name,
            pool,
            template,
        }
    }

    /// Request sent per token
    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }

    fn map_error(&self, e: reqwest::Error) -> ProbeError {
        if e.is_timeout() {
            ProbeError::Timeout(self.pool.config().request_timeout)
        } else if e.is_connect() || e.is_request() || e.is_body() {
            ProbeError::Transport(e.to_string())
        } else {
            ProbeError::Other(e.to_string())
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> Result<ProbeOutcome, ProbeError> {
        let response = self
            .template
            .build(self.pool.client())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        let bytes = body.len() as u64;

        if status >= 400 {
            return Err(ProbeError::Status { status, bytes });
        }
        Ok(ProbeOutcome::with_status(status, bytes))
    }
}
