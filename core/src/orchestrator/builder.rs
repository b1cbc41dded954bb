//! Builder pattern for Orchestrator construction

use std::sync::Arc;
use std::time::Duration;

use crate::channel::ChannelConfig;
use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::traits::Workload;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let mut orchestrator = OrchestratorBuilder::new()
///     .concurrent(10)
///     .number(1000)
///     .rate(100)
///     .workload(report.clone())
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: RunConfig,
    workload: Option<Arc<dyn Workload>>,
    channel_config: ChannelConfig,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            workload: None,
            channel_config: ChannelConfig::default(),
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker count
    pub fn concurrent(mut self, concurrent: usize) -> Self {
        self.config.concurrent = concurrent;
        self
    }

    /// Set the count bound
    pub fn number(mut self, number: i64) -> Self {
        self.config.number = number;
        self
    }

    /// Set the rate (tokens per second)
    pub fn rate(mut self, rate: u32) -> Self {
        self.config.rate = rate;
        self
    }

    /// Set the duration bound
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Set the workload
    pub fn workload(mut self, workload: Arc<dyn Workload>) -> Self {
        self.workload = Some(workload);
        self
    }

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the workload is not set, or if configuration
    /// validation fails.
    pub fn build(self) -> BenchResult<Orchestrator> {
        let workload = self
            .workload
            .ok_or_else(|| BenchError::missing_config("workload"))?;

        self.config.validate()?;

        let mut orchestrator = Orchestrator::new(self.config, workload);
        orchestrator.channel_config = self.channel_config;
        Ok(orchestrator)
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
