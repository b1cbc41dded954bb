//! Run configuration types

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

/// Run configuration
///
/// Defines how a run is bounded and paced. Every field defaults to zero when
/// absent from a config file:
///
/// ```json
/// { "duration": "30s", "concurrent": 8, "rate": 200 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Elapsed-time bound; zero means no duration bound
    #[serde(default, with = "humantime_serde")]
    pub duration: Duration,

    /// Count bound: 0 no work, positive exactly that many, negative unbounded
    #[serde(default)]
    pub number: i64,

    /// Number of parallel workers; zero resolves to 1
    #[serde(default)]
    pub concurrent: usize,

    /// Target tokens per second; zero disables pacing
    #[serde(default)]
    pub rate: u32,
}

/// Which rule ends token emission
///
/// Resolved once from a [`RunConfig`]; see [`RunConfig::bound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Emit until the deadline passes
    Duration(Duration),

    /// Emit exactly this many tokens (zero closes immediately)
    Count(u64),

    /// Emit until explicitly stopped
    Unbounded,
}

impl RunConfig {
    /// Create a new config with the given worker count
    pub fn new(concurrent: usize) -> Self {
        Self {
            concurrent,
            ..Default::default()
        }
    }

    /// Set the duration bound
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the count bound
    pub fn with_number(mut self, number: i64) -> Self {
        self.number = number;
        self
    }

    /// Set the rate (tokens per second)
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Load a config from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Parse a config from JSON text
    pub fn from_json(raw: &str) -> BenchResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the emission bound. A positive duration wins over `number`.
    pub fn bound(&self) -> Bound {
        if !self.duration.is_zero() {
            return Bound::Duration(self.duration);
        }

        match u64::try_from(self.number) {
            Ok(n) => Bound::Count(n),
            Err(_) => Bound::Unbounded,
        }
    }

    /// Worker count with the default applied
    pub fn concurrency(&self) -> usize {
        self.concurrent.max(1)
    }

    /// Pacing interval, `1s / rate` truncated to whole nanoseconds.
    ///
    /// `None` when the rate is zero or so high that the interval truncates to
    /// zero; either way no pacing stage is installed.
    pub fn interval(&self) -> Option<Duration> {
        if self.rate == 0 {
            return None;
        }
        let interval = Duration::from_secs(1) / self.rate;
        (!interval.is_zero()).then_some(interval)
    }

    /// Copy of this config with defaults applied
    pub fn resolved(&self) -> Self {
        Self {
            concurrent: self.concurrency(),
            ..self.clone()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> BenchResult<()> {
        if self.rate > 0 && self.interval().is_none() {
            return Err(BenchError::config(format!(
                "rate {} is above the 1ns pacing resolution",
                self.rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.bound(), Bound::Count(0));
        assert!(config.interval().is_none());
    }

    #[test]
    fn test_duration_wins_over_number() {
        let config = RunConfig::new(2)
            .with_number(500)
            .with_duration(Duration::from_millis(100));
        assert_eq!(config.bound(), Bound::Duration(Duration::from_millis(100)));
    }

    #[test]
    fn test_number_branches() {
        assert_eq!(RunConfig::new(1).with_number(0).bound(), Bound::Count(0));
        assert_eq!(RunConfig::new(1).with_number(7).bound(), Bound::Count(7));
        assert_eq!(RunConfig::new(1).with_number(-1).bound(), Bound::Unbounded);
    }

    #[test]
    fn test_rate_does_not_change_bound() {
        let config = RunConfig::new(1).with_number(3).with_rate(50);
        assert_eq!(config.bound(), Bound::Count(3));
        assert_eq!(config.interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_interval_truncates() {
        let config = RunConfig::new(1).with_rate(3);
        assert_eq!(config.interval(), Some(Duration::from_nanos(333_333_333)));
    }

    #[test]
    fn test_interval_too_fine() {
        let config = RunConfig::new(1).with_rate(u32::MAX);
        assert!(config.interval().is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_resolves_to_one() {
        let config = RunConfig::new(0).resolved();
        assert_eq!(config.concurrent, 1);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            RunConfig::from_json(r#"{"duration": "1s 500ms", "concurrent": 4, "rate": 10}"#)
                .unwrap();
        assert_eq!(config.duration, Duration::from_millis(1500));
        assert_eq!(config.number, 0);
        assert_eq!(config.concurrent, 4);
        assert_eq!(config.rate, 10);
    }

    #[test]
    fn test_config_from_json_rejects_garbage() {
        assert!(RunConfig::from_json(r#"{"duration": "soon"}"#).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = RunConfig::new(5)
            .with_number(-1)
            .with_duration(Duration::from_secs(2));

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"duration\":\"2s\""));
        let deserialized: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
