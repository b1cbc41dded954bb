//! Latency recording and percentile calculation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Latency percentiles (all values in milliseconds)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct LatencyPercentiles {
    /// Minimum value
    pub min: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 66th percentile
    pub p66: f64,
    /// 75th percentile
    pub p75: f64,
    /// 80th percentile
    pub p80: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 98th percentile
    pub p98: f64,
    /// 99th percentile
    pub p99: f64,
    /// Maximum value
    pub max: f64,
    /// Mean value
    pub mean: f64,
    /// Standard deviation
    pub stddev: f64,
}

impl LatencyPercentiles {
    /// Labelled percentile rows, in ascending order, ending with the max
    pub fn rows(&self) -> [(&'static str, f64); 9] {
        [
            ("50%", self.p50),
            ("66%", self.p66),
            ("75%", self.p75),
            ("80%", self.p80),
            ("90%", self.p90),
            ("95%", self.p95),
            ("98%", self.p98),
            ("99%", self.p99),
            ("100%", self.max),
        ]
    }
}

/// In-memory histogram for efficient percentile calculation
/// Uses HdrHistogram for memory-efficient storage of large datasets
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: hdrhistogram::Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new histogram
    /// Configured for microsecond precision with max 1 hour latency
    pub fn new() -> Self {
        // 1us .. 1h (3,600,000,000us), 3 significant figures
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 3_600_000_000, 3)
            .expect("constant histogram bounds are valid");
        Self { histogram }
    }

    /// Record a duration; values past the upper bound are clamped
    pub fn record(&mut self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(micros.max(1));
    }

    /// Fold another histogram into this one
    pub fn merge(&mut self, other: &LatencyHistogram) {
        // identical bounds on both sides, so add cannot fail
        let _ = self.histogram.add(&other.histogram);
    }

    /// Get the number of recorded values
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Calculate percentiles from the histogram
    pub fn percentiles(&self) -> LatencyPercentiles {
        if self.histogram.is_empty() {
            return LatencyPercentiles::default();
        }

        let at = |q: f64| self.histogram.value_at_quantile(q) as f64 / 1000.0;
        LatencyPercentiles {
            min: self.histogram.min() as f64 / 1000.0,
            p50: at(0.50),
            p66: at(0.66),
            p75: at(0.75),
            p80: at(0.80),
            p90: at(0.90),
            p95: at(0.95),
            p98: at(0.98),
            p99: at(0.99),
            max: self.histogram.max() as f64 / 1000.0,
            mean: self.histogram.mean() / 1000.0,
            stddev: self.histogram.stdev() / 1000.0,
        }
    }

    /// Reset the histogram
    pub fn reset(&mut self) {
        self.histogram.reset();
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_percentiles() {
        let mut histogram = LatencyHistogram::new();

        for i in 1..=100 {
            histogram.record(Duration::from_millis(i));
        }

        let percentiles = histogram.percentiles();
        assert!((percentiles.min - 1.0).abs() < 0.1);
        assert!((percentiles.max - 100.0).abs() < 0.1);
        assert!((percentiles.p50 - 50.0).abs() < 1.0);
        assert!((percentiles.p90 - 90.0).abs() < 1.0);
        assert!((percentiles.mean - 50.5).abs() < 0.5);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = LatencyHistogram::new();
        let percentiles = histogram.percentiles();

        assert_eq!(percentiles, LatencyPercentiles::default());
    }

    #[test]
    fn test_histogram_record_duration() {
        let mut histogram = LatencyHistogram::new();
        histogram.record(Duration::from_millis(100));
        histogram.record(Duration::from_millis(200));

        assert_eq!(histogram.len(), 2);
        assert!(!histogram.is_empty());

        histogram.reset();
        assert!(histogram.is_empty());
    }

    #[test]
    fn test_histogram_clamps_extremes() {
        let mut histogram = LatencyHistogram::new();
        histogram.record(Duration::ZERO);
        histogram.record(Duration::from_secs(10 * 3600));
        assert_eq!(histogram.len(), 2);
    }

    #[test]
    fn test_histogram_merge() {
        let mut a = LatencyHistogram::new();
        let mut b = LatencyHistogram::new();
        a.record(Duration::from_millis(10));
        b.record(Duration::from_millis(30));
        b.record(Duration::from_millis(50));

        a.merge(&b);
        assert_eq!(a.len(), 3);
        assert!((a.percentiles().max - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_rows_end_with_max() {
        let percentiles = LatencyPercentiles {
            p50: 1.0,
            max: 9.0,
            ..Default::default()
        };
        let rows = percentiles.rows();
        assert_eq!(rows[0], ("50%", 1.0));
        assert_eq!(rows[8], ("100%", 9.0));
    }
}
