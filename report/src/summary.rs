//! Final run summary

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use pacebench_core::{AggregatedStats, LatencyPercentiles};
use serde::Serialize;

/// Everything a finished run reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Probe name, usually method and URL
    pub target: String,

    /// Configured worker count
    pub concurrency: usize,

    /// Workers that reported results
    pub workers: usize,

    /// Wall time from setup to the end of drain
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,

    /// Units of work attempted
    pub complete: usize,

    /// Units that succeeded
    pub succeeded: usize,

    /// Units that failed
    pub failed: usize,

    /// Share of attempted units that succeeded (0.0 - 1.0)
    pub success_rate: f64,

    /// Share of attempted units that failed (0.0 - 1.0)
    pub error_rate: f64,

    /// Payload bytes received
    pub bytes: u64,

    /// Attempted units per second of wall time
    pub requests_per_second: f64,

    /// Responses per status code
    pub status_codes: BTreeMap<u16, usize>,

    /// Latency distribution in milliseconds
    pub latency: LatencyPercentiles,
}

impl ReportSummary {
    /// Build a summary from aggregated worker stats
    pub fn new(
        target: impl Into<String>,
        concurrency: usize,
        elapsed: Duration,
        stats: AggregatedStats,
        latency: LatencyPercentiles,
        status_codes: BTreeMap<u16, usize>,
    ) -> Self {
        let complete = stats.total_units();
        let secs = elapsed.as_secs_f64();
        let requests_per_second = if secs > 0.0 {
            complete as f64 / secs
        } else {
            0.0
        };

        Self {
            target: target.into(),
            concurrency,
            workers: stats.total_workers,
            elapsed,
            complete,
            succeeded: stats.total_completed,
            failed: stats.total_errors,
            success_rate: stats.success_rate(),
            error_rate: stats.error_rate(),
            bytes: stats.total_bytes,
            requests_per_second,
            status_codes,
            latency,
        }
    }

    /// Mean time per unit across all workers, in milliseconds
    pub fn time_per_request_ms(&self) -> f64 {
        if self.complete == 0 {
            0.0
        } else {
            self.elapsed.as_secs_f64() * 1000.0 * self.concurrency.max(1) as f64
                / self.complete as f64
        }
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target:                 {}", self.target)?;
        writeln!(f, "Concurrency Level:      {}", self.concurrency)?;
        writeln!(
            f,
            "Time taken for tests:   {:.3} seconds",
            self.elapsed.as_secs_f64()
        )?;
        writeln!(f, "Complete requests:      {}", self.complete)?;
        writeln!(
            f,
            "Failed requests:        {} ({:.2}%)",
            self.failed,
            self.error_rate * 100.0
        )?;
        writeln!(f, "Total transferred:      {} bytes", self.bytes)?;
        writeln!(
            f,
            "Requests per second:    {:.2} [#/sec] (mean)",
            self.requests_per_second
        )?;
        writeln!(
            f,
            "Time per request:       {:.3} [ms] (mean)",
            self.time_per_request_ms()
        )?;

        if !self.status_codes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Status code distribution:")?;
            for (status, count) in &self.status_codes {
                writeln!(f, "  [{status}] {count} responses")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Connection Times (ms)")?;
        writeln!(f, "              min   mean[+/-sd]  max")?;
        writeln!(
            f,
            "Total:     {:>6.1} {:>6.1} {:>6.1} {:>6.1}",
            self.latency.min, self.latency.mean, self.latency.stddev, self.latency.max
        )?;

        writeln!(f)?;
        writeln!(
            f,
            "Percentage of the requests served within a certain time (ms)"
        )?;
        for (label, value) in self.latency.rows() {
            writeln!(f, "  {label:>4}  {value:>8.1}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(completed: usize, errors: usize) -> AggregatedStats {
        AggregatedStats {
            total_workers: 2,
            total_completed: completed,
            total_errors: errors,
            total_bytes: 4096,
            total_duration: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_requests_per_second() {
        let summary = ReportSummary::new(
            "probe",
            2,
            Duration::from_secs(2),
            stats(90, 10),
            LatencyPercentiles::default(),
            BTreeMap::new(),
        );
        assert_eq!(summary.complete, 100);
        assert_eq!(summary.workers, 2);
        assert_eq!(summary.failed, 10);
        assert!((summary.success_rate - 0.9).abs() < 1e-9);
        assert!((summary.error_rate - 0.1).abs() < 1e-9);
        assert!((summary.requests_per_second - 50.0).abs() < f64::EPSILON);
        assert!((summary.time_per_request_ms() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run_has_zero_rates() {
        let summary = ReportSummary::new(
            "probe",
            1,
            Duration::ZERO,
            AggregatedStats::default(),
            LatencyPercentiles::default(),
            BTreeMap::new(),
        );
        assert_eq!(summary.requests_per_second, 0.0);
        assert_eq!(summary.time_per_request_ms(), 0.0);
        assert_eq!(summary.error_rate, 0.0);
        assert!(summary.to_string().contains("Failed requests:        0 (0.00%)"));
    }

    #[test]
    fn test_display_lists_status_codes_and_percentiles() {
        let mut codes = BTreeMap::new();
        codes.insert(200, 95);
        codes.insert(503, 5);

        let summary = ReportSummary::new(
            "GET http://127.0.0.1:8080/",
            4,
            Duration::from_secs(1),
            stats(95, 5),
            LatencyPercentiles {
                p99: 12.5,
                ..Default::default()
            },
            codes,
        );
        let text = summary.to_string();

        assert!(text.contains("GET http://127.0.0.1:8080/"));
        assert!(text.contains("Complete requests:      100"));
        assert!(text.contains("[503] 5 responses"));
        assert!(text.contains("Failed requests:        5 (5.00%)"));
        assert!(text.contains("99%"));
        assert!(text.contains("12.5"));
    }

    #[test]
    fn test_display_skips_empty_status_table() {
        let summary = ReportSummary::new(
            "probe",
            1,
            Duration::from_secs(1),
            stats(1, 0),
            LatencyPercentiles::default(),
            BTreeMap::new(),
        );
        assert!(!summary.to_string().contains("Status code distribution"));
    }
}
