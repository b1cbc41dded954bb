//! Result aggregation from multiple workers

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::worker::WorkerStats;

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    /// Number of workers that reported
    pub total_workers: usize,

    /// Total successful units
    pub total_completed: usize,

    /// Total failed units
    pub total_errors: usize,

    /// Total bytes received
    pub total_bytes: u64,

    /// Maximum duration across all workers
    pub total_duration: Duration,
}

impl AggregatedStats {
    /// Get the total number of units (completed + errors)
    pub fn total_units(&self) -> usize {
        self.total_completed + self.total_errors
    }

    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_units();
        if total > 0 {
            self.total_completed as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Get the error rate (0.0 - 1.0)
    pub fn error_rate(&self) -> f64 {
        if self.total_units() == 0 {
            0.0
        } else {
            1.0 - self.success_rate()
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    // Use the maximum elapsed time across all workers
    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    AggregatedStats {
        total_workers: stats.len(),
        total_completed: stats.iter().map(|s| s.completed).sum(),
        total_errors: stats.iter().map(|s| s.errors).sum(),
        total_bytes: stats.iter().map(|s| s.bytes).sum(),
        total_duration,
    }
}
