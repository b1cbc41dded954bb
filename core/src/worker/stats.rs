//! Worker statistics tracking

use std::time::Instant;

/// Statistics for one `consume` call
///
/// Workloads keep one of these per worker and merge them when the worker
/// returns; see [`crate::orchestrator::aggregate_worker_stats`].
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Units of work that succeeded
    pub completed: usize,

    /// Units of work that failed
    pub errors: usize,

    /// Bytes received across all units
    pub bytes: u64,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Record a successful unit
    pub fn record_success(&mut self, bytes: u64) {
        self.completed += 1;
        self.bytes += bytes;
    }

    /// Record a failed unit
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Total units seen (completed + errors)
    pub fn total_units(&self) -> usize {
        self.completed + self.errors
    }

    /// Elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stats_counts() {
        let mut stats = WorkerStats::new();
        stats.record_success(100);
        stats.record_success(50);
        stats.record_error();

        assert_eq!(stats.completed, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.bytes, 150);
        assert_eq!(stats.total_units(), 3);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(WorkerStats::new().total_units(), 0);
        assert!(WorkerStats::new().elapsed().is_none());
    }

    #[test]
    fn test_stats_elapsed() {
        let mut stats = WorkerStats::new();
        stats.start();
        std::thread::sleep(Duration::from_millis(5));
        stats.stop();
        let elapsed = stats.elapsed().unwrap();
        assert!(elapsed >= Duration::from_millis(5));
        assert_eq!(stats.elapsed(), Some(elapsed));
    }
}
