//! Report collector workload

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pacebench_core::{
    aggregate_worker_stats, LatencyHistogram, Probe, TokenStream, WorkerStats, Workload,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::summary::ReportSummary;

/// Workload that runs a [`Probe`] once per token and aggregates the results
///
/// Every `consume` call keeps worker-local stats and a latency histogram and
/// folds them into the shared totals when it returns, so the hot path takes
/// no lock. `drain` waits for every `consume` call to return; after that
/// [`Report::summary`] is final.
pub struct Report {
    probe: Arc<dyn Probe>,
    concurrency: usize,
    stop: CancellationToken,
    inflight: TaskTracker,
    window: Mutex<Window>,
    collected: Mutex<Collected>,
}

#[derive(Default)]
struct Window {
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

#[derive(Default)]
struct Collected {
    workers: Vec<WorkerStats>,
    latency: LatencyHistogram,
    status_codes: BTreeMap<u16, usize>,
}

impl Report {
    /// Create a collector around `probe`
    ///
    /// `concurrency` is only echoed in the summary.
    pub fn new(probe: Arc<dyn Probe>, concurrency: usize) -> Self {
        Self {
            probe,
            concurrency,
            stop: CancellationToken::new(),
            inflight: TaskTracker::new(),
            window: Mutex::new(Window::default()),
            collected: Mutex::new(Collected::default()),
        }
    }

    /// Summarise what has been collected so far
    ///
    /// Complete once [`Workload::drain`] has returned.
    pub fn summary(&self) -> ReportSummary {
        let elapsed = {
            let window = lock(&self.window);
            match (window.started_at, window.finished_at) {
                (Some(start), Some(end)) => end.duration_since(start),
                (Some(start), None) => start.elapsed(),
                _ => Default::default(),
            }
        };

        let collected = lock(&self.collected);
        ReportSummary::new(
            self.probe.name(),
            self.concurrency,
            elapsed,
            aggregate_worker_stats(&collected.workers),
            collected.latency.percentiles(),
            collected.status_codes.clone(),
        )
    }

    fn merge(&self, stats: WorkerStats, latency: &LatencyHistogram, codes: BTreeMap<u16, usize>) {
        let mut collected = lock(&self.collected);
        collected.workers.push(stats);
        collected.latency.merge(latency);
        for (status, count) in codes {
            *collected.status_codes.entry(status).or_default() += count;
        }
    }
}

#[async_trait]
impl Workload for Report {
    fn name(&self) -> &str {
        self.probe.name()
    }

    async fn setup(&self) {
        lock(&self.window).started_at = Some(Instant::now());
    }

    async fn consume(&self, tokens: TokenStream) {
        let _inflight = self.inflight.token();
        let mut stats = WorkerStats::new();
        let mut latency = LatencyHistogram::new();
        let mut codes: BTreeMap<u16, usize> = BTreeMap::new();
        stats.start();

        loop {
            tokio::select! {
                biased;

                _ = self.stop.cancelled() => break,
                token = tokens.recv() => {
                    if token.is_none() {
                        break;
                    }
                }
            }

            let start = Instant::now();
            let result = self.probe.probe().await;
            latency.record(start.elapsed());

            match result {
                Ok(outcome) => {
                    if let Some(status) = outcome.status {
                        *codes.entry(status).or_default() += 1;
                    }
                    stats.record_success(outcome.bytes);
                }
                Err(e) => {
                    if let Some(status) = e.status() {
                        *codes.entry(status).or_default() += 1;
                    }
                    stats.record_error();
                    tracing::warn!(error = %e, "Unit of work failed");
                }
            }
        }

        stats.stop();
        tracing::debug!(
            completed = stats.completed,
            errors = stats.errors,
            "Consumer finished"
        );
        self.merge(stats, &latency, codes);
    }

    fn stop(&self) {
        self.stop.cancel();
    }

    async fn drain(&self) {
        self.inflight.close();
        self.inflight.wait().await;
        lock(&self.window).finished_at = Some(Instant::now());
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Report")
            .field("probe", &self.probe.name())
            .field("concurrency", &self.concurrency)
            .field("inflight", &self.inflight.len())
            .field("stopped", &self.stop.is_cancelled())
            .finish()
    }
}

/// Lock ignoring poison; the guarded data stays consistent between statements
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
