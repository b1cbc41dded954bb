//! Worker pool execution

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::channel::TokenStream;
use crate::traits::Workload;

/// Pool of workers sharing one token stream
///
/// Each worker is a tokio task that calls [`Workload::consume`] exactly once;
/// the workload loops over the stream until it closes. The tracker is the
/// outstanding-worker counter: one entry per spawned worker, released when
/// that worker's future completes or unwinds.
pub struct WorkerPool {
    tracker: TaskTracker,
    size: usize,
    workload: Arc<dyn Workload>,
}

impl WorkerPool {
    /// Spawn `size` workers over `tokens`
    pub fn spawn(size: usize, workload: Arc<dyn Workload>, tokens: TokenStream) -> Self {
        let tracker = TaskTracker::new();

        for worker_id in 0..size {
            let workload = Arc::clone(&workload);
            let tokens = tokens.clone();
            tracker.spawn(async move {
                tracing::debug!(worker_id, "Worker started");
                workload.consume(tokens).await;
                tracing::debug!(worker_id, "Worker finished");
            });
        }

        // no more workers will be added; wait() can now complete
        tracker.close();

        Self {
            tracker,
            size,
            workload,
        }
    }

    /// Number of workers spawned
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of workers still running
    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }

    /// Resolves once every worker has returned
    pub async fn drained(&self) {
        self.tracker.wait().await;
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("outstanding", &self.outstanding())
            .field("workload", &self.workload.name())
            .finish()
    }
}
