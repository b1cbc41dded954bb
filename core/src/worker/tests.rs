//! Tests for the worker pool

use super::*;
use crate::channel::{token_channel, Token, TokenStream};
use crate::traits::Workload;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Workloads
// ============================================================================

/// Counts tokens; optionally holds every worker until released
struct CountingWorkload {
    tokens: AtomicUsize,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl CountingWorkload {
    fn new() -> Self {
        Self {
            tokens: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }
}

#[async_trait]
impl Workload for CountingWorkload {
    fn name(&self) -> &str {
        "counting"
    }

    async fn consume(&self, tokens: TokenStream) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        while tokens.recv().await.is_some() {
            self.tokens.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn stop(&self) {}

    async fn drain(&self) {}
}

/// Panics on the first token
struct PanickingWorkload;

#[async_trait]
impl Workload for PanickingWorkload {
    async fn consume(&self, tokens: TokenStream) {
        if tokens.recv().await.is_some() {
            panic!("unit of work blew up");
        }
    }

    fn stop(&self) {}

    async fn drain(&self) {}
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_spawns_one_consume_per_worker() {
    let workload = Arc::new(CountingWorkload::new());
    let (tx, rx) = token_channel(1);
    drop(tx);

    let pool = WorkerPool::spawn(5, workload.clone(), TokenStream::new(rx));
    pool.drained().await;

    assert_eq!(pool.size(), 5);
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(workload.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_workers_share_the_stream() {
    let workload = Arc::new(CountingWorkload::new());
    let (tx, rx) = token_channel(1);
    let pool = WorkerPool::spawn(3, workload.clone(), TokenStream::new(rx));

    for _ in 0..50 {
        tx.send_async(Token).await.unwrap();
    }
    drop(tx);
    pool.drained().await;

    assert_eq!(workload.tokens.load(Ordering::SeqCst), 50);
}

#[tokio::test]
async fn test_outstanding_until_workers_return() {
    let gate = Arc::new(Notify::new());
    let workload = Arc::new(CountingWorkload::gated(gate.clone()));
    let (tx, rx) = token_channel(1);
    drop(tx);

    let pool = WorkerPool::spawn(2, workload.clone(), TokenStream::new(rx));
    assert_eq!(pool.outstanding(), 2);

    let not_yet = tokio::time::timeout(Duration::from_millis(20), pool.drained()).await;
    assert!(not_yet.is_err());

    // both workers are parked on the gate by now
    while workload.calls.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }
    gate.notify_waiters();
    pool.drained().await;
    assert_eq!(pool.outstanding(), 0);
}

#[tokio::test]
async fn test_panicking_worker_still_counts_as_done() {
    let (tx, rx) = token_channel(4);
    tx.send_async(Token).await.unwrap();
    drop(tx);

    let pool = WorkerPool::spawn(2, Arc::new(PanickingWorkload), TokenStream::new(rx));
    pool.drained().await;
    assert_eq!(pool.outstanding(), 0);
}

#[tokio::test]
async fn test_pool_debug() {
    let (_tx, rx) = token_channel(1);
    let pool = WorkerPool::spawn(1, Arc::new(CountingWorkload::new()), TokenStream::new(rx));
    let debug = format!("{:?}", pool);
    assert!(debug.contains("WorkerPool"));
    assert!(debug.contains("counting"));
}
