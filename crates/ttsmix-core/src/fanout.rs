//! Settle-all barrier for concurrent per-item operations.
//!
//! Every operation is created and pushed before any of them is awaited, so
//! they all make progress together. The barrier returns once all of them
//! have settled. Individual failures are counted, never raised.

use std::fmt::Display;
use std::future::Future;

use futures_util::stream::{FuturesUnordered, StreamExt};

/// Aggregate result of one fan-out round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutReport<R> {
    total: usize,
    succeeded: usize,
    failed: usize,
    results: Vec<R>,
}

impl<R> FanOutReport<R> {
    /// Number of operations dispatched.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of operations that settled successfully.
    pub const fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Number of operations that settled with an error.
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Accumulated outputs, in arrival order.
    pub fn results(&self) -> &[R] {
        &self.results
    }

    /// Whether no output was produced at all.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Consume the report, keeping the outputs.
    pub fn into_results(self) -> Vec<R> {
        self.results
    }
}

/// Per-invocation bookkeeping. Never shared across rounds.
struct FanOutBatch<R> {
    total: usize,
    settled: usize,
    succeeded: usize,
    failed: usize,
    results: Vec<R>,
}

impl<R> FanOutBatch<R> {
    fn new(total: usize) -> Self {
        Self {
            total,
            settled: 0,
            succeeded: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    fn settle_ok(&mut self, outputs: impl IntoIterator<Item = R>) {
        debug_assert!(self.settled < self.total);
        self.settled += 1;
        self.succeeded += 1;
        self.results.extend(outputs);
    }

    fn settle_err(&mut self) {
        debug_assert!(self.settled < self.total);
        self.settled += 1;
        self.failed += 1;
    }

    fn is_complete(&self) -> bool {
        self.settled == self.total
    }

    fn finish(self) -> FanOutReport<R> {
        FanOutReport {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            results: self.results,
        }
    }
}

/// Runs one operation per item concurrently and waits for all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOutBarrier;

impl FanOutBarrier {
    /// Dispatch `operation` for every item and collect what succeeded.
    ///
    /// A successful operation may yield any number of outputs, including
    /// none; each still counts as one settle. An empty `items` returns an
    /// empty report immediately.
    pub async fn run<T, F, Fut, O, R, E>(items: Vec<T>, operation: F) -> FanOutReport<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<O, E>>,
        O: IntoIterator<Item = R>,
        E: Display,
    {
        let mut batch = FanOutBatch::new(items.len());

        let mut pending: FuturesUnordered<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let fut = operation(item);
                async move { (index, fut.await) }
            })
            .collect();

        tracing::debug!(total = batch.total, "Fan-out dispatched");

        while let Some((index, outcome)) = pending.next().await {
            match outcome {
                Ok(outputs) => batch.settle_ok(outputs),
                Err(e) => {
                    tracing::warn!(item = index, error = %e, "Fan-out operation failed");
                    batch.settle_err();
                }
            }
            tracing::trace!(item = index, settled = batch.settled, total = batch.total, "Fan-out settle");
        }

        debug_assert!(batch.is_complete());
        tracing::debug!(
            total = batch.total,
            succeeded = batch.succeeded,
            failed = batch.failed,
            outputs = batch.results.len(),
            "Fan-out complete"
        );
        batch.finish()
    }
}
