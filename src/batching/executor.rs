// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Sliding-window batch executor.
//!
//! The [`BatchExecutor`] keeps at most `concurrency` per-item actions in
//! flight; as any one settles the next pending item starts, even if an
//! earlier item is still running. Results come back in input order whatever
//! the completion order was. Everything is polled on
//! the caller's task, so concurrency here is I/O overlap only.
//!
//! # Example
//!
//! ```
//! use content_hub_connector::batching::BatchExecutor;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let executor = BatchExecutor::new(2);
//! let doubled = executor.run(vec![1, 2, 3], |n| async move { n * 2 }).await;
//! assert_eq!(doubled, vec![2, 4, 6]);
//! # }
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future;
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Page size when collecting items for a bulk operation.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Share of the connection pool one bulk operation may occupy.
const POOL_SHARE_DIVISOR: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchExecutor {
    concurrency: usize,
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BatchExecutor {
    /// Executor with an explicit in-flight cap (at least 1).
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency: concurrency.max(1) }
    }

    /// Executor sized to a fifth of the connection pool, at least 1.
    pub fn from_pool_size(max_connections: usize) -> Self {
        Self::new(max_connections / POOL_SHARE_DIVISOR)
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `action` for every item. Each item settles on its own: a failing
    /// action (returning `Err`) leaves the rest of the batch untouched.
    pub async fn run<I, T, F, Fut, R>(&self, items: I, mut action: F) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let mut settled: Vec<(usize, R)> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let pending = action(item);
                async move { (index, pending.await) }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        debug!(items = settled.len(), concurrency = self.concurrency, "Batch settled");

        settled.sort_unstable_by_key(|(index, _)| *index);
        settled.into_iter().map(|(_, result)| result).collect()
    }

    /// Fail-fast variant: after the first error no pending item starts.
    /// Actions already in flight still run to completion, then the first
    /// error is returned.
    pub async fn try_run<I, T, F, Fut, R, E>(&self, items: I, mut action: F) -> Result<Vec<R>, E>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let failed = AtomicBool::new(false);
        let mut in_flight = stream::iter(items.into_iter().enumerate())
            .take_while(|_| future::ready(!failed.load(Ordering::SeqCst)))
            .map(|(index, item)| {
                let pending = action(item);
                async move { (index, pending.await) }
            })
            .buffer_unordered(self.concurrency);

        let mut settled: Vec<(usize, R)> = Vec::new();
        let mut first_error = None;
        while let Some((index, outcome)) = in_flight.next().await {
            match outcome {
                Ok(result) => settled.push((index, result)),
                Err(e) if first_error.is_none() => {
                    failed.store(true, Ordering::SeqCst);
                    first_error = Some(e);
                }
                Err(_) => {}
            }
        }

        if let Some(e) = first_error {
            debug!(settled = settled.len(), "Batch aborted after first error");
            return Err(e);
        }

        settled.sort_unstable_by_key(|(index, _)| *index);
        Ok(settled.into_iter().map(|(_, result)| result).collect())
    }
}
