// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the connector.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application is responsible for choosing the exporter.
//!
//! # Metric Naming Convention
//! - `content_hub_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: search, delete_asset, create_category, ...
//! - `status`: success, error
//! - `outcome`: success, failure

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Record a dispatched request and its final status
pub fn record_request(operation: &str, status: &str) {
    counter!(
        "content_hub_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record request latency (including a replay, if any)
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "content_hub_request_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a replay after a failed first attempt
pub fn record_replay(operation: &str, reason: &str) {
    counter!(
        "content_hub_replays_total",
        "operation" => operation.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a login exchange outcome
pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "content_hub_logins_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a re-authentication trigger
pub fn record_reauthentication() {
    counter!("content_hub_reauthentications_total").increment(1);
}

/// Set session state (0 = Unauthenticated, 1 = Authenticating,
/// 2 = Authenticated, 3 = Reauthenticating, 4 = Failed)
pub fn set_session_state(level: u8) {
    gauge!("content_hub_session_state").set(level as f64);
}

/// Record a finished bulk operation
pub fn record_batch(operation: &str, total: usize, failed: usize) {
    histogram!(
        "content_hub_batch_size",
        "operation" => operation.to_string()
    )
    .record(total as f64);
    counter!(
        "content_hub_batch_failures_total",
        "operation" => operation.to_string()
    )
    .increment(failed as u64);
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    operation: String,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(&self.operation, self.start.elapsed());
    }
}
