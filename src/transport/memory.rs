// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! In-memory [`Transport`] answering from a handler closure.
//!
//! Records every request it sees, so callers can assert on the exact wire
//! parameters the connector produced.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::traits::{Transport, TransportRequest, TransportResponse};
use crate::error::Result;

type Handler = dyn Fn(&TransportRequest) -> Result<TransportResponse> + Send + Sync;

pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<TransportResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every request executed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    /// Number of executed requests whose URL ends with `suffix`.
    #[must_use]
    pub fn count_matching(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    pub fn clear(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        self.requests.lock().push(request.clone());
        (self.handler)(request)
    }
}
