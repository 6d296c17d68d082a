// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Single-replay request dispatch.
//!
//! Every request gets at most two attempts. A failed first attempt is
//! reported to the diagnostic sink, handed to the [`RetryPolicy`] (which
//! re-authenticates on 401) and replayed once. There is no backoff and no
//! retry budget: a second failure goes straight to the caller.
//!
//! ```text
//! Initial ──ok──────────────────────────────→ Ok(response)
//!    │ err
//!    ├─→ diagnose (verbose only)
//!    ├─→ policy.recover(err) ──err──────────→ Err(recovery error)
//!    ↓
//! Replay ──ok───────────────────────────────→ Ok(response)
//!    └─err──────────────────────────────────→ Err(replay error)
//! ```

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ConnectorError, Result};
use crate::session::SessionManager;
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Attempt stage of a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Initial,
    Replay,
}

/// What to do between a failed first attempt and its replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Re-login on authorization failures, plain replay otherwise
    #[default]
    ReauthenticateOnUnauthorized,
    /// Replay without touching the session
    ReplayOnly,
}

impl RetryPolicy {
    /// Run the recovery action for `error` against `session`.
    pub async fn recover(&self, error: &ConnectorError, session: &SessionManager) -> Result<()> {
        match self {
            Self::ReauthenticateOnUnauthorized if error.is_authorization_failure() => {
                session.reauthenticate().await.map(|_| ())
            }
            _ => Ok(()),
        }
    }
}

/// Run `operation`; on failure run `hook` with the error, then run
/// `operation` exactly once more.
///
/// `operation` is invoked per attempt, so it may read fresh state (such as
/// the session base URL) on the replay.
pub async fn retry_once<F, Fut, T, H, HFut>(
    operation_name: &str,
    mut operation: F,
    hook: H,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    H: FnOnce(ConnectorError) -> HFut,
    HFut: Future<Output = Result<()>>,
{
    let mut hook = Some(hook);
    let mut stage = DispatchStage::Initial;

    loop {
        match (operation().await, stage) {
            (Ok(val), DispatchStage::Initial) => return Ok(val),
            (Ok(val), DispatchStage::Replay) => {
                info!("Operation '{}' succeeded on replay", operation_name);
                return Ok(val);
            }
            (Err(err), DispatchStage::Initial) => {
                debug!(operation = operation_name, error = %err, "First attempt failed");
                if let Some(hook) = hook.take() {
                    hook(err).await?;
                }
                stage = DispatchStage::Replay;
            }
            (Err(err), DispatchStage::Replay) => return Err(err),
        }
    }
}

/// Executes requests against the transport with session-aware replay.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
    policy: RetryPolicy,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionManager>, verbose: bool) -> Self {
        Self {
            transport,
            session,
            policy: RetryPolicy::default(),
            verbose,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Dispatch a request built from the current base URL.
    ///
    /// `build` runs once per attempt; the replay therefore targets the base
    /// installed by a re-authentication, with otherwise identical request
    /// parameters.
    pub async fn dispatch<B>(&self, operation: &str, build: B) -> Result<TransportResponse>
    where
        B: Fn(&str) -> TransportRequest,
    {
        let _timer = crate::metrics::LatencyTimer::new(operation);

        let this = self;
        let build = &build;
        let result = retry_once(
            operation,
            || async move {
                let base = this.session.current_base().await?;
                let request = build(base.as_str());
                this.attempt(&request).await
            },
            |err| async move {
                this.diagnose(operation, &err);
                let reason =
                    if err.is_authorization_failure() { "authorization" } else { "failure" };
                crate::metrics::record_replay(operation, reason);
                this.policy.recover(&err, &this.session).await
            },
        )
        .await;

        let status = if result.is_ok() { "success" } else { "error" };
        crate::metrics::record_request(operation, status);
        if let Err(e) = &result {
            self.diagnose(operation, e);
        }
        result
    }

    async fn attempt(&self, request: &TransportRequest) -> Result<TransportResponse> {
        self.transport
            .execute(request)
            .await?
            .error_for_status(&request.url)
    }

    /// Diagnostic sink: observes failures, never swallows them.
    fn diagnose(&self, operation: &str, error: &ConnectorError) {
        if self.verbose {
            warn!(operation, status = ?error.status(), error = %error, "Request failed");
        }
    }
}
