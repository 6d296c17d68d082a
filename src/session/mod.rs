// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Session manager.
//!
//! Owns the memoized session handle: a shared future resolving to the base
//! URL every request is addressed against. With credentials the handle is a
//! lazy login exchange; without them it is the static base URL.
//!
//! # Lifecycle
//!
//! ```text
//! new() ─┬─ no credentials ─→ Unauthenticated (terminal)
//!        └─ credentials ────→ Authenticating ─→ Authenticated | Failed
//!                                   ↑                  │
//!                                   └─ reauthenticate() ┘ (Reauthenticating)
//! ```
//!
//! Re-authentication replaces the handle; it never mutates the old one.
//! Concurrent callers of [`SessionManager::reauthenticate`] each start their
//! own login, the last one installed wins.

mod types;

pub use types::SessionState;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::transport::{Transport, TransportRequest};

/// Response header carrying the tenant-scoped base URL after login.
pub const TENANT_BASE_URL_HEADER: &str = "x-ibm-dx-tenant-base-url";

type BaseFuture = Shared<BoxFuture<'static, Result<String>>>;

/// Credentials captured at construction; reused for every re-login.
#[derive(Clone)]
struct BasicLogin {
    url: String,
    username: String,
    password: String,
}

enum SessionAuth {
    Anonymous,
    Basic(Arc<BasicLogin>),
}

struct SessionHandle {
    generation: u64,
    base: BaseFuture,
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    auth: SessionAuth,
    handle: RwLock<SessionHandle>,
    /// Latest installed handle generation; stale logins don't publish state
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<SessionState>>,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionManager {
    /// Create the manager. No I/O happens here: the first login runs when
    /// the handle is first awaited.
    pub fn new(config: &ConnectorConfig, transport: Arc<dyn Transport>) -> Self {
        let auth = match (&config.username, &config.password) {
            (Some(username), Some(password)) => SessionAuth::Basic(Arc::new(BasicLogin {
                url: config.login_url(),
                username: username.clone(),
                password: password.clone(),
            })),
            _ => SessionAuth::Anonymous,
        };

        let initial_state = match auth {
            SessionAuth::Anonymous => SessionState::Unauthenticated,
            SessionAuth::Basic(_) => SessionState::Authenticating,
        };
        let (state_tx, state_rx) = watch::channel(initial_state);
        let state = Arc::new(state_tx);
        let generation = Arc::new(AtomicU64::new(0));

        let base = match &auth {
            SessionAuth::Anonymous => {
                let base = config.static_base_url();
                futures::future::ready(Ok(base)).boxed().shared()
            }
            SessionAuth::Basic(login) => Self::login_future(
                transport.clone(),
                login.clone(),
                state.clone(),
                generation.clone(),
                0,
            ),
        };
        crate::metrics::set_session_state(state_level(initial_state));

        Self {
            transport,
            auth,
            handle: RwLock::new(SessionHandle { generation: 0, base }),
            generation,
            state,
            state_rx,
        }
    }

    /// Get current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Get a receiver to watch state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Whether a login exchange backs this session.
    #[must_use]
    pub fn uses_login(&self) -> bool {
        matches!(self.auth, SessionAuth::Basic(_))
    }

    /// Generation of the installed handle (bumped by every re-login).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.handle.read().generation
    }

    /// Base URL from the latest handle, logging in first if needed.
    pub async fn current_base(&self) -> Result<String> {
        let base = self.handle.read().base.clone();
        base.await
    }

    /// Replace the handle with a fresh login using the original credentials.
    /// Without credentials this is a no-op returning the static base URL.
    pub async fn reauthenticate(&self) -> Result<String> {
        let login = match &self.auth {
            SessionAuth::Anonymous => return self.current_base().await,
            SessionAuth::Basic(login) => login.clone(),
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.send_replace(SessionState::Reauthenticating);
        crate::metrics::set_session_state(state_level(SessionState::Reauthenticating));
        crate::metrics::record_reauthentication();
        info!(generation, "Re-authenticating session");

        let base = Self::login_future(
            self.transport.clone(),
            login,
            self.state.clone(),
            self.generation.clone(),
            generation,
        );
        *self.handle.write() = SessionHandle { generation, base: base.clone() };
        base.await
    }

    fn login_future(
        transport: Arc<dyn Transport>,
        login: Arc<BasicLogin>,
        state: Arc<watch::Sender<SessionState>>,
        latest: Arc<AtomicU64>,
        generation: u64,
    ) -> BaseFuture {
        async move {
            let result = perform_login(transport.as_ref(), &login).await;
            crate::metrics::record_login(result.is_ok());

            if latest.load(Ordering::Acquire) == generation {
                let next = if result.is_ok() {
                    SessionState::Authenticated
                } else {
                    SessionState::Failed
                };
                state.send_replace(next);
                crate::metrics::set_session_state(state_level(next));
            } else {
                debug!(generation, "Superseded login finished");
            }

            match &result {
                Ok(base) => info!(generation, base = %base, "Session established"),
                Err(e) => warn!(generation, error = %e, "Login failed"),
            }
            result
        }
        .boxed()
        .shared()
    }
}

async fn perform_login(transport: &dyn Transport, login: &BasicLogin) -> Result<String> {
    let request = TransportRequest::get(login.url.as_str())
        .basic_auth(login.username.as_str(), login.password.as_str())
        .header("Accept", "application/json");

    let response = transport
        .execute(&request)
        .await
        .map_err(|e| ConnectorError::Login(e.to_string()))?
        .error_for_status(&login.url)
        .map_err(|e| ConnectorError::Login(e.to_string()))?;

    let base = response.header(TENANT_BASE_URL_HEADER).ok_or_else(|| {
        ConnectorError::InvalidResponse(format!(
            "login response from {} is missing the {} header",
            login.url, TENANT_BASE_URL_HEADER
        ))
    })?;

    Ok(base.trim_end_matches('/').to_string())
}

fn state_level(state: SessionState) -> u8 {
    match state {
        SessionState::Unauthenticated => 0,
        SessionState::Authenticating => 1,
        SessionState::Authenticated => 2,
        SessionState::Reauthenticating => 3,
        SessionState::Failed => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ScriptedTransport, TransportResponse};
    use std::sync::atomic::AtomicUsize;

    fn credentials_config() -> ConnectorConfig {
        ConnectorConfig {
            base_url: "https://hub.example.com/api".into(),
            username: Some("editor".into()),
            password: Some("secret".into()),
            ..Default::default()
        }
    }

    /// Each login answers with a distinct tenant URL: .../tenant-1, .../tenant-2, ...
    fn counting_login_transport() -> Arc<ScriptedTransport> {
        let logins = Arc::new(AtomicUsize::new(0));
        Arc::new(ScriptedTransport::new(move |req| {
            assert!(req.url.ends_with("/login/v1/basicauth"));
            let n = logins.fetch_add(1, Ordering::SeqCst) + 1;
            let tenant_base = format!("https://hub.example.com/api/tenant-{}/", n);
            Ok(TransportResponse::new(200).with_header(TENANT_BASE_URL_HEADER, tenant_base))
        }))
    }

    #[tokio::test]
    async fn test_anonymous_session_uses_static_base() {
        let transport = Arc::new(ScriptedTransport::new(|_| panic!("no I/O expected")));
        let config = ConnectorConfig {
            base_url: "https://hub.example.com/api".into(),
            tenant_id: Some("abc".into()),
            ..Default::default()
        };
        let session = SessionManager::new(&config, transport.clone());

        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(!session.uses_login());
        assert_eq!(session.current_base().await.unwrap(), "https://hub.example.com/api/abc");
        assert_eq!(session.reauthenticate().await.unwrap(), "https://hub.example.com/api/abc");
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_login_is_lazy_and_memoized() {
        let transport = counting_login_transport();
        let session = SessionManager::new(&credentials_config(), transport.clone());

        assert_eq!(session.state(), SessionState::Authenticating);
        assert!(transport.is_empty());

        for _ in 0..3 {
            assert_eq!(
                session.current_base().await.unwrap(),
                "https://hub.example.com/api/tenant-1"
            );
        }
        assert_eq!(transport.len(), 1);
        assert_eq!(session.state(), SessionState::Authenticated);

        let login = &transport.requests()[0];
        assert_eq!(login.basic_auth, Some(("editor".to_string(), "secret".to_string())));
        assert_eq!(login.header_value("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_reauthenticate_replaces_handle() {
        let transport = counting_login_transport();
        let session = SessionManager::new(&credentials_config(), transport.clone());

        assert_eq!(session.current_base().await.unwrap(), "https://hub.example.com/api/tenant-1");
        assert_eq!(session.generation(), 0);

        assert_eq!(session.reauthenticate().await.unwrap(), "https://hub.example.com/api/tenant-2");
        assert_eq!(session.generation(), 1);
        assert_eq!(session.current_base().await.unwrap(), "https://hub.example.com/api/tenant-2");
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(transport.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_waiters_share_one_login() {
        let transport = counting_login_transport();
        let session = SessionManager::new(&credentials_config(), transport.clone());

        let (a, b, c) = tokio::join!(
            session.current_base(),
            session.current_base(),
            session.current_base()
        );
        assert_eq!(a.unwrap(), b.clone().unwrap());
        assert_eq!(b.unwrap(), c.unwrap());
        assert_eq!(transport.len(), 1);
    }

    #[tokio::test]
    async fn test_login_failure_reaches_every_waiter_without_retry() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(TransportResponse::new(401).with_body("bad credentials"))
        }));
        let session = SessionManager::new(&credentials_config(), transport.clone());

        let first = session.current_base().await.unwrap_err();
        let second = session.current_base().await.unwrap_err();
        assert!(matches!(first, ConnectorError::Login(_)));
        assert_eq!(first, second);
        assert_eq!(transport.len(), 1);
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn test_login_without_tenant_header_is_invalid() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(TransportResponse::new(200))));
        let session = SessionManager::new(&credentials_config(), transport);

        let err = session.current_base().await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_state_receiver_observes_transitions() {
        let transport = counting_login_transport();
        let session = SessionManager::new(&credentials_config(), transport);
        let rx = session.state_receiver();

        session.current_base().await.unwrap();
        assert_eq!(*rx.borrow(), SessionState::Authenticated);
    }
}
