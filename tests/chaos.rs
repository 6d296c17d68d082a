// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Chaos Testing for the Content Hub Connector
//!
//! This module tests failure scenarios using:
//! 1. **FailingTransport wrapper** - precise error injection at specific call counts
//! 2. **Scripted responses** - expiring sessions, partial bulk failures
//! 3. **Garbage data** - undecodable bodies and malformed options
//!
//! # Running Chaos Tests
//! ```bash
//! cargo test --test chaos -- --nocapture
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use content_hub_connector::search::ParamValue;
use content_hub_connector::session::TENANT_BASE_URL_HEADER;
use content_hub_connector::transport::{RequestBody, TransportRequest};
use content_hub_connector::{
    BatchResult, Connector, ConnectorConfig, ConnectorError, DeleteAssetsOptions, Result,
    ResourceUpload, ScriptedTransport, SearchRequest, SearchTranslator, SessionState,
    TaxonomyDefinition, Transport, TransportResponse,
};

// =============================================================================
// Failing Transport Wrapper - Precise Error Injection
// =============================================================================

/// A wrapper that injects transport failures at specific call numbers
/// (1-based). Useful for testing replay paths with precision.
struct FailingTransport {
    inner: Arc<dyn Transport>,
    fail_on: HashSet<usize>,
    calls: AtomicUsize,
}

impl FailingTransport {
    fn new(inner: Arc<dyn Transport>, fail_on: impl IntoIterator<Item = usize>) -> Self {
        Self {
            inner,
            fail_on: fail_on.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(ConnectorError::Transport(format!("injected failure on call {}", call)));
        }
        self.inner.execute(request).await
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn credentials() -> ConnectorConfig {
    ConnectorConfig {
        base_url: "https://hub.example.com/api".into(),
        username: Some("editor".into()),
        password: Some("secret".into()),
        ..Default::default()
    }
}

/// Logs in to tenant-a; every search returns `ids`, every delete succeeds.
fn hub(ids: &'static [&'static str]) -> Arc<ScriptedTransport> {
    Arc::new(ScriptedTransport::new(move |req| {
        if req.url.ends_with("/login/v1/basicauth") {
            return Ok(TransportResponse::new(200)
                .with_header(TENANT_BASE_URL_HEADER, "https://hub.example.com/api/tenant-a"));
        }
        if req.url.ends_with("/search") {
            let documents: Vec<_> = ids.iter().map(|id| json!({"id": id})).collect();
            return Ok(TransportResponse::ok_json(&json!({
                "numFound": ids.len(),
                "documents": documents
            })));
        }
        Ok(TransportResponse::new(204))
    }))
}

// =============================================================================
// Chaos Tests - Bulk Operations
// =============================================================================

#[tokio::test]
async fn chaos_bulk_delete_second_item_fails() {
    let transport = Arc::new(ScriptedTransport::new(|req| {
        if req.url.ends_with("/search") {
            return Ok(TransportResponse::ok_json(&json!({
                "numFound": 3,
                "documents": [{"id": "a"}, {"id": "b"}, {"id": "c"}]
            })));
        }
        if req.url.ends_with("/assets/b") {
            return Ok(TransportResponse::new(409).with_body("asset is referenced"));
        }
        Ok(TransportResponse::new(204))
    }));
    let connector = Connector::with_transport(ConnectorConfig::default(), transport.clone());

    let statuses = connector
        .authoring()
        .unwrap()
        .delete_assets(&DeleteAssetsOptions::default())
        .await
        .unwrap();

    assert_eq!(statuses.len(), 3);
    assert_eq!(
        BatchResult::from_statuses(&statuses),
        BatchResult { total: 3, succeeded: 2, failed: 1 }
    );
    assert!(!statuses[1].succeeded);
    assert!(statuses[1].message.contains("asset is referenced"));
    // One replay for the failed item only
    assert_eq!(transport.count_matching("/assets/b"), 2);
    assert_eq!(transport.count_matching("/assets/a"), 1);
}

#[tokio::test]
async fn chaos_id_collection_failure_fails_bulk_delete() {
    let transport = Arc::new(ScriptedTransport::new(|req| {
        if req.url.ends_with("/search") {
            return Ok(TransportResponse::new(503).with_body("search offline"));
        }
        Ok(TransportResponse::new(204))
    }));
    let connector = Connector::with_transport(ConnectorConfig::default(), transport.clone());

    let err = connector
        .authoring()
        .unwrap()
        .delete_assets(&DeleteAssetsOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(transport.count_matching("/search"), 2);
    assert_eq!(transport.len(), 2);
}

#[tokio::test]
async fn chaos_forward_reference_taxonomy() {
    let transport = hub(&[]);
    let connector = Connector::with_transport(credentials(), transport.clone());

    let err = connector
        .authoring()
        .unwrap()
        .create_taxonomies(&[
            TaxonomyDefinition::attach("Colors", ["Green"]),
            TaxonomyDefinition::root("Colors", ["Red", "Blue"]),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::UnresolvedParent(ref parent) if parent == "Colors"));
    assert!(transport.is_empty());
}

/// Category creation where "Blue" is rejected at once and every other name
/// answers after a delay, counting completed exchanges.
struct SlowCategories {
    completed: AtomicUsize,
}

#[async_trait]
impl Transport for SlowCategories {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let name = match &request.body {
            RequestBody::Json(body) => body["name"].as_str().unwrap_or_default().to_string(),
            _ => String::new(),
        };
        if name == "Blue" {
            return Ok(TransportResponse::new(400).with_body("dup"));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(TransportResponse::ok_json(&json!({"id": format!("id-{}", name)})))
    }
}

#[tokio::test(start_paused = true)]
async fn chaos_failed_child_lets_sent_siblings_finish() {
    let transport = Arc::new(SlowCategories { completed: AtomicUsize::new(0) });
    let config = ConnectorConfig { max_connections: 10, ..Default::default() };
    let connector = Connector::with_transport(config, transport.clone());

    let err = connector
        .authoring()
        .unwrap()
        .create_taxonomies(&[TaxonomyDefinition::root("Colors", ["Red", "Blue"])])
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    // Colors and Red both completed; Red was not cut off when Blue failed
    assert_eq!(transport.completed.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Chaos Tests - Transport Failures
// =============================================================================

#[tokio::test]
async fn chaos_transport_flake_is_replayed_once() {
    let inner = hub(&["a"]);
    // Call 1 is the login, call 2 the first search attempt
    let transport = Arc::new(FailingTransport::new(inner.clone(), [2]));
    let connector = Connector::with_transport(credentials(), transport.clone());

    let page = connector.search(&SearchRequest::default()).await.unwrap();

    assert_eq!(page.num_found, 1);
    assert_eq!(transport.calls(), 3);
    assert_eq!(inner.count_matching("/login/v1/basicauth"), 1);
}

#[tokio::test]
async fn chaos_transport_down_propagates_after_replay() {
    let inner = hub(&["a"]);
    let transport = Arc::new(FailingTransport::new(inner.clone(), 2..=10));
    let connector = Connector::with_transport(credentials(), transport.clone());

    let err = connector.get_by_id("a").await.unwrap_err();

    assert!(matches!(err, ConnectorError::Transport(_)));
    assert_eq!(transport.calls(), 3);
    assert_eq!(connector.state(), SessionState::Authenticated);
}

#[tokio::test]
async fn chaos_login_transport_failure_is_shared() {
    let inner = hub(&["a"]);
    let transport = Arc::new(FailingTransport::new(inner, [1]));
    let connector = Connector::with_transport(credentials(), transport.clone());

    let err = connector.search(&SearchRequest::default()).await.unwrap_err();

    // The failed login future is memoized: the replay sees the same error
    assert!(matches!(err, ConnectorError::Login(_)));
    assert_eq!(transport.calls(), 1);
    assert_eq!(connector.state(), SessionState::Failed);
}

// =============================================================================
// Chaos Tests - Session Expiry
// =============================================================================

#[tokio::test]
async fn chaos_concurrent_expiry_recovers_every_caller() {
    let logins = Arc::new(AtomicUsize::new(0));
    let logins_clone = logins.clone();
    let transport = Arc::new(ScriptedTransport::new(move |req| {
        if req.url.ends_with("/login/v1/basicauth") {
            let n = logins_clone.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(TransportResponse::new(200).with_header(
                TENANT_BASE_URL_HEADER,
                format!("https://hub.example.com/api/tenant-{}", n),
            ));
        }
        if req.url.contains("/tenant-1/") {
            return Ok(TransportResponse::new(401));
        }
        Ok(TransportResponse::ok_json(&json!({"numFound": 0, "documents": []})))
    }));
    let connector = Connector::with_transport(credentials(), transport.clone());
    let request = SearchRequest::default();

    let (a, b, c) = tokio::join!(
        connector.search(&request),
        connector.search(&request),
        connector.search(&request)
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    let total_logins = logins.load(Ordering::SeqCst);
    assert!((2..=4).contains(&total_logins), "logins: {}", total_logins);
    assert_eq!(connector.state(), SessionState::Authenticated);
}

// =============================================================================
// Chaos Tests - Garbage Data
// =============================================================================

#[tokio::test]
async fn chaos_undecodable_search_body() {
    let transport = Arc::new(ScriptedTransport::new(|_| {
        Ok(TransportResponse::new(200).with_body("<html>maintenance</html>"))
    }));
    let connector = Connector::with_transport(ConnectorConfig::default(), transport.clone());

    let err = connector.search(&SearchRequest::default()).await.unwrap_err();

    assert!(matches!(err, ConnectorError::Json(_)));
    assert_eq!(transport.len(), 1);
}

#[tokio::test]
async fn chaos_missing_resource_file() {
    let transport = hub(&[]);
    let connector = Connector::with_transport(credentials(), transport.clone());
    let dir = tempfile::tempdir().unwrap();

    let err = connector
        .authoring()
        .unwrap()
        .create_resource(&ResourceUpload::from_path(dir.path().join("gone.png")))
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Io(_)));
    assert!(transport.is_empty());
}

#[test]
fn chaos_malformed_options_degrade_to_defaults() {
    let request = SearchRequest::from_json(&json!({
        "query": 42,
        "rows": "5",
        "start": -3,
        "facet": "tags",
        "isManaged": "yes",
        "override": ["not", "a", "map"]
    }));
    let params = SearchTranslator::translate(&request);

    assert_eq!(params.get("q"), Some(&ParamValue::Text("*:*".into())));
    assert_eq!(params.get("rows"), Some(&ParamValue::Integer(10)));
    assert_eq!(params.get("start"), Some(&ParamValue::Integer(0)));
    assert_eq!(params.get("facet"), Some(&ParamValue::Bool(false)));
    assert!(!params.contains_key("fq"));
    assert!(!params.keys().any(|k| k.starts_with("f.")));
}
