// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the connector.
//!
//! # Example
//!
//! ```
//! use content_hub_connector::{ConnectorConfig, EndpointMode};
//!
//! // Minimal config (anonymous delivery access)
//! let config = ConnectorConfig {
//!     endpoint: EndpointMode::Delivery,
//!     base_url: "https://content.example.com/api".into(),
//!     tenant_id: Some("7b3c".into()),
//!     ..Default::default()
//! };
//! assert_eq!(config.max_connections, 50);
//! assert_eq!(config.concurrency(), 10);
//!
//! // Authoring with credentials
//! let config = ConnectorConfig {
//!     base_url: "https://content.example.com/api".into(),
//!     username: Some("editor@example.com".into()),
//!     password: Some("secret".into()),
//!     ..Default::default()
//! };
//! assert!(config.has_credentials());
//! ```

use serde::Deserialize;

use crate::batching::{BatchExecutor, DEFAULT_BATCH_SIZE};

/// Which API surface the connector talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    /// Read/write API, enables [`crate::AuthoringCapabilities`]
    #[default]
    Authoring,
    /// Read-only published content
    Delivery,
}

impl EndpointMode {
    /// Path segment prefix of this surface (e.g. `authoring/v1`).
    #[must_use]
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Self::Authoring => "authoring/v1",
            Self::Delivery => "delivery/v1",
        }
    }
}

impl std::fmt::Display for EndpointMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authoring => write!(f, "authoring"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

/// Configuration for the connector.
///
/// Without `username`/`password` the connector runs unauthenticated against
/// `base_url` (plus `tenant_id`, when set).
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorConfig {
    /// API surface (default: authoring)
    #[serde(default)]
    pub endpoint: EndpointMode,

    /// Service base URL, used for login and for unauthenticated access
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    /// Tenant id appended to `base_url` when running unauthenticated
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Verify TLS certificates (default: true)
    #[serde(default = "default_reject_unauthorized")]
    pub reject_unauthorized: bool,

    /// Connection pool size; bulk concurrency is derived from it
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Page size used when collecting items for bulk operations
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Log every failed request before it is retried
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_url() -> String { "http://localhost:8080/api".to_string() }
fn default_reject_unauthorized() -> bool { true }
fn default_max_connections() -> usize { 50 }
fn default_batch_size() -> usize { DEFAULT_BATCH_SIZE }

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointMode::default(),
            base_url: default_base_url(),
            username: None,
            password: None,
            tenant_id: None,
            reject_unauthorized: default_reject_unauthorized(),
            max_connections: default_max_connections(),
            batch_size: default_batch_size(),
            verbose: false,
        }
    }
}

impl ConnectorConfig {
    /// Both username and password are configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// In-flight cap for bulk operations: a fifth of the pool, at least 1.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        BatchExecutor::from_pool_size(self.max_connections).concurrency()
    }

    /// Page size for bulk collection, at least 1.
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// URL of the basic-auth login exchange.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/login/v1/basicauth", self.base_url.trim_end_matches('/'))
    }

    /// Base URL used when no login takes place.
    #[must_use]
    pub fn static_base_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.tenant_id.as_deref() {
            Some(tenant) if !tenant.is_empty() => format!("{}/{}", base, tenant),
            _ => base.to_string(),
        }
    }
}
