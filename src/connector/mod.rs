// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Connector facade.
//!
//! The [`Connector`] ties the pieces together:
//! - search translation for every query
//! - the session manager supplying the base URL
//! - the dispatcher replaying failed requests once
//! - the batch executor for bulk operations
//!
//! Read operations live on the connector itself. Write operations live on
//! [`AuthoringCapabilities`], handed out by [`Connector::authoring`] only
//! when the connector targets the authoring API.
//!
//! # Example
//!
//! ```rust,no_run
//! use content_hub_connector::{Connector, ConnectorConfig, SearchRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> content_hub_connector::Result<()> {
//! let connector = Connector::new(ConnectorConfig {
//!     base_url: "https://content.example.com/api".into(),
//!     username: Some("editor@example.com".into()),
//!     password: Some("secret".into()),
//!     ..Default::default()
//! })?;
//!
//! let page = connector.search(&SearchRequest::new("name:hero*").rows(20)).await?;
//! println!("{} matches", page.num_found);
//!
//! let authoring = connector.authoring()?;
//! authoring.delete_asset("1f4e").await?;
//! # Ok(())
//! # }
//! ```

mod types;
mod api;
mod authoring;
mod taxonomy;

pub use authoring::AuthoringCapabilities;
pub use types::{
    AssetDefinition, BatchResult, BulkStatus, DeleteAssetsOptions, DeleteTaxonomiesOptions,
    ResourceUpload, SearchResponse, TaxonomyDefinition, TaxonomyIds,
};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::batching::BatchExecutor;
use crate::config::{ConnectorConfig, EndpointMode};
use crate::error::{ConnectorError, Result};
use crate::resilience::Dispatcher;
use crate::session::{SessionManager, SessionState};
use crate::transport::{HttpTransport, Transport};

/// Client for one content hub tenant.
pub struct Connector {
    config: ConnectorConfig,
    session: Arc<SessionManager>,
    dispatcher: Dispatcher,
    executor: BatchExecutor,
}

impl Connector {
    /// Create a connector over the reqwest transport. No request is sent
    /// until the first operation.
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a connector over any transport.
    pub fn with_transport(config: ConnectorConfig, transport: Arc<dyn Transport>) -> Self {
        let session = Arc::new(SessionManager::new(&config, transport.clone()));
        let dispatcher = Dispatcher::new(transport, session.clone(), config.verbose);
        let executor = BatchExecutor::from_pool_size(config.max_connections);

        info!(
            endpoint = %config.endpoint,
            authenticated = session.uses_login(),
            concurrency = executor.concurrency(),
            "Connector created"
        );

        Self { config, session, dispatcher, executor }
    }

    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Get current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Get a receiver to watch session state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<SessionState> {
        self.session.state_receiver()
    }

    /// Write operations; only available against the authoring API.
    pub fn authoring(&self) -> Result<AuthoringCapabilities<'_>> {
        match self.config.endpoint {
            EndpointMode::Authoring => Ok(AuthoringCapabilities::new(self)),
            EndpointMode::Delivery => Err(ConnectorError::AuthoringRequired),
        }
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub(crate) fn executor(&self) -> &BatchExecutor {
        &self.executor
    }
}

/// Join the session base URL and an API path.
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
