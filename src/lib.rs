// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Content Hub Connector
//!
//! A client for a hosted content repository's search-based API: content
//! lookup, resource and asset upload, category and taxonomy management.
//! Session handling and request replay stay out of the caller's way.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Connector (facade)                      │
//! │  • search / get_by_id / get_by_path                        │
//! │  • authoring(): assets, resources, categories, taxonomies  │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼
//! ┌───────────────────────┐         ┌───────────────────────────┐
//! │   SearchTranslator    │         │      BatchExecutor        │
//! │  • request → q/fq/... │         │  • ≤ K actions in flight  │
//! │  • escape_special_... │         │  • results in input order │
//! └───────────────────────┘         └───────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                           │
//! │  • one attempt, one recovery action, one replay            │
//! │  • 401 → re-authenticate before the replay                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SessionManager                         │
//! │  • memoized login future → tenant base URL                 │
//! │  • replaced wholesale on re-authentication                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                 Transport (reqwest / scripted)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use content_hub_connector::{Connector, ConnectorConfig, SearchRequest, TaxonomyDefinition};
//!
//! #[tokio::main]
//! async fn main() -> content_hub_connector::Result<()> {
//!     let connector = Connector::new(ConnectorConfig {
//!         base_url: "https://content.example.com/api".into(),
//!         username: Some("editor@example.com".into()),
//!         password: Some("secret".into()),
//!         ..Default::default()
//!     })?;
//!
//!     // Lookups (the first call logs in)
//!     if let Some(doc) = connector.get_by_path("/dxdam/hero.jpg").await? {
//!         println!("Found: {}", doc["id"]);
//!     }
//!
//!     // Build a category tree
//!     let ids = connector
//!         .authoring()?
//!         .create_taxonomies(&[
//!             TaxonomyDefinition::root("Colors", ["Red", "Blue"]),
//!             TaxonomyDefinition::attach("Colors", ["Green"]),
//!         ])
//!         .await?;
//!     println!("Created {} categories", ids.len());
//!
//!     let page = connector.search(&SearchRequest::new("name:hero*")).await?;
//!     println!("{} matches", page.num_found);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See [`ConnectorConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`connector`]: The [`Connector`] facade and [`AuthoringCapabilities`]
//! - [`search`]: Search request model and parameter translation
//! - [`session`]: Lazy, memoized login and re-authentication
//! - [`resilience`]: Single-replay dispatch
//! - [`batching`]: Bounded-concurrency batch executor
//! - [`transport`]: Transport trait, reqwest and scripted implementations
//! - [`resource`]: Upload digests

pub mod config;
pub mod error;
pub mod transport;
pub mod search;
pub mod session;
pub mod resilience;
pub mod batching;
pub mod resource;
pub mod connector;
pub mod metrics;

pub use config::{ConnectorConfig, EndpointMode};
pub use error::{ConnectorError, Result};
pub use connector::{
    AssetDefinition, AuthoringCapabilities, BatchResult, BulkStatus, Connector,
    DeleteAssetsOptions, DeleteTaxonomiesOptions, ResourceUpload, SearchResponse,
    TaxonomyDefinition, TaxonomyIds,
};
pub use search::{
    escape_special_chars, ParamValue, ProtocolParameters, SearchRequest, SearchTranslator,
};
pub use session::{SessionManager, SessionState};
pub use resilience::{Dispatcher, RetryPolicy};
pub use batching::BatchExecutor;
pub use transport::{
    HttpTransport, ScriptedTransport, Transport, TransportRequest, TransportResponse,
};
pub use resource::ResourceDigest;
pub use metrics::LatencyTimer;
