// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Write API, authoring surface only.
//!
//! - `create_resource()` - upload a file with integrity headers
//! - `create_asset()` / `update_asset()` / `delete_asset()`
//! - `delete_assets()` - search-driven bulk delete, per-item statuses
//! - `create_category()` / `delete_category()`
//!
//! Taxonomy builds live in the sibling `taxonomy` module.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{ConnectorError, Result};
use crate::resource::ResourceDigest;
use crate::transport::TransportRequest;

use super::{
    endpoint_url, AssetDefinition, BatchResult, BulkStatus, Connector, DeleteAssetsOptions,
    ResourceUpload,
};

const RESOURCES_PATH: &str = "authoring/v1/resources";
const ASSETS_PATH: &str = "authoring/v1/assets";
const CATEGORIES_PATH: &str = "authoring/v1/categories";
const ASSET_CLASSIFICATION: &str = "classification:asset";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Write operations of an authoring-mode [`Connector`].
#[derive(Clone, Copy)]
pub struct AuthoringCapabilities<'a> {
    pub(super) connector: &'a Connector,
}

impl<'a> AuthoringCapabilities<'a> {
    pub(super) fn new(connector: &'a Connector) -> Self {
        Self { connector }
    }

    /// Upload the file at `upload.path` as a new resource.
    ///
    /// An upload without a path is rejected with
    /// [`ConnectorError::InvalidInput`] before any I/O.
    #[tracing::instrument(skip(self, upload), fields(path = ?upload.path))]
    pub async fn create_resource(&self, upload: &ResourceUpload) -> Result<Value> {
        let Some(path) = upload.path.as_deref() else {
            warn!("Resource upload without a file path");
            return Err(ConnectorError::InvalidInput(
                "resource upload requires a file path".to_string(),
            ));
        };

        let digest = ResourceDigest::from_file(path).await?;
        let name = upload
            .name
            .clone()
            .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "resource".to_string());
        let content_type = upload.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
        let digest = &digest;
        let name = name.as_str();

        let response = self
            .connector
            .dispatcher()
            .dispatch("create_resource", |base| {
                TransportRequest::post(endpoint_url(base, RESOURCES_PATH))
                    .query("name", name)
                    .header("Accept", "application/json")
                    .header("Content-Type", content_type)
                    .header("Content-Length", digest.length.to_string())
                    .header("Digest", digest.header_value())
                    .bytes(digest.bytes.clone())
            })
            .await?;

        info!(name, length = digest.length, "Resource created");
        response.json()
    }

    #[tracing::instrument(skip(self, asset), fields(resource = %asset.resource))]
    pub async fn create_asset(&self, asset: &AssetDefinition) -> Result<Value> {
        let body = asset.to_json();
        let body = &body;
        let response = self
            .connector
            .dispatcher()
            .dispatch("create_asset", |base| {
                TransportRequest::post(endpoint_url(base, ASSETS_PATH))
                    .header("Accept", "application/json")
                    .json(body.clone())
            })
            .await?;
        response.json()
    }

    /// Replace an asset; `asset` must carry its `id`.
    #[tracing::instrument(skip(self, asset))]
    pub async fn update_asset(&self, asset: &Value) -> Result<Value> {
        let id = asset
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ConnectorError::InvalidInput("asset update requires an id".to_string())
            })?;
        let path = item_path(ASSETS_PATH, id);
        let path = path.as_str();

        let response = self
            .connector
            .dispatcher()
            .dispatch("update_asset", |base| {
                TransportRequest::put(endpoint_url(base, path))
                    .header("Accept", "application/json")
                    .json(asset.clone())
            })
            .await?;
        response.json()
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_asset(&self, id: &str) -> Result<()> {
        self.delete_item("delete_asset", ASSETS_PATH, id).await
    }

    /// Delete every asset matching `options`.
    ///
    /// Individual failures become failed [`BulkStatus`] entries; the call
    /// itself fails only when collecting the ids fails.
    #[tracing::instrument(skip(self, options))]
    pub async fn delete_assets(&self, options: &DeleteAssetsOptions) -> Result<Vec<BulkStatus>> {
        let facet_query = match options.facet_query.as_deref() {
            Some(extra) if !extra.is_empty() => format!("{} AND ({})", ASSET_CLASSIFICATION, extra),
            _ => ASSET_CLASSIFICATION.to_string(),
        };
        let page_size = options
            .batch_size
            .unwrap_or_else(|| self.connector.config().effective_batch_size());
        let ids = self
            .connector
            .collect_ids(options.query.as_deref(), &facet_query, page_size)
            .await?;

        let this = *self;
        let statuses = self
            .connector
            .executor()
            .run(ids, move |id| async move {
                match this.delete_asset(&id).await {
                    Ok(()) => {
                        let message = format!("Deleted asset {}", id);
                        BulkStatus::success(id, message)
                    }
                    Err(e) => {
                        let message = format!("Failed to delete asset {}: {}", id, e);
                        BulkStatus::failure(id, message)
                    }
                }
            })
            .await;

        report_batch("delete_assets", &statuses);
        Ok(statuses)
    }

    /// Create a category, under `parent_id` when given. Returns its id.
    #[tracing::instrument(skip(self))]
    pub async fn create_category(&self, name: &str, parent_id: Option<&str>) -> Result<String> {
        let mut body = json!({ "name": name });
        if let Some(parent) = parent_id {
            body["parent"] = json!(parent);
        }
        let body = &body;

        let response = self
            .connector
            .dispatcher()
            .dispatch("create_category", |base| {
                TransportRequest::post(endpoint_url(base, CATEGORIES_PATH))
                    .header("Accept", "application/json")
                    .json(body.clone())
            })
            .await?;

        let created: Value = response.json()?;
        created
            .get("id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                let message = format!("category '{}' created without an id", name);
                ConnectorError::InvalidResponse(message)
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.delete_item("delete_category", CATEGORIES_PATH, id).await
    }

    async fn delete_item(&self, operation: &str, collection: &str, id: &str) -> Result<()> {
        let path = item_path(collection, id);
        let path = path.as_str();
        self.connector
            .dispatcher()
            .dispatch(operation, |base| TransportRequest::delete(endpoint_url(base, path)))
            .await?;
        Ok(())
    }
}

/// `collection/{id}` with the id percent-encoded as one path segment.
fn item_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, urlencoding::encode(id))
}

pub(super) fn report_batch(operation: &str, statuses: &[BulkStatus]) {
    let result = BatchResult::from_statuses(statuses);
    crate::metrics::record_batch(operation, result.total, result.failed);
    if result.is_success() {
        info!(operation, total = result.total, "Bulk operation complete");
    } else {
        warn!(
            operation,
            total = result.total,
            failed = result.failed,
            "Bulk operation finished with failures"
        );
    }
}
