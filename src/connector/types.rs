// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the connector facade.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub documents: Vec<Value>,
    /// Raw facet block, present when faceting was requested
    #[serde(default, rename = "facet_counts")]
    pub facet_counts: Option<Value>,
}

impl SearchResponse {
    /// `id` members of the returned documents, skipping documents without one.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents
            .iter()
            .filter_map(|doc| doc.get("id").and_then(Value::as_str))
    }
}

/// Per-item outcome of a delete-class bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkStatus {
    pub id: String,
    pub succeeded: bool,
    /// Human-readable outcome
    pub message: String,
}

impl BulkStatus {
    pub(crate) fn success(id: String, message: String) -> Self {
        Self { id, succeeded: true, message }
    }

    pub(crate) fn failure(id: String, message: String) -> Self {
        Self { id, succeeded: false, message }
    }
}

impl std::fmt::Display for BulkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Total items in the batch
    pub total: usize,
    /// Successfully processed items
    pub succeeded: usize,
    /// Failed items
    pub failed: usize,
}

impl BatchResult {
    /// Check if all items succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn from_statuses(statuses: &[BulkStatus]) -> Self {
        let succeeded = statuses.iter().filter(|s| s.succeeded).count();
        Self {
            total: statuses.len(),
            succeeded,
            failed: statuses.len() - succeeded,
        }
    }
}

/// A file to upload as a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceUpload {
    /// Required; an upload without a path is rejected
    pub path: Option<PathBuf>,
    /// Resource name (default: the file name)
    pub name: Option<String>,
    /// Default: `application/octet-stream`
    pub content_type: Option<String>,
}

impl ResourceUpload {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()), ..Default::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Asset metadata pointing at an uploaded resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDefinition {
    /// Id of the backing resource
    pub resource: String,
    pub name: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub category_ids: Vec<String>,
}

impl AssetDefinition {
    pub fn new(resource: impl Into<String>) -> Self {
        Self { resource: resource.into(), ..Default::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn category_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Wire body. Tags travel as `{"values": [...]}`.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("resource".into(), json!(self.resource));
        body.insert("tags".into(), json!({ "values": self.tags }));
        if let Some(name) = &self.name {
            body.insert("name".into(), json!(name));
        }
        if let Some(path) = &self.path {
            body.insert("path".into(), json!(path));
        }
        if let Some(description) = &self.description {
            body.insert("description".into(), json!(description));
        }
        if !self.category_ids.is_empty() {
            body.insert("categoryIds".into(), json!(self.category_ids));
        }
        Value::Object(body)
    }
}

/// Selects the assets removed by a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteAssetsOptions {
    /// Default: match all
    pub query: Option<String>,
    /// Extra filter clause, AND-ed with the asset classification filter
    pub facet_query: Option<String>,
    /// Page size when collecting ids (default: configured batch size)
    pub batch_size: Option<usize>,
}

/// Selects the taxonomies removed by a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteTaxonomiesOptions {
    /// Default: match all
    pub query: Option<String>,
    pub batch_size: Option<usize>,
}

/// One step of a taxonomy build.
///
/// JSON forms: `{"name": "Colors", "childs": ["Red"]}` creates a root and
/// its children; `{"parent": "Colors", "childs": ["Green"]}` attaches
/// children to a node created by an earlier step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyDefinition {
    Root {
        name: String,
        #[serde(default)]
        childs: Vec<String>,
    },
    Attach {
        parent: String,
        #[serde(default)]
        childs: Vec<String>,
    },
}

impl TaxonomyDefinition {
    pub fn root<I, S>(name: impl Into<String>, childs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Root {
            name: name.into(),
            childs: childs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attach<I, S>(parent: impl Into<String>, childs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Attach {
            parent: parent.into(),
            childs: childs.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn childs(&self) -> &[String] {
        match self {
            Self::Root { childs, .. } | Self::Attach { childs, .. } => childs,
        }
    }
}

/// Category name → id, recorded while building taxonomies. A later node
/// with the same name shadows the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyIds {
    ids: BTreeMap<String, String>,
}

impl TaxonomyIds {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub(crate) fn record(&mut self, name: String, id: String) {
        self.ids.insert(name, id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
