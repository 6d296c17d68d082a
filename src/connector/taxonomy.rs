// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Taxonomy builds and bulk taxonomy deletes.
//!
//! Definitions are applied in input order, parents before the children
//! that reference them:
//!
//! ```text
//! {name: "Colors", childs: [Red, Blue]}   → create Colors, then Red + Blue under it
//! {parent: "Colors", childs: [Green]}     → look up Colors, create Green under it
//! ```
//!
//! Children of one definition are created concurrently and fail fast: the
//! first failure aborts the build once the creations already sent settle.

use tracing::{debug, info};

use crate::error::{ConnectorError, Result};

use super::authoring::report_batch;
use super::{
    AuthoringCapabilities, BulkStatus, DeleteTaxonomiesOptions, TaxonomyDefinition, TaxonomyIds,
};

const TAXONOMY_CLASSIFICATION: &str = "classification:taxonomy";

impl<'a> AuthoringCapabilities<'a> {
    /// Build category trees from `definitions`.
    ///
    /// A `parent` that no earlier definition created fails with
    /// [`ConnectorError::UnresolvedParent`].
    #[tracing::instrument(skip(self, definitions), fields(definitions = definitions.len()))]
    pub async fn create_taxonomies(
        &self,
        definitions: &[TaxonomyDefinition],
    ) -> Result<TaxonomyIds> {
        let mut ids = TaxonomyIds::default();

        for definition in definitions {
            let parent_id = match definition {
                TaxonomyDefinition::Root { name, .. } => {
                    let id = self.create_category(name, None).await?;
                    debug!(name = %name, id = %id, "Taxonomy root created");
                    ids.record(name.clone(), id.clone());
                    id
                }
                TaxonomyDefinition::Attach { parent, .. } => ids
                    .get(parent)
                    .map(String::from)
                    .ok_or_else(|| ConnectorError::UnresolvedParent(parent.clone()))?,
            };

            let this = *self;
            let parent_ref = parent_id.as_str();
            let children = self
                .connector
                .executor()
                .try_run(definition.childs(), move |child| async move {
                    let id = this.create_category(child, Some(parent_ref)).await?;
                    Ok::<_, ConnectorError>((child.clone(), id))
                })
                .await?;

            for (name, id) in children {
                ids.record(name, id);
            }
        }

        info!(categories = ids.len(), "Taxonomies created");
        Ok(ids)
    }

    /// Delete every taxonomy matching `options`, one status per taxonomy.
    #[tracing::instrument(skip(self, options))]
    pub async fn delete_taxonomies(
        &self,
        options: &DeleteTaxonomiesOptions,
    ) -> Result<Vec<BulkStatus>> {
        let page_size = options
            .batch_size
            .unwrap_or_else(|| self.connector.config().effective_batch_size());
        let ids = self
            .connector
            .collect_ids(options.query.as_deref(), TAXONOMY_CLASSIFICATION, page_size)
            .await?;

        let this = *self;
        let statuses = self
            .connector
            .executor()
            .run(ids, move |id| async move {
                match this.delete_category(&id).await {
                    Ok(()) => {
                        let message = format!("Deleted taxonomy {}", id);
                        BulkStatus::success(id, message)
                    }
                    Err(e) => {
                        let message = format!("Failed to delete taxonomy {}: {}", id, e);
                        BulkStatus::failure(id, message)
                    }
                }
            })
            .await;

        report_batch("delete_taxonomies", &statuses);
        Ok(statuses)
    }
}
