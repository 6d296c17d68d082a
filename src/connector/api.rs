// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Read API: search and lookups.
//!
//! - `search()` - translated faceted search on the configured API surface
//! - `get_by_id()` / `get_by_path()` - single-document lookups
//! - `collect_ids()` - paged id collection feeding the bulk deletes

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::search::{escape_special_chars, SearchRequest, SearchTranslator};
use crate::transport::TransportRequest;

use super::{endpoint_url, Connector, SearchResponse};

impl Connector {
    /// Run a search against `{endpoint}/v1/search`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use content_hub_connector::{Connector, SearchRequest, search::Facet};
    /// # async fn example(connector: &Connector) -> content_hub_connector::Result<()> {
    /// let request = SearchRequest::new("*:*")
    ///     .facet_query("classification:asset")
    ///     .facet(Facet::on_fields(["tags"]).limit(25))
    ///     .managed(true);
    /// let page = connector.search(&request).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.config.endpoint))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let pairs = SearchTranslator::translate(request).to_query_pairs();
        let path = format!("{}/search", self.config.endpoint.api_prefix());
        let pairs = &pairs;
        let path = path.as_str();

        let response = self
            .dispatcher
            .dispatch("search", |base| {
                TransportRequest::get(endpoint_url(base, path))
                    .query_pairs(pairs.clone())
                    .header("Accept", "application/json")
            })
            .await?;

        let page: SearchResponse = response.json()?;
        debug!(num_found = page.num_found, returned = page.documents.len(), "Search complete");
        Ok(page)
    }

    /// First document whose `id` equals `id`, if any.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Value>> {
        self.lookup("id", id).await
    }

    /// First document whose `path` equals `path`, if any.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_path(&self, path: &str) -> Result<Option<Value>> {
        self.lookup("path", path).await
    }

    async fn lookup(&self, field: &str, value: &str) -> Result<Option<Value>> {
        let query = format!("{}:{}", field, escape_special_chars(value));
        let page = self.search(&SearchRequest::new(query).rows(1)).await?;
        Ok(page.documents.into_iter().next())
    }

    /// Ids of every document matching `query` and `facet_query`, fetched
    /// `page_size` at a time.
    pub(crate) async fn collect_ids(
        &self,
        query: Option<&str>,
        facet_query: &str,
        page_size: usize,
    ) -> Result<Vec<String>> {
        let rows = u32::try_from(page_size.max(1)).unwrap_or(u32::MAX);
        let mut ids = Vec::new();
        let mut start: u64 = 0;

        loop {
            let mut request = SearchRequest::all()
                .fields("id")
                .facet_query(facet_query)
                .start(start)
                .rows(rows);
            request.query = query.map(String::from);

            let page = self.search(&request).await?;
            let returned = page.documents.len() as u64;
            ids.extend(page.ids().map(String::from));
            start += returned;

            if returned == 0 || start >= page.num_found {
                break;
            }
        }

        debug!(count = ids.len(), facet_query, "Collected ids");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectorConfig, EndpointMode};
    use crate::transport::{ScriptedTransport, TransportResponse};
    use serde_json::json;
    use std::sync::Arc;

    fn anonymous(endpoint: EndpointMode) -> ConnectorConfig {
        ConnectorConfig {
            endpoint,
            base_url: "https://hub.example.com/api".into(),
            tenant_id: Some("t1".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_sends_translated_params() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(TransportResponse::ok_json(&json!({"numFound": 1, "documents": [{"id": "a"}]})))
        }));
        let connector =
            Connector::with_transport(anonymous(EndpointMode::Delivery), transport.clone());

        let page = connector
            .search(&SearchRequest::default().facet_query("classification:asset").managed(true))
            .await
            .unwrap();
        assert_eq!(page.num_found, 1);

        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://hub.example.com/api/t1/delivery/v1/search");
        assert_eq!(request.query_value("q"), Some("*:*"));
        assert_eq!(request.query_value("facet"), Some("false"));
        assert_eq!(
            request.query_values("fq"),
            vec!["classification:asset", "isManaged:(\"true\")"]
        );
    }

    #[tokio::test]
    async fn test_get_by_id_escapes_and_limits() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(TransportResponse::ok_json(&json!({"numFound": 0, "documents": []})))
        }));
        let connector =
            Connector::with_transport(anonymous(EndpointMode::Authoring), transport.clone());

        assert_eq!(connector.get_by_id("a:b c").await.unwrap(), None);

        let request = &transport.requests()[0];
        assert!(request.url.ends_with("/authoring/v1/search"));
        assert_eq!(request.query_value("q"), Some("id:a\\:b\\ c"));
        assert_eq!(request.query_value("rows"), Some("1"));
    }

    #[tokio::test]
    async fn test_get_by_path_returns_first_document() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(TransportResponse::ok_json(&json!({
                "numFound": 1,
                "documents": [{"id": "x", "path": "/dxdam/hero.jpg"}]
            })))
        }));
        let connector =
            Connector::with_transport(anonymous(EndpointMode::Delivery), transport.clone());

        let doc = connector.get_by_path("/dxdam/hero.jpg").await.unwrap().unwrap();
        assert_eq!(doc["id"], "x");
        assert_eq!(
            transport.requests()[0].query_value("q"),
            Some("path:\\/dxdam\\/hero.jpg")
        );
    }

    #[tokio::test]
    async fn test_collect_ids_pages_until_num_found() {
        let transport = Arc::new(ScriptedTransport::new(|req| {
            let start: usize = req.query_value("start").unwrap().parse().unwrap();
            let rows: usize = req.query_value("rows").unwrap().parse().unwrap();
            let docs: Vec<_> = (start..(start + rows).min(5))
                .map(|i| json!({"id": format!("id-{}", i)}))
                .collect();
            Ok(TransportResponse::ok_json(&json!({"numFound": 5, "documents": docs})))
        }));
        let connector =
            Connector::with_transport(anonymous(EndpointMode::Authoring), transport.clone());

        let ids = connector.collect_ids(None, "classification:asset", 2).await.unwrap();
        assert_eq!(ids, vec!["id-0", "id-1", "id-2", "id-3", "id-4"]);
        assert_eq!(transport.len(), 3);
        assert_eq!(transport.requests()[0].query_value("fl"), Some("id"));
    }
}
