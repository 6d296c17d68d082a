// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! reqwest-backed [`Transport`].
//!
//! One `HttpTransport` per connector: the cookie jar carries the session
//! cookie set by the login exchange.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::{Method, RequestBody, Transport, TransportRequest, TransportResponse};
use crate::config::ConnectorConfig;
use crate::error::Result;

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the HTTP client from connector settings.
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(!config.reject_unauthorized)
            .pool_max_idle_per_host(config.max_connections.max(1))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client (tests, custom TLS setups).
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some((username, password)) = &request.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Bytes(bytes) => builder.body(bytes.clone()),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(
            method = %request.method,
            url = %request.url,
            status,
            bytes = body.len(),
            "HTTP exchange"
        );

        Ok(TransportResponse { status, headers, body })
    }
}
