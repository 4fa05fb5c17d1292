// src/services/fetch.rs

//! Content-negotiated retrieval of metadata documents.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::{FdpError, FdpResult, Result};
use crate::graph::{Graph, RdfFormat, parse};

/// Source of parsed metadata graphs.
///
/// One call, one attempt: retries and batching belong to the caller.
#[async_trait]
pub trait GraphFetcher: Send + Sync {
    async fn fetch_graph(&self, uri: &str) -> FdpResult<Graph>;
}

/// Fetches graphs over HTTP(S).
pub struct HttpGraphFetcher {
    client: Client,
    accept: String,
    timeout_secs: u64,
}

impl HttpGraphFetcher {
    /// Create a fetcher with the given client settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            accept: RdfFormat::accept_header(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn classify(&self, uri: &str, error: reqwest::Error) -> FdpError {
        if error.is_timeout() {
            FdpError::timeout(uri, self.timeout_secs)
        } else {
            FdpError::connection(uri, error.status().map(|s| s.as_u16()), error)
        }
    }
}

#[async_trait]
impl GraphFetcher for HttpGraphFetcher {
    async fn fetch_graph(&self, uri: &str) -> FdpResult<Graph> {
        log::debug!("GET {uri}");
        let response = self
            .client
            .get(uri)
            .header(ACCEPT, &self.accept)
            .send()
            .await
            .map_err(|e| self.classify(uri, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FdpError::connection(
                uri,
                Some(status.as_u16()),
                format!("HTTP {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(|e| self.classify(uri, e))?;

        let preferred = RdfFormat::from_content_type(&content_type);
        let (graph, format) =
            parse::parse_any(&body, preferred, uri).map_err(|message| FdpError::syntax(uri, message))?;
        log::debug!("{uri}: {} triples ({format:?})", graph.len());
        Ok(graph)
    }
}
