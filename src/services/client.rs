// src/services/client.rs

//! Endpoint client: single fetches plus index fan-out.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};

use crate::config::ClientConfig;
use crate::error::{FdpResult, Result};
use crate::graph::Graph;
use crate::models::{Catalog, Dataset, Endpoint, FetchOutcome};
use crate::services::extract;
use crate::services::fetch::{GraphFetcher, HttpGraphFetcher};

/// Fetches and extracts endpoint, catalog and dataset records.
#[derive(Clone)]
pub struct FdpClient {
    fetcher: Arc<dyn GraphFetcher>,
    max_concurrent: usize,
}

impl FdpClient {
    /// Create a client that talks HTTP with the given settings.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let fetcher = HttpGraphFetcher::new(config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config.max_concurrent))
    }

    /// Create a client over any graph source.
    pub fn with_fetcher(fetcher: Arc<dyn GraphFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    async fn graph(&self, uri: &str) -> FdpResult<Graph> {
        self.fetcher.fetch_graph(uri).await
    }

    pub async fn fetch_endpoint(&self, uri: &str) -> FdpResult<Endpoint> {
        let graph = self.graph(uri).await?;
        extract::extract_endpoint(&graph, uri)
    }

    pub async fn fetch_catalog(&self, uri: &str, endpoint_uri: &str) -> FdpResult<Catalog> {
        let graph = self.graph(uri).await?;
        extract::extract_catalog(&graph, uri, endpoint_uri)
    }

    pub async fn fetch_dataset(
        &self,
        uri: &str,
        catalog_uri: &str,
        endpoint_uri: &str,
        endpoint_title: &str,
    ) -> FdpResult<Dataset> {
        let graph = self.graph(uri).await?;
        extract::extract_dataset(&graph, uri, catalog_uri, endpoint_uri, endpoint_title)
    }

    /// Linked endpoint URIs of an index. Empty when `index_uri` is a plain
    /// endpoint.
    pub async fn discover_endpoints_from_index(&self, index_uri: &str) -> FdpResult<Vec<String>> {
        let index = self.fetch_endpoint(index_uri).await?;
        if !index.is_index {
            log::info!("{index_uri} links no other endpoints");
        }
        Ok(index.linked_endpoint_uris)
    }

    /// Fetch every endpoint an index links to.
    ///
    /// Only a failure to read the index itself is an error; unreachable
    /// linked endpoints are recorded in the outcome and left out of
    /// `items`, which follow the index's link order.
    pub async fn fetch_all_from_index(&self, index_uri: &str) -> FdpResult<FetchOutcome<Endpoint>> {
        let start = Instant::now();
        let linked = self.discover_endpoints_from_index(index_uri).await?;
        log::info!("Index {index_uri}: {} linked endpoints", linked.len());

        let mut results = stream::iter(linked)
            .map(|uri| async move {
                let result = self.fetch_endpoint(&uri).await;
                (uri, result)
            })
            .buffered(self.max_concurrent);

        let mut outcome = FetchOutcome::default();
        while let Some((uri, result)) = results.next().await {
            match result {
                Ok(endpoint) => outcome.items.push(endpoint),
                Err(error) => outcome.record_failure(uri, error),
            }
        }

        log::info!(
            "Index {index_uri}: {} in {:.2}s",
            outcome.summary(),
            start.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }

    /// Re-fetch an endpoint. Failures come back as an endpoint in the
    /// error state instead of an `Err`.
    pub async fn refresh_endpoint(&self, uri: &str) -> Endpoint {
        match self.fetch_endpoint(uri).await {
            Ok(endpoint) => endpoint,
            Err(error) => {
                log::warn!("Refresh of {uri} failed: {error}");
                Endpoint::failed(uri, &error)
            }
        }
    }

    /// Fetch a catalog and all of its datasets.
    ///
    /// Datasets the catalog document already describes are read from it;
    /// the others are fetched one by one. Items follow the catalog's
    /// dataset order.
    pub async fn fetch_catalog_with_datasets(
        &self,
        catalog_uri: &str,
        endpoint_uri: &str,
        endpoint_title: &str,
    ) -> FdpResult<FetchOutcome<Dataset>> {
        let graph = self.graph(catalog_uri).await?;
        let catalog = extract::extract_catalog(&graph, catalog_uri, endpoint_uri)?;
        log::debug!(
            "Catalog {catalog_uri}: {} datasets",
            catalog.dataset_uris.len()
        );

        let graph = &graph;
        let mut results = stream::iter(catalog.dataset_uris)
            .map(|uri| async move {
                let result = if extract::describes(graph, &uri) {
                    extract::extract_dataset(graph, &uri, catalog_uri, endpoint_uri, endpoint_title)
                } else {
                    self.fetch_dataset(&uri, catalog_uri, endpoint_uri, endpoint_title)
                        .await
                };
                (uri, result)
            })
            .buffered(self.max_concurrent);

        let mut outcome = FetchOutcome::default();
        while let Some((uri, result)) = results.next().await {
            match result {
                Ok(dataset) => outcome.items.push(dataset),
                Err(error) => outcome.record_failure(uri, error),
            }
        }
        Ok(outcome)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::error::FdpError;
    use crate::models::EndpointStatus;
    use crate::services::fetch::testing::StaticFetcher;

    fn client(fetcher: StaticFetcher) -> (FdpClient, Arc<StaticFetcher>) {
        let fetcher = Arc::new(fetcher);
        (FdpClient::with_fetcher(fetcher.clone(), 2), fetcher)
    }

    #[tokio::test]
    async fn test_fetch_endpoint() {
        let (client, _) = client(fetcher());
        let endpoint = client.fetch_endpoint(FDP_A).await.unwrap();
        assert_eq!(endpoint.title, "Climate FDP");
        assert_eq!(endpoint.catalog_uris, vec![CATALOG_A]);
        assert!(endpoint.is_active());
    }

    #[tokio::test]
    async fn test_fetch_endpoint_propagates_error_unchanged() {
        let (client, _) = client(fetcher());
        let err = client.fetch_endpoint(FDP_DOWN).await.unwrap_err();
        assert_eq!(err, FdpError::timeout(FDP_DOWN, 30));
    }

    #[tokio::test]
    async fn test_discover_lists_links_in_order() {
        let (client, _) = client(fetcher());
        let linked = client.discover_endpoints_from_index(INDEX).await.unwrap();
        assert_eq!(linked, vec![FDP_A, FDP_DOWN, FDP_B]);

        let plain = client.discover_endpoints_from_index(FDP_A).await.unwrap();
        assert!(plain.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_from_index_skips_failures_keeps_order() {
        let (client, fetcher) = client(fetcher());
        let outcome = client.fetch_all_from_index(INDEX).await.unwrap();

        let titles: Vec<_> = outcome.items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Climate FDP", "Soil FDP"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].uri, FDP_DOWN);
        assert_eq!(outcome.summary(), "2 of 3 succeeded");
        assert_eq!(fetcher.requests()[0], INDEX);
    }

    #[tokio::test]
    async fn test_fetch_all_from_unreachable_index_fails() {
        let (client, _) = client(StaticFetcher::new());
        let err = client.fetch_all_from_index(INDEX).await.unwrap_err();
        assert!(matches!(err, FdpError::Connection { status: Some(404), .. }));
    }

    #[tokio::test]
    async fn test_refresh_endpoint_never_fails() {
        let (client, _) = client(fetcher());
        let ok = client.refresh_endpoint(FDP_B).await;
        assert_eq!(ok.status, EndpointStatus::Active);

        let failed = client.refresh_endpoint(FDP_DOWN).await;
        assert_eq!(failed.status, EndpointStatus::Error);
        assert!(failed.error_message.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_catalog_with_datasets_reads_inline_and_fetches_rest() {
        let (client, fetcher) = client(fetcher());
        let outcome = client
            .fetch_catalog_with_datasets(CATALOG_A, FDP_A, "Climate FDP")
            .await
            .unwrap();

        let titles: Vec<_> = outcome.items.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Rainfall Atlas", "Temperature Index"]);
        assert_eq!(outcome.items[0].contact_email(), Some("steward@fdp-a.example.org"));
        assert_eq!(outcome.items[0].theme_labels, vec!["Climate"]);
        assert_eq!(outcome.items[1].parent_endpoint_title, "Climate FDP");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].uri, "https://fdp-a.example.org/dataset/missing");

        let requests = fetcher.requests();
        assert!(!requests.iter().any(|r| r.ends_with("/dataset/rain")));
        assert!(requests.iter().any(|r| r.ends_with("/dataset/temp")));
    }

    #[tokio::test]
    async fn test_catalog_fetch_failure_is_error() {
        let (client, _) = client(fetcher());
        let err = client
            .fetch_catalog_with_datasets("https://fdp-a.example.org/catalog/none", FDP_A, "Climate FDP")
            .await
            .unwrap_err();
        assert_eq!(err.uri(), "https://fdp-a.example.org/catalog/none");
    }

    #[tokio::test]
    async fn test_fetch_catalog_and_dataset() {
        let (client, _) = client(fetcher());
        let catalog = client.fetch_catalog(CATALOG_B, FDP_B).await.unwrap();
        assert_eq!(catalog.title, "Soil");
        assert_eq!(catalog.theme_uris, vec!["http://ex.org/theme/soil"]);

        let dataset = client
            .fetch_dataset(
                "https://fdp-a.example.org/dataset/temp",
                CATALOG_A,
                FDP_A,
                "Climate FDP",
            )
            .await
            .unwrap();
        assert_eq!(dataset.title, "Temperature Index");
        assert_eq!(dataset.parent_catalog_uri, CATALOG_A);
    }
}
