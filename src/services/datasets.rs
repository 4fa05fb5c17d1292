// src/services/datasets.rs

//! Dataset aggregation across endpoints, filtering and ranked search.

use std::collections::HashMap;
use std::time::Instant;

use futures::stream::{self, StreamExt};

use crate::error::FdpResult;
use crate::models::{Dataset, Endpoint, FetchOutcome, Theme};
use crate::services::client::FdpClient;

/// Search tier of a match: lower ranks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Title = 1,
    Description = 2,
    Keyword = 3,
}

/// Aggregates datasets from many endpoints and searches them.
pub struct DatasetService {
    client: FdpClient,
}

impl DatasetService {
    pub fn new(client: FdpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FdpClient {
        &self.client
    }

    /// Collect every dataset from every endpoint's catalogs.
    ///
    /// Items are ordered by endpoint, then catalog, then the catalog's
    /// dataset order. Unreachable endpoints, catalogs and datasets are
    /// recorded and skipped. Returns the first endpoint error only when no
    /// endpoint at all could be read.
    pub async fn get_all_datasets(&self, endpoint_uris: &[String]) -> FdpResult<FetchOutcome<Dataset>> {
        let start = Instant::now();
        let concurrency = self.client.max_concurrent();
        let mut outcome = FetchOutcome::default();

        let mut endpoint_results = stream::iter(endpoint_uris)
            .map(|uri| async move { (uri, self.client.fetch_endpoint(uri).await) })
            .buffered(concurrency);

        let mut endpoints: Vec<Endpoint> = Vec::new();
        let mut first_error = None;
        while let Some((uri, result)) = endpoint_results.next().await {
            match result {
                Ok(endpoint) => endpoints.push(endpoint),
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(error.clone());
                    }
                    outcome.record_failure(uri.as_str(), error);
                }
            }
        }

        if endpoints.is_empty() {
            if let Some(error) = first_error {
                log::error!("None of {} endpoints could be reached", endpoint_uris.len());
                return Err(error);
            }
        }

        let catalog_jobs: Vec<(&Endpoint, &str)> = endpoints
            .iter()
            .flat_map(|endpoint| {
                endpoint
                    .catalog_uris
                    .iter()
                    .map(move |catalog| (endpoint, catalog.as_str()))
            })
            .collect();

        let mut catalog_results = stream::iter(catalog_jobs)
            .map(|(endpoint, catalog_uri)| async move {
                let result = self
                    .client
                    .fetch_catalog_with_datasets(catalog_uri, &endpoint.uri, &endpoint.title)
                    .await;
                (catalog_uri, result)
            })
            .buffered(concurrency);

        while let Some((catalog_uri, result)) = catalog_results.next().await {
            match result {
                Ok(datasets) => outcome.absorb(datasets),
                Err(error) => outcome.record_failure(catalog_uri, error),
            }
        }

        log::info!(
            "Aggregated {} datasets from {} endpoints ({} failures) in {:.2}s",
            outcome.items.len(),
            endpoints.len(),
            outcome.failures.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(outcome)
    }

    /// Datasets carrying `theme_uri`, in input order.
    pub fn filter_by_theme(datasets: &[Dataset], theme_uri: &str) -> Vec<Dataset> {
        datasets
            .iter()
            .filter(|d| d.has_theme(theme_uri))
            .cloned()
            .collect()
    }

    /// Datasets whose title, description or a keyword contains `keyword`,
    /// ignoring case. Input order is kept.
    pub fn filter_by_keyword(datasets: &[Dataset], keyword: &str) -> Vec<Dataset> {
        let needle = keyword.to_lowercase();
        datasets
            .iter()
            .filter(|d| match_tier(d, &needle).is_some())
            .cloned()
            .collect()
    }

    /// Ranked free-text search.
    ///
    /// Title matches come first, then description matches, then datasets
    /// matching only by keyword. Each dataset is ranked by its best match
    /// and ties keep input order. The query is matched as given, spaces
    /// included; an empty query returns the input as is.
    pub fn search(datasets: &[Dataset], query: &str) -> Vec<Dataset> {
        if query.is_empty() {
            return datasets.to_vec();
        }
        let needle = query.to_lowercase();

        let mut ranked: Vec<(MatchTier, &Dataset)> = datasets
            .iter()
            .filter_map(|d| match_tier(d, &needle).map(|tier| (tier, d)))
            .collect();
        ranked.sort_by_key(|(tier, _)| *tier);
        ranked.into_iter().map(|(_, d)| d.clone()).collect()
    }

    /// Distinct themes across `datasets`, in first-seen order, with the
    /// number of datasets carrying each.
    pub fn get_available_themes(datasets: &[Dataset]) -> Vec<Theme> {
        let mut themes: Vec<Theme> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for dataset in datasets {
            for (uri, label) in dataset.themes() {
                match positions.get(uri) {
                    Some(&i) => themes[i].count += 1,
                    None => {
                        positions.insert(uri, themes.len());
                        themes.push(Theme {
                            uri: uri.to_string(),
                            label: label.to_string(),
                            count: 1,
                        });
                    }
                }
            }
        }
        themes
    }
}

/// Best tier at which `needle` (already lowercased) matches the dataset.
fn match_tier(dataset: &Dataset, needle: &str) -> Option<MatchTier> {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    if contains(dataset.title.as_str()) {
        Some(MatchTier::Title)
    } else if dataset.description.as_deref().is_some_and(|d| contains(d)) {
        Some(MatchTier::Description)
    } else if dataset.keywords.iter().any(|k| contains(k.as_str())) {
        Some(MatchTier::Keyword)
    } else {
        None
    }
}
