// src/pipeline/browse.rs

//! Dataset browsing: aggregate, then filter and search.

use crate::error::Result;
use crate::models::{Dataset, FetchOutcome};
use crate::services::DatasetService;

/// Filters applied after aggregation, in field order.
#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    pub theme: Option<String>,
    pub keyword: Option<String>,
    pub search: Option<String>,
}

impl BrowseQuery {
    /// Apply the theme filter, keyword filter and ranked search that are set.
    pub fn apply(&self, datasets: &[Dataset]) -> Vec<Dataset> {
        let mut selected = datasets.to_vec();
        if let Some(theme) = &self.theme {
            selected = DatasetService::filter_by_theme(&selected, theme);
        }
        if let Some(keyword) = &self.keyword {
            selected = DatasetService::filter_by_keyword(&selected, keyword);
        }
        if let Some(query) = &self.search {
            selected = DatasetService::search(&selected, query);
        }
        selected
    }
}

/// Aggregate datasets from `endpoints` and narrow them with `query`.
///
/// Failures are carried through unchanged so the caller can report them.
pub async fn run_browse(
    service: &DatasetService,
    endpoints: &[String],
    query: &BrowseQuery,
) -> Result<FetchOutcome<Dataset>> {
    let outcome = service.get_all_datasets(endpoints).await?;
    let total = outcome.items.len();
    let items = query.apply(&outcome.items);
    log::info!("{} of {} datasets match", items.len(), total);

    Ok(FetchOutcome {
        items,
        failures: outcome.failures,
    })
}
