// src/pipeline/discover.rs

//! Endpoint discovery.

use crate::error::Result;
use crate::models::{Endpoint, FetchOutcome};
use crate::services::FdpClient;

/// Fetch every endpoint linked from an index.
pub async fn run_discover(client: &FdpClient, index_uri: &str) -> Result<FetchOutcome<Endpoint>> {
    log::info!("Discovering endpoints from {index_uri}");
    let outcome = client.fetch_all_from_index(index_uri).await?;
    for failure in &outcome.failures {
        log::debug!("  {}: {}", failure.error.reason(), failure.uri);
    }
    Ok(outcome)
}

/// Endpoint URIs to aggregate: `endpoints` first, then the links of each
/// index, without duplicates.
///
/// An unreachable index is logged and skipped.
pub async fn resolve_endpoints(
    client: &FdpClient,
    endpoints: &[String],
    indexes: &[String],
) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::new();
    for uri in endpoints {
        push_distinct(&mut resolved, uri);
    }
    for index in indexes {
        match client.discover_endpoints_from_index(index).await {
            Ok(linked) => {
                log::info!("Index {index}: {} linked endpoints", linked.len());
                for uri in &linked {
                    push_distinct(&mut resolved, uri);
                }
            }
            Err(error) => log::warn!("Skipping index {index}: {error}"),
        }
    }
    resolved
}

/// Publishers disagree on trailing slashes, so compare without them.
fn push_distinct(resolved: &mut Vec<String>, uri: &str) {
    let key = uri.trim_end_matches('/');
    if !resolved.iter().any(|known| known.trim_end_matches('/') == key) {
        resolved.push(uri.to_string());
    }
}
