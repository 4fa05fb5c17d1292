// src/services/extract.rs

//! Materializes typed records from endpoint metadata graphs.
//!
//! Every function here is pure. Optional predicates that are missing leave
//! the field empty; only an unresolvable URI or title is an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{FdpError, FdpResult};
use crate::graph::vocab::{self, dcat, dct, fdp, vcard};
use crate::graph::{Graph, Term};
use crate::models::{Catalog, ContactPoint, Dataset, Endpoint, EndpointStatus};
use crate::utils::{strip_mailto, uri_fragment};

/// Read an endpoint description, detecting whether it is an index.
pub fn extract_endpoint(graph: &Graph, self_uri: &str) -> FdpResult<Endpoint> {
    let subject = subject_for(graph, self_uri)?;
    let title = required_title(graph, &subject, self_uri)?;

    let catalog_uris = vocab::CATALOG_LINKS
        .iter()
        .map(|predicate| graph.iri_objects(&subject, predicate))
        .find(|uris| !uris.is_empty())
        .unwrap_or_default();

    let linked_endpoint_uris = graph.iri_objects(&subject, fdp::METADATA_SERVICE);

    Ok(Endpoint {
        uri: self_uri.to_string(),
        title,
        description: graph.literal_value(&subject, dct::DESCRIPTION),
        publisher: graph.literal_value(&subject, dct::PUBLISHER),
        is_index: graph.has(&subject, fdp::METADATA_SERVICE),
        catalog_uris,
        linked_endpoint_uris,
        last_fetched: Some(Utc::now()),
        status: EndpointStatus::Active,
        error_message: None,
    })
}

/// Read a catalog and the themes used across it.
pub fn extract_catalog(graph: &Graph, uri: &str, parent_endpoint_uri: &str) -> FdpResult<Catalog> {
    let subject = subject_for(graph, uri)?;
    let title = required_title(graph, &subject, uri)?;
    let dataset_uris = graph.iri_objects(&subject, dcat::DATASET);

    let mut theme_uris = Vec::new();
    let catalog_themes = graph
        .iri_objects(&subject, dcat::THEME_TAXONOMY)
        .into_iter()
        .chain(graph.iri_objects(&subject, dcat::THEME));
    let member_themes = dataset_uris.iter().flat_map(|dataset_uri| {
        let member = graph.resolve_subject(dataset_uri);
        graph.iri_objects(&member, dcat::THEME)
    });
    for theme in catalog_themes.chain(member_themes) {
        push_unique(&mut theme_uris, theme);
    }

    Ok(Catalog {
        uri: uri.to_string(),
        title,
        description: graph.literal_value(&subject, dct::DESCRIPTION),
        publisher: graph.literal_value(&subject, dct::PUBLISHER),
        parent_endpoint_uri: parent_endpoint_uri.to_string(),
        dataset_uris,
        theme_uris,
    })
}

/// Read a dataset with its themes, keywords and contact point.
pub fn extract_dataset(
    graph: &Graph,
    uri: &str,
    catalog_uri: &str,
    endpoint_uri: &str,
    endpoint_title: &str,
) -> FdpResult<Dataset> {
    let subject = subject_for(graph, uri)?;
    let title = required_title(graph, &subject, uri)?;

    let mut theme_uris = Vec::new();
    for theme in graph.iri_objects(&subject, dcat::THEME) {
        push_unique(&mut theme_uris, theme);
    }
    let theme_labels = theme_uris
        .iter()
        .map(|theme| {
            graph
                .node_label(&Term::iri(theme.as_str()), &vocab::THEME_LABELS)
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| uri_fragment(theme))
        })
        .collect();

    Ok(Dataset {
        uri: uri.to_string(),
        title,
        description: graph.literal_value(&subject, dct::DESCRIPTION),
        publisher: graph.literal_value(&subject, dct::PUBLISHER),
        creator: graph.literal_value(&subject, dct::CREATOR),
        issued: date_value(graph, &subject, dct::ISSUED),
        modified: date_value(graph, &subject, dct::MODIFIED),
        theme_uris,
        theme_labels,
        keywords: graph.literal_objects(&subject, dcat::KEYWORD),
        contact_point: contact_for(graph, &subject),
        landing_page: graph
            .first_object(&subject, dcat::LANDING_PAGE)
            .map(|term| term.value().to_string()),
        parent_catalog_uri: catalog_uri.to_string(),
        parent_endpoint_uri: endpoint_uri.to_string(),
        parent_endpoint_title: endpoint_title.to_string(),
        distribution_uris: graph.iri_objects(&subject, dcat::DISTRIBUTION),
    })
}

/// Follow a dataset's contact link and read name, email and URL.
///
/// Absent when there is no contact link or the contact node is empty.
pub fn extract_contact_point(graph: &Graph, dataset_uri: &str) -> Option<ContactPoint> {
    contact_for(graph, &graph.resolve_subject(dataset_uri))
}

/// True if the graph carries a title for `uri`, i.e. describes it rather
/// than merely linking to it.
pub fn describes(graph: &Graph, uri: &str) -> bool {
    let subject = graph.resolve_subject(uri);
    title_of(graph, &subject).is_some()
}

fn contact_for(graph: &Graph, dataset: &Term) -> Option<ContactPoint> {
    graph
        .objects(dataset, dcat::CONTACT_POINT)
        .filter(|node| node.is_node())
        .map(|node| ContactPoint {
            name: graph.first_object(node, vcard::FN).map(|t| t.value().to_string()),
            email: graph
                .first_object(node, vcard::HAS_EMAIL)
                .map(|t| strip_mailto(t.value()).to_string()),
            url: graph.first_object(node, vcard::HAS_URL).map(|t| t.value().to_string()),
        })
        .find(|contact| !contact.is_empty())
}

fn subject_for(graph: &Graph, uri: &str) -> FdpResult<Term> {
    if uri.trim().is_empty() {
        return Err(FdpError::missing_field(uri, "uri"));
    }
    Ok(graph.resolve_subject(uri))
}

fn title_of(graph: &Graph, subject: &Term) -> Option<String> {
    [dct::TITLE, vocab::rdfs::LABEL]
        .iter()
        .find_map(|predicate| graph.literal_value(subject, predicate))
        .filter(|title| !title.trim().is_empty())
}

fn required_title(graph: &Graph, subject: &Term, uri: &str) -> FdpResult<String> {
    title_of(graph, subject).ok_or_else(|| FdpError::missing_field(uri, "title"))
}

fn date_value(graph: &Graph, subject: &Term, predicate: &str) -> Option<DateTime<Utc>> {
    let raw = graph.literal_value(subject, predicate)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        log::debug!("Dropping unparsable date {raw:?} on {}", subject.value());
    }
    parsed
}

/// Parse RFC 3339, naive ISO date-time (taken as UTC), or `YYYY-MM-DD`.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
