// src/models/endpoint.rs

//! FAIR Data Point endpoint and catalog records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FdpError;
use crate::utils::uri_hash;

/// Fetch state of an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    /// Known but never fetched
    #[default]
    Pending,
    /// Last fetch succeeded
    Active,
    /// Last fetch failed; see `error_message`
    Error,
}

/// A metadata endpoint (FDP), possibly an index of other endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub uri: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// True iff the endpoint links to other endpoints
    #[serde(default)]
    pub is_index: bool,

    /// Catalog URIs, in document order
    #[serde(default)]
    pub catalog_uris: Vec<String>,

    /// Linked endpoint URIs; empty unless `is_index`
    #[serde(default)]
    pub linked_endpoint_uris: Vec<String>,

    #[serde(default)]
    pub last_fetched: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: EndpointStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Endpoint {
    /// An endpoint that has been registered but not fetched yet.
    pub fn pending(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            title: uri.clone(),
            uri,
            description: None,
            publisher: None,
            is_index: false,
            catalog_uris: Vec::new(),
            linked_endpoint_uris: Vec::new(),
            last_fetched: None,
            status: EndpointStatus::Pending,
            error_message: None,
        }
    }

    /// Placeholder record for an endpoint whose fetch failed.
    pub fn failed(uri: impl Into<String>, error: &FdpError) -> Self {
        Self {
            last_fetched: Some(Utc::now()),
            status: EndpointStatus::Error,
            error_message: Some(error.to_string()),
            ..Self::pending(uri)
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EndpointStatus::Active
    }

    /// Compact identifier derived from the URI.
    pub fn id(&self) -> String {
        uri_hash(&self.uri)
    }
}

/// A DCAT catalog published by one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub uri: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub parent_endpoint_uri: String,
    /// Member dataset URIs, in document order
    #[serde(default)]
    pub dataset_uris: Vec<String>,
    /// Distinct theme URIs, first-seen order
    #[serde(default)]
    pub theme_uris: Vec<String>,
}
