// src/models/dataset.rs

//! Dataset and contact point records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::uri_hash;

/// Addressable party for data access requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ContactPoint {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.url.is_none()
    }
}

/// A DCAT dataset with everything needed for discovery and requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Identity key
    pub uri: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default)]
    pub creator: Option<String>,

    #[serde(default)]
    pub issued: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,

    /// Distinct theme URIs
    #[serde(default)]
    pub theme_uris: Vec<String>,

    /// `theme_labels[i]` labels `theme_uris[i]`
    #[serde(default)]
    pub theme_labels: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub contact_point: Option<ContactPoint>,

    #[serde(default)]
    pub landing_page: Option<String>,

    pub parent_catalog_uri: String,

    pub parent_endpoint_uri: String,

    /// Title of the publishing endpoint, kept for display
    pub parent_endpoint_title: String,

    /// Informational only
    #[serde(default)]
    pub distribution_uris: Vec<String>,
}

impl Dataset {
    /// Contact email, if the dataset has one.
    pub fn contact_email(&self) -> Option<&str> {
        self.contact_point.as_ref()?.email.as_deref()
    }

    /// A dataset can be requested only when its owner can be emailed.
    pub fn is_requestable(&self) -> bool {
        self.contact_email().is_some()
    }

    /// Iterate `(theme_uri, label)` pairs.
    pub fn themes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.theme_uris
            .iter()
            .zip(self.theme_labels.iter())
            .map(|(uri, label)| (uri.as_str(), label.as_str()))
    }

    pub fn has_theme(&self, theme_uri: &str) -> bool {
        self.theme_uris.iter().any(|uri| uri == theme_uri)
    }

    /// Compact identifier derived from the URI.
    pub fn id(&self) -> String {
        uri_hash(&self.uri)
    }
}

/// A theme available for filtering, derived from a dataset collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub uri: String,
    pub label: String,
    /// Number of datasets carrying this theme
    pub count: usize,
}
