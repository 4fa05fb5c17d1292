// src/pipeline/compose.rs

//! Request composition from a TOML request file.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ComposedEmail, DataRequest, Dataset, DatasetReference};
use crate::services::EmailComposer;

/// Requester details plus the URIs of the datasets to request.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestFile {
    pub requester_name: String,
    pub requester_email: String,
    pub requester_affiliation: String,
    #[serde(default)]
    pub requester_orcid: Option<String>,
    pub query: String,
    pub purpose: String,
    #[serde(default)]
    pub output_constraints: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    /// Dataset URIs, in the order they should be listed
    pub datasets: Vec<String>,
}

impl RequestFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Build a request by snapshotting each listed dataset from `available`.
    ///
    /// Fails if a URI is unknown or its dataset has no contact email.
    pub fn into_request(self, available: &[Dataset]) -> Result<DataRequest> {
        let datasets = self
            .datasets
            .iter()
            .map(|uri| {
                let dataset = available
                    .iter()
                    .find(|d| &d.uri == uri)
                    .ok_or_else(|| AppError::validation(format!("Dataset {uri} was not found")))?;
                DatasetReference::from_dataset(dataset).ok_or_else(|| {
                    AppError::validation(format!(
                        "Dataset '{}' has no contact email and cannot be requested",
                        dataset.title
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DataRequest {
            requester_name: self.requester_name,
            requester_email: self.requester_email,
            requester_affiliation: self.requester_affiliation,
            requester_orcid: self.requester_orcid,
            datasets,
            query: self.query,
            purpose: self.purpose,
            output_constraints: self.output_constraints,
            timeline: self.timeline,
            created_at: Utc::now(),
        })
    }
}

/// Validate the request built from `file` and compose its emails.
pub fn run_compose(file: RequestFile, available: &[Dataset]) -> Result<Vec<ComposedEmail>> {
    let request = file.into_request(available)?;
    request.validate()?;

    let emails = EmailComposer::new().compose_request_email(&request);
    log::info!(
        "Composed {} email(s) for {} dataset(s)",
        emails.len(),
        request.datasets.len()
    );
    Ok(emails)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::ContactPoint;

    const REQUEST: &str = r#"
requester_name = "Dr. Ada Doe"
requester_email = "ada@uni.example"
requester_affiliation = "University of Example"
query = "SELECT avg(ph) FROM samples"
purpose = "Soil acidity trends"
timeline = "Q3 2026"
datasets = [
    "https://fdp.example.org/dataset/soil",
    "https://fdp.example.org/dataset/rain",
]
"#;

    fn dataset(slug: &str, email: Option<&str>) -> Dataset {
        Dataset {
            uri: format!("https://fdp.example.org/dataset/{slug}"),
            title: slug.to_uppercase(),
            description: None,
            publisher: None,
            creator: None,
            issued: None,
            modified: None,
            theme_uris: vec![],
            theme_labels: vec![],
            keywords: vec![],
            contact_point: email.map(|e| ContactPoint {
                email: Some(e.to_string()),
                ..ContactPoint::default()
            }),
            landing_page: None,
            parent_catalog_uri: "https://fdp.example.org/catalog/1".to_string(),
            parent_endpoint_uri: "https://fdp.example.org".to_string(),
            parent_endpoint_title: "Example FDP".to_string(),
            distribution_uris: vec![],
        }
    }

    fn load(text: &str) -> RequestFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        RequestFile::load(file.path()).unwrap()
    }

    #[test]
    fn test_request_file_resolves_datasets_in_listed_order() {
        let available = vec![
            dataset("rain", Some("a@fdp.example.org")),
            dataset("soil", Some("b@fdp.example.org")),
        ];
        let request = load(REQUEST).into_request(&available).unwrap();

        let titles: Vec<_> = request.datasets.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["SOIL", "RAIN"]);
        assert_eq!(request.timeline.as_deref(), Some("Q3 2026"));
        assert_eq!(request.requester_orcid, None);
    }

    #[test]
    fn test_unknown_or_unrequestable_dataset_is_rejected() {
        let only_rain = vec![dataset("rain", Some("a@fdp.example.org"))];
        let err = load(REQUEST).into_request(&only_rain).unwrap_err();
        assert!(err.to_string().contains("dataset/soil"));

        let no_contact = vec![
            dataset("rain", Some("a@fdp.example.org")),
            dataset("soil", None),
        ];
        let err = load(REQUEST).into_request(&no_contact).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_run_compose_one_email_per_contact() {
        let available = vec![
            dataset("rain", Some("a@fdp.example.org")),
            dataset("soil", Some("b@fdp.example.org")),
        ];
        let emails = run_compose(load(REQUEST), &available).unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].recipients, vec!["b@fdp.example.org"]);
        assert!(emails[0].body.contains("== TIMELINE ==\nQ3 2026"));
    }

    #[test]
    fn test_run_compose_validates_request() {
        let available = vec![
            dataset("rain", Some("a@fdp.example.org")),
            dataset("soil", Some("b@fdp.example.org")),
        ];
        let mut file = load(REQUEST);
        file.requester_email = "nobody".to_string();
        assert!(matches!(
            run_compose(file, &available),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_field_is_toml_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"requester_name = \"Ada\"\n").unwrap();
        assert!(matches!(
            RequestFile::load(file.path()),
            Err(AppError::Toml(_))
        ));
    }
}
