// src/models/request.rs

//! Data access request records.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{AppError, Result};
use crate::models::Dataset;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Snapshot of a dataset taken when the user selects it.
///
/// Later changes to the source dataset do not reach a pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReference {
    pub uri: String,
    pub title: String,
    pub contact_email: String,
    /// Title of the endpoint the dataset came from
    pub endpoint_title: String,
}

impl DatasetReference {
    /// Take a snapshot of `dataset`. Returns `None` when the dataset has no
    /// contact email and therefore cannot be requested.
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        let email = dataset.contact_email()?;
        Some(Self {
            uri: dataset.uri.clone(),
            title: dataset.title.clone(),
            contact_email: email.to_string(),
            endpoint_title: dataset.parent_endpoint_title.clone(),
        })
    }
}

/// A data access request assembled by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequest {
    pub requester_name: String,
    pub requester_email: String,
    pub requester_affiliation: String,
    #[serde(default)]
    pub requester_orcid: Option<String>,
    pub datasets: Vec<DatasetReference>,
    pub query: String,
    pub purpose: String,
    #[serde(default)]
    pub output_constraints: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl DataRequest {
    /// List everything a request form would reject, in field order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let required = [
            ("Name", &self.requester_name),
            ("Email", &self.requester_email),
            ("Affiliation", &self.requester_affiliation),
            ("Query/Analysis description", &self.query),
            ("Purpose", &self.purpose),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                problems.push(format!("{label} is required."));
            }
        }
        let email = self.requester_email.trim();
        if !email.is_empty() && !EMAIL_RE.is_match(email) {
            problems.push(format!("Email '{email}' is not a valid address."));
        }
        if self.datasets.is_empty() {
            problems.push("At least one dataset must be selected.".to_string());
        }
        problems
    }

    /// Caller-side validation; the composer itself never calls this.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(problems.join(" ")))
        }
    }
}

/// One outgoing message, ready to copy or hand to a mail client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl ComposedEmail {
    /// `mailto:` URI (RFC 6068) carrying recipients, subject and body.
    pub fn mailto_link(&self) -> String {
        let recipients = self
            .recipients
            .iter()
            .map(|r| encode_component(r).replace("%40", "@"))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "mailto:{}?subject={}&body={}",
            recipients,
            encode_component(&self.subject),
            encode_component(&self.body.replace('\n', "\r\n")),
        )
    }
}

/// Percent-encode for a URI component. `form_urlencoded` writes spaces as
/// `+`, which mail clients do not decode, and encodes a literal `+` as
/// `%2B`, so swapping the remaining `+` for `%20` is safe.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactPoint;

    fn reference(title: &str, email: &str) -> DatasetReference {
        DatasetReference {
            uri: format!("https://fdp.example.org/dataset/{}", title.len()),
            title: title.to_string(),
            contact_email: email.to_string(),
            endpoint_title: "Example FDP".to_string(),
        }
    }

    fn request() -> DataRequest {
        DataRequest {
            requester_name: "Ada Researcher".to_string(),
            requester_email: "ada@uni.example".to_string(),
            requester_affiliation: "Example University".to_string(),
            requester_orcid: None,
            datasets: vec![reference("Rainfall Atlas", "steward@fdp.example.org")],
            query: "SELECT avg(rainfall)".to_string(),
            purpose: "Climate trends".to_string(),
            output_constraints: None,
            timeline: None,
            created_at: Utc::now(),
        }
    }

    fn dataset(contact: Option<ContactPoint>) -> Dataset {
        Dataset {
            uri: "https://fdp.example.org/dataset/rain".to_string(),
            title: "Rainfall Atlas".to_string(),
            description: None,
            publisher: None,
            creator: None,
            issued: None,
            modified: None,
            theme_uris: vec![],
            theme_labels: vec![],
            keywords: vec![],
            contact_point: contact,
            landing_page: None,
            parent_catalog_uri: "https://fdp.example.org/catalog/1".to_string(),
            parent_endpoint_uri: "https://fdp.example.org".to_string(),
            parent_endpoint_title: "Example FDP".to_string(),
            distribution_uris: vec![],
        }
    }

    #[test]
    fn test_reference_requires_contact_email() {
        assert!(DatasetReference::from_dataset(&dataset(None)).is_none());

        let url_only = ContactPoint {
            url: Some("https://fdp.example.org/contact".to_string()),
            ..ContactPoint::default()
        };
        assert!(DatasetReference::from_dataset(&dataset(Some(url_only))).is_none());

        let with_email = ContactPoint {
            email: Some("steward@fdp.example.org".to_string()),
            ..ContactPoint::default()
        };
        let r = DatasetReference::from_dataset(&dataset(Some(with_email))).unwrap();
        assert_eq!(r.contact_email, "steward@fdp.example.org");
        assert_eq!(r.endpoint_title, "Example FDP");
    }

    #[test]
    fn test_valid_request_has_no_problems() {
        assert!(request().problems().is_empty());
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_problems_are_all_reported() {
        let mut req = request();
        req.requester_name = "  ".to_string();
        req.purpose = String::new();
        req.requester_email = "not-an-email".to_string();
        req.datasets.clear();

        let problems = req.problems();
        assert_eq!(problems.len(), 4);
        assert_eq!(problems[0], "Name is required.");
        assert!(problems[1].contains("Purpose"));
        assert!(problems[2].contains("not-an-email"));
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_mailto_link_encodes_subject_and_body() {
        let email = ComposedEmail {
            recipients: vec!["steward@fdp.example.org".to_string()],
            subject: "Data Access Request - A & B".to_string(),
            body: "Line one\nLine 2+3".to_string(),
        };
        assert_eq!(
            email.mailto_link(),
            "mailto:steward@fdp.example.org?subject=Data%20Access%20Request%20-%20A%20%26%20B\
             &body=Line%20one%0D%0ALine%202%2B3"
        );
    }
}
