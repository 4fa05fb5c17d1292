// src/services/composer.rs

//! Data access request emails, one per dataset contact.

use serde::Serialize;

use crate::models::{ComposedEmail, DataRequest, DatasetReference};

const GREETING: &str = "Dear Data Steward,";
const OPENING: &str =
    "I am writing to request access to data for analysis under a data visiting arrangement.";
const CLOSING: &str = "I understand that the query will be executed locally on your systems and only verified/approved results will be returned. Please let me know if you require any additional information or documentation.";
const THANKS: &str = "Thank you for considering this request.";

/// Datasets that share one contact address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactGroup<'a> {
    pub email: &'a str,
    pub datasets: Vec<&'a DatasetReference>,
}

/// Renders request emails. Stateless; never fails and never validates.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailComposer;

impl EmailComposer {
    pub fn new() -> Self {
        Self
    }

    /// Partition the request's datasets by contact email.
    ///
    /// Groups appear in the order their address is first seen; datasets
    /// keep request order within a group.
    pub fn group_by_contact<'a>(&self, request: &'a DataRequest) -> Vec<ContactGroup<'a>> {
        let mut groups: Vec<ContactGroup<'a>> = Vec::new();
        for dataset in &request.datasets {
            let email = dataset.contact_email.as_str();
            match groups.iter_mut().find(|g| g.email == email) {
                Some(group) => group.datasets.push(dataset),
                None => groups.push(ContactGroup {
                    email,
                    datasets: vec![dataset],
                }),
            }
        }
        groups
    }

    /// One email per contact, each listing only that contact's datasets.
    pub fn compose_request_email(&self, request: &DataRequest) -> Vec<ComposedEmail> {
        self.group_by_contact(request)
            .into_iter()
            .map(|group| ComposedEmail {
                recipients: vec![group.email.to_string()],
                subject: subject(&group.datasets),
                body: body(request, &group.datasets),
            })
            .collect()
    }
}

fn subject(datasets: &[&DatasetReference]) -> String {
    match datasets {
        [] => "Data Access Request".to_string(),
        [only] => format!("Data Access Request - {}", only.title),
        [first, rest @ ..] => format!("Data Access Request - {} + {} more", first.title, rest.len()),
    }
}

/// Optional text, treating blank as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn body(request: &DataRequest, datasets: &[&DatasetReference]) -> String {
    let mut lines: Vec<String> = vec![
        GREETING.into(),
        String::new(),
        OPENING.into(),
        String::new(),
        "== REQUESTER INFORMATION ==".into(),
        format!("Name: {}", request.requester_name),
        format!("Email: {}", request.requester_email),
        format!("Affiliation: {}", request.requester_affiliation),
    ];
    if let Some(orcid) = present(&request.requester_orcid) {
        lines.push(format!("ORCID: {orcid}"));
    }
    lines.push(String::new());

    lines.push("== REQUESTED DATASETS ==".into());
    for (i, dataset) in datasets.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, dataset.title));
        lines.push(format!("   URI: {}", dataset.uri));
        lines.push(format!("   Source: {}", dataset.endpoint_title));
        lines.push(String::new());
    }

    let mut section = |heading: &str, text: &str| {
        lines.push(format!("== {heading} =="));
        lines.push(text.to_string());
        lines.push(String::new());
    };
    section("PROPOSED QUERY", &request.query);
    section("PURPOSE / JUSTIFICATION", &request.purpose);
    if let Some(constraints) = present(&request.output_constraints) {
        section("OUTPUT CONSTRAINTS", constraints);
    }
    if let Some(timeline) = present(&request.timeline) {
        section("TIMELINE", timeline);
    }

    lines.extend([
        CLOSING.to_string(),
        String::new(),
        THANKS.to_string(),
        String::new(),
        "Best regards,".to_string(),
        request.requester_name.clone(),
        request.requester_affiliation.clone(),
    ]);
    lines.join("\n")
}
