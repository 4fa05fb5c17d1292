// src/models/outcome.rs

//! Best-effort batch results.

use serde::Serialize;

use crate::error::FdpError;

/// An item of a batch that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub uri: String,
    pub error: FdpError,
}

impl Serialize for FetchFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("FetchFailure", 2)?;
        state.serialize_field("uri", &self.uri)?;
        state.serialize_field("error", &self.error.to_string())?;
        state.end()
    }
}

/// Summary of a batch fetch: what came back and what was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome<T> {
    pub items: Vec<T>,
    pub failures: Vec<FetchFailure>,
}

impl<T> Default for FetchOutcome<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> FetchOutcome<T> {
    /// Record a failed item and log it.
    pub fn record_failure(&mut self, uri: impl Into<String>, error: FdpError) {
        let uri = uri.into();
        log::warn!("Skipping {}: {}", uri, error);
        self.failures.push(FetchFailure { uri, error });
    }

    /// Fold another outcome's items and failures into this one.
    pub fn absorb(&mut self, other: FetchOutcome<T>) {
        self.items.extend(other.items);
        self.failures.extend(other.failures);
    }

    pub fn attempted(&self) -> usize {
        self.items.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable "N of M succeeded" line.
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded", self.items.len(), self.attempted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_failures() {
        let mut outcome = FetchOutcome {
            items: vec![1, 2],
            failures: Vec::new(),
        };
        assert!(outcome.is_complete());

        outcome.record_failure("https://down.example.org", FdpError::timeout("https://down.example.org", 30));
        assert_eq!(outcome.attempted(), 3);
        assert_eq!(outcome.summary(), "2 of 3 succeeded");
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_absorb_keeps_order() {
        let mut a = FetchOutcome {
            items: vec!["a"],
            failures: Vec::new(),
        };
        let mut b = FetchOutcome {
            items: vec!["b", "c"],
            failures: Vec::new(),
        };
        b.record_failure("x", FdpError::connection("x", None, "refused"));
        a.absorb(b);
        assert_eq!(a.items, vec!["a", "b", "c"]);
        assert_eq!(a.failures.len(), 1);
    }

    #[test]
    fn test_failure_serializes_message() {
        let failure = FetchFailure {
            uri: "https://a.example".to_string(),
            error: FdpError::missing_field("https://a.example", "title"),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["uri"], "https://a.example");
        assert!(json["error"].as_str().unwrap().contains("title"));
    }
}
