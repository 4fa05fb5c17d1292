// src/models/mod.rs

//! Domain models for the data visiting client.
//!
//! Records materialized from endpoint metadata, the request a user builds
//! from them, and batch result summaries.

mod dataset;
mod endpoint;
mod outcome;
mod request;

// Re-export all public types
pub use dataset::{ContactPoint, Dataset, Theme};
pub use endpoint::{Catalog, Endpoint, EndpointStatus};
pub use outcome::{FetchFailure, FetchOutcome};
pub use request::{ComposedEmail, DataRequest, DatasetReference};
