//! Service layer for the data visiting client.
//!
//! This module contains the business logic for:
//! - Graph retrieval (`GraphFetcher`, `HttpGraphFetcher`)
//! - Record extraction from graphs (`extract`)
//! - Endpoint, catalog and dataset fetching (`FdpClient`)
//! - Aggregation, filtering and search (`DatasetService`)
//! - Request email composition (`EmailComposer`)

pub(crate) mod client;
mod composer;
mod datasets;
pub mod extract;
pub(crate) mod fetch;

pub use client::FdpClient;
pub use composer::{ContactGroup, EmailComposer};
pub use datasets::DatasetService;
pub use fetch::{GraphFetcher, HttpGraphFetcher};
