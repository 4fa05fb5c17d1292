//! Pipeline entry points for command-line operations.
//!
//! - `resolve_endpoints`: Combine configured endpoints with those linked from indexes
//! - `run_discover`: Fetch every endpoint an index links to
//! - `run_browse`: Aggregate datasets and apply filters or search
//! - `run_compose`: Turn a request file into one email per contact

pub mod browse;
pub mod compose;
pub mod discover;

pub use browse::{BrowseQuery, run_browse};
pub use compose::{RequestFile, run_compose};
pub use discover::{resolve_endpoints, run_discover};
