// src/error.rs

//! Unified error handling for the data visiting client.
//!
//! Remote fetches fail with the closed [`FdpError`] taxonomy. Everything the
//! application does around them (configuration, files, CLI input) is folded
//! into [`AppError`].

use std::fmt;

use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for operations that talk to FAIR Data Points.
pub type FdpResult<T> = std::result::Result<T, FdpError>;

/// What went wrong while turning a document into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDetail {
    /// The body was not valid in any accepted RDF serialization.
    Syntax(String),
    /// A required field could not be resolved from the graph.
    MissingField(&'static str),
}

impl fmt::Display for ParseDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDetail::Syntax(message) => write!(f, "{message}"),
            ParseDetail::MissingField(field) => write!(f, "missing required field '{field}'"),
        }
    }
}

/// Failure of a single fetch or extraction against a FAIR Data Point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FdpError {
    /// Endpoint unreachable or answered with a non-success status
    #[error("Connection error for {uri}: {message}")]
    Connection {
        uri: String,
        status: Option<u16>,
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("Request to {uri} timed out after {timeout_secs}s")]
    Timeout { uri: String, timeout_secs: u64 },

    /// Body unparseable, or a required field is missing
    #[error("Parse error for {uri}: {detail}")]
    Parse { uri: String, detail: ParseDetail },
}

impl FdpError {
    /// Create a connection error, optionally carrying the HTTP status.
    pub fn connection(uri: impl Into<String>, status: Option<u16>, message: impl fmt::Display) -> Self {
        Self::Connection {
            uri: uri.into(),
            status,
            message: message.to_string(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(uri: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            uri: uri.into(),
            timeout_secs,
        }
    }

    /// Create a parse error for a body that could not be read as RDF.
    pub fn syntax(uri: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            uri: uri.into(),
            detail: ParseDetail::Syntax(message.to_string()),
        }
    }

    /// Create a parse error for a required field that is absent.
    pub fn missing_field(uri: impl Into<String>, field: &'static str) -> Self {
        Self::Parse {
            uri: uri.into(),
            detail: ParseDetail::MissingField(field),
        }
    }

    /// The URI the failure relates to.
    pub fn uri(&self) -> &str {
        match self {
            FdpError::Connection { uri, .. }
            | FdpError::Timeout { uri, .. }
            | FdpError::Parse { uri, .. } => uri,
        }
    }

    /// Short user-facing reason, without the URI.
    pub fn reason(&self) -> &'static str {
        match self {
            FdpError::Connection { .. } => "Could not connect",
            FdpError::Timeout { .. } => "Request timed out",
            FdpError::Parse { .. } => "Could not parse metadata",
        }
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// FAIR Data Point fetch or extraction failed
    #[error(transparent)]
    Fdp(#[from] FdpError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
