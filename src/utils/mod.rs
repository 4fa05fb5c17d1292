//! Utility functions and helpers.

use sha2::{Digest, Sha256};
use url::Url;

/// Stable hex identifier for a URI, usable as a compact session key.
pub fn uri_hash(uri: &str) -> String {
    hex::encode(Sha256::digest(uri.as_bytes()))
}

/// Last meaningful segment of a URI: the fragment if there is one, else the
/// final non-empty path segment. Used as a fallback label.
pub fn uri_fragment(uri: &str) -> String {
    if let Some((_, fragment)) = uri.rsplit_once('#') {
        if !fragment.is_empty() {
            return fragment.to_string();
        }
    }
    uri.trim_end_matches(['/', '#'])
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(uri)
        .to_string()
}

/// True if the string parses as an absolute `http` or `https` URL.
pub fn is_http_uri(uri: &str) -> bool {
    Url::parse(uri)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Strip a `mailto:` scheme from an email value.
pub fn strip_mailto(value: &str) -> &str {
    value.strip_prefix("mailto:").unwrap_or(value)
}
