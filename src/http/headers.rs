//! Header mapping and normalization.
//!
//! # Responsibilities
//! - Hold parsed header names and values in the order they arrived
//! - Guarantee the standard name set is present before environment building
//!
//! # Design Decisions
//! - Names keep the case the client sent; lookups against the standard set
//!   are exact-case, so `content-length` and `Content-Length` are distinct
//!   entries here (the environment only reads the canonical spellings)
//! - Standardization is a pure transform returning a new mapping

use indexmap::IndexMap;

/// Synthetic key holding the request method.
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
/// Synthetic key holding the request path.
pub const PATH_INFO: &str = "PATH_INFO";
/// Synthetic key holding the protocol version.
pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";

/// Names guaranteed present (possibly empty) after [`standardize`].
pub const STANDARD_NAMES: [&str; 22] = [
    SERVER_PROTOCOL,
    REQUEST_METHOD,
    PATH_INFO,
    "Host",
    "Connection",
    "Content-Length",
    "Cache-Control",
    "Content-Type",
    "sec-ch-ua",
    "sec-ch-ua-platform",
    "sec-ch-ua-mobile",
    "Upgrade-Insecure-Requests",
    "User-Agent",
    "Accept",
    "Sec-Fetch-Site",
    "Sec-Fetch-Mode",
    "Sec-Fetch-User",
    "Sec-Fetch-Dest",
    "Accept-Encoding",
    "Accept-Language",
    "Cookie",
    "Referer",
];

/// An insertion-ordered mapping of header names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, String>,
}

impl Headers {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name/value pair, replacing any existing value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Look up a value by exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Look up a value by exact name, defaulting to the empty string.
    pub fn get_or_default(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Whether a name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Return a copy of `headers` with every standard name present, defaulting
/// to the empty string where the request did not supply one.
pub fn standardize(headers: &Headers) -> Headers {
    let mut standardized = headers.clone();
    for name in STANDARD_NAMES {
        if !standardized.contains(name) {
            standardized.insert(name, headers.get_or_default(name));
        }
    }
    standardized
}
