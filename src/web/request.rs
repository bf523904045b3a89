//! Request wrapper.
//!
//! A read-only view over one environment, giving route callbacks the
//! pieces they actually use: method, normalized path, decoded query args.

use std::collections::HashMap;
use std::fmt;

use crate::gateway::environ::{keys, Environ};

/// Read-only view over one request environment.
pub struct Request<'e> {
    environ: &'e Environ,
}

impl<'e> Request<'e> {
    pub fn new(environ: &'e Environ) -> Self {
        Self { environ }
    }

    /// Request path, normalized to exactly one leading slash.
    pub fn path(&self) -> String {
        format!(
            "/{}",
            self.environ.get(keys::PATH_INFO).trim_start_matches('/')
        )
    }

    /// Request method, empty when the request carried none.
    pub fn method(&self) -> &str {
        self.environ.get(keys::REQUEST_METHOD)
    }

    /// Decoded query arguments.
    ///
    /// The first occurrence of a repeated key wins; pairs with a blank
    /// value are dropped.
    pub fn args(&self) -> HashMap<String, String> {
        let query = self.environ.get(keys::QUERY_STRING);
        let mut args = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            args.entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        args
    }

    /// The underlying environment.
    pub fn environ(&self) -> &Environ {
        self.environ
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Request: {} {}>", self.method(), self.path())
    }
}
