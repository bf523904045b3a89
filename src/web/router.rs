//! Route table.
//!
//! # Responsibilities
//! - Hold (pattern, callback) pairs in registration order
//! - Match a path against the table, first match wins
//!
//! # Design Decisions
//! - Patterns are regular expressions matched at the start of the path,
//!   so `^/$` and `^/hello/(\w+)/$` read the way route authors expect
//! - Capture group text is handed to the callback as its arguments

use regex::Regex;
use thiserror::Error;

use crate::gateway::handler::HandlerError;
use crate::web::request::Request;
use crate::web::response::Response;

/// A route callback: the request plus the pattern's capture groups.
pub type RouteCallback =
    Box<dyn Fn(&Request, &[String]) -> Result<Response, HandlerError> + Send + Sync>;

/// Errors from route registration and matching.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The route pattern is not a valid regular expression.
    #[error("invalid route pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    /// No registered pattern matched the path.
    #[error("no route matches {path:?}")]
    NoMatch { path: String },
}

/// An ordered table of routes.
pub struct Router {
    routing_table: Vec<(Regex, RouteCallback)>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routing_table: Vec::new(),
        }
    }

    /// Compile `pattern` and append it to the table.
    pub fn add_route<F>(&mut self, pattern: &str, callback: F) -> Result<(), RouteError>
    where
        F: Fn(&Request, &[String]) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        let regex = Regex::new(pattern).map_err(|source| RouteError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.routing_table.push((regex, Box::new(callback)));
        Ok(())
    }

    /// Find the first route whose pattern matches at the start of `path`.
    ///
    /// Returns the callback and the text of every capture group; a group
    /// that did not participate in the match yields an empty string.
    pub fn match_path(&self, path: &str) -> Result<(&RouteCallback, Vec<String>), RouteError> {
        for (pattern, callback) in &self.routing_table {
            if let Some(captures) = pattern.captures(path) {
                let at_start = captures.get(0).map(|m| m.start() == 0).unwrap_or(false);
                if !at_start {
                    continue;
                }
                let args = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                return Ok((callback, args));
            }
        }
        Err(RouteError::NoMatch {
            path: path.to_string(),
        })
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routing_table.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
