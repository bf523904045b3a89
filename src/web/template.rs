//! Template-backed responses.
//!
//! # Responsibilities
//! - Pair a template file with a render context and response settings
//! - Render eagerly into a [`Response`], so template failures surface as
//!   typed errors while the not-found catch-all can still absorb them
//!
//! # Design Decisions
//! - Strict undefined behavior: a context missing a referenced variable is
//!   a render error, not silently empty output

use std::path::{Path, PathBuf};

use minijinja::{Environment, UndefinedBehavior};
use thiserror::Error;

use crate::web::response::Response;

/// Errors from turning a template into a response.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The template failed to parse or render.
    #[error("failed to render template {path}: {source}")]
    Render {
        path: PathBuf,
        source: minijinja::Error,
    },
}

/// A template file plus context, rendered on demand into a [`Response`].
pub struct TemplateResponse {
    path: PathBuf,
    context: serde_json::Value,
    status: u16,
    content_type: Option<String>,
}

impl TemplateResponse {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            context: serde_json::Value::Null,
            status: 200,
            content_type: None,
        }
    }

    /// Set the render context (any JSON-shaped value).
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    /// Status for the rendered response.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Content type for the rendered response (default text/html).
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read, render, and wrap into a [`Response`].
    pub fn render(&self) -> Result<Response, TemplateError> {
        let source = std::fs::read_to_string(&self.path).map_err(|source| TemplateError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template("response", &source)
            .map_err(|source| TemplateError::Render {
                path: self.path.clone(),
                source,
            })?;
        let template = env
            .get_template("response")
            .map_err(|source| TemplateError::Render {
                path: self.path.clone(),
                source,
            })?;
        let rendered = template
            .render(&self.context)
            .map_err(|source| TemplateError::Render {
                path: self.path.clone(),
                source,
            })?;

        let mut response = Response::new(rendered).with_status(self.status);
        if let Some(content_type) = &self.content_type {
            response = response.with_content_type(content_type.clone());
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn template_file(source: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{source}").unwrap();
        file
    }

    #[test]
    fn renders_context_into_body() {
        let file = template_file("Hello {{ name }}!");
        let response = TemplateResponse::new(file.path())
            .with_context(json!({ "name": "Joe" }))
            .render()
            .unwrap();

        let body: Vec<u8> = response.into_chunks().flatten().collect();
        assert_eq!(body, b"Hello Joe!");
    }

    #[test]
    fn settings_pass_through_to_response() {
        let file = template_file("{\"ok\": true}");
        let response = TemplateResponse::new(file.path())
            .with_status(201)
            .with_content_type("application/json")
            .render()
            .unwrap();

        assert_eq!(response.status_line(), "201 Created");
        assert_eq!(response.headers()[0].1, "application/json; charset=utf-8");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TemplateResponse::new("/nonexistent/home.html")
            .render()
            .unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
    }

    #[test]
    fn missing_context_variable_is_a_render_error() {
        let file = template_file("Hello {{ name }}!");
        let err = TemplateResponse::new(file.path()).render().unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
    }

    #[test]
    fn malformed_template_is_a_render_error() {
        let file = template_file("Hello {{ name !");
        let err = TemplateResponse::new(file.path())
            .with_context(json!({ "name": "Joe" }))
            .render()
            .unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
    }
}
