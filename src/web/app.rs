//! Application object.
//!
//! # Responsibilities
//! - Own the route table for one application instance
//! - Implement the gateway handler contract on top of it
//!
//! # Design Decisions
//! - No process-global route state: each `App` is its own table, shared
//!   across workers behind an `Arc` once serving begins
//! - Anything that goes wrong between path match and callback return is
//!   answered with the framework's own not-found page

use crate::gateway::environ::Environ;
use crate::gateway::handler::{BodyChunks, Handler, HandlerError};
use crate::gateway::response::StartResponse;
use crate::web::request::Request;
use crate::web::response::Response;
use crate::web::router::{RouteError, Router};

/// A routed web application; a callable gateway handler.
pub struct App {
    router: Router,
}

impl App {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Register a route pattern with its callback.
    pub fn route<F>(&mut self, pattern: &str, callback: F) -> Result<(), RouteError>
    where
        F: Fn(&Request, &[String]) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        self.router.add_route(pattern, callback)
    }

    /// The route table.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Turn one environment into a response, absorbing every failure into
    /// the not-found page.
    fn dispatch(&self, environ: &Environ) -> Response {
        let request = Request::new(environ);
        let result = self
            .router
            .match_path(&request.path())
            .map_err(HandlerError::from)
            .and_then(|(callback, args)| callback(&request, &args));

        match result {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(
                    path = %request.path(),
                    error = %error,
                    "Request fell through to the not-found page"
                );
                Response::not_found()
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for App {
    fn call(
        &self,
        environ: &Environ,
        start_response: &mut StartResponse,
    ) -> Result<BodyChunks, HandlerError> {
        let response = self.dispatch(environ);
        start_response.start(response.status_line(), response.headers());
        Ok(response.into_chunks())
    }
}
