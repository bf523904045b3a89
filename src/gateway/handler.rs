//! Handler contract and invocation.
//!
//! # Responsibilities
//! - Define the trait every application implements
//! - Invoke the handler with a fresh start-response state per request
//! - Collapse every invocation failure to the fixed fallback response
//!
//! # Design Decisions
//! - Handlers return typed results; the 404 collapse is one policy seam,
//!   not scattered catch blocks
//! - The trait is object-safe and implemented for plain closures, so tests
//!   and small servers need no struct

use crate::gateway::environ::Environ;
use crate::gateway::response::{not_found_response, ResponseDescriptor, StartResponse};

/// A finite, single-pass sequence of response body chunks.
pub type BodyChunks = Box<dyn Iterator<Item = Vec<u8>> + Send>;

/// Error cause reported by a failing handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The application side of the gateway contract.
///
/// One call per request. Implementations must call
/// [`StartResponse::start`] before returning, and must be safe to invoke
/// from concurrent workers.
pub trait Handler: Send + Sync {
    fn call(
        &self,
        environ: &Environ,
        start_response: &mut StartResponse,
    ) -> Result<BodyChunks, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&Environ, &mut StartResponse) -> Result<BodyChunks, HandlerError> + Send + Sync,
{
    fn call(
        &self,
        environ: &Environ,
        start_response: &mut StartResponse,
    ) -> Result<BodyChunks, HandlerError> {
        self(environ, start_response)
    }
}

/// Invoke the handler for one request.
///
/// Always yields a writable response: handler errors and a missing
/// descriptor both collapse to the fallback, with the cause logged here
/// before its identity is lost.
pub fn invoke(handler: &dyn Handler, environ: &Environ) -> (ResponseDescriptor, BodyChunks) {
    let mut start_response = StartResponse::new();

    match handler.call(environ, &mut start_response) {
        Ok(body) => match start_response.into_descriptor() {
            Some(descriptor) => (descriptor, body),
            None => {
                tracing::warn!("Handler returned without calling start_response");
                not_found_response()
            }
        },
        Err(error) => {
            tracing::warn!(error = %error, "Handler failed, substituting fallback response");
            not_found_response()
        }
    }
}
