//! Middleware layer.
//!
//! Middleware sees every request before routing and every response on the
//! way out. It is the place for cross-cutting concerns that do not belong in
//! a handler.
//!
//! Built-in middleware:
//! - [`Cors`]: cross-origin headers and preflight answers
//! - [`Trace`]: one log event per request with method, path, status, latency

mod cors;
mod trace;

use std::time::Duration;

use crate::request::Request;
use crate::response::Response;

pub use cors::Cors;
pub use trace::Trace;

/// A request/response hook registered with [`Router::layer`](crate::Router::layer).
///
/// `before` runs in registration order; the first `Some` short-circuits
/// routing and becomes the response. `after` runs in reverse registration
/// order on every response, short-circuited or not.
pub trait Middleware: Send + Sync + 'static {
    fn before(&self, _req: &Request) -> Option<Response> {
        None
    }

    fn after(&self, _exchange: &Exchange<'_>, _res: &mut Response) {}
}

/// What `after` hooks know about the request that produced a response.
///
/// The request itself has been consumed by the handler by then, or was never
/// built at all when the server rejected it. `method` is the wire token, so
/// it may name a method the router does not know.
pub struct Exchange<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub elapsed: Duration,
}
