use std::sync::Arc;

use crate::health;
use crate::method::Method;
use crate::middleware::{Cors, Trace};
use crate::posts::{self, PostStore};
use crate::router::Router;

/// The complete application: posts API, health checks, tracing and CORS.
pub fn app(store: Arc<PostStore>) -> Router {
    posts::routes(Router::new(), store)
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz",  health::readiness)
        .layer(Trace)
        .layer(Cors::permissive())
}
