use tracing::{error, info};

use crate::response::Response;

use super::{Exchange, Middleware};

/// Logs one event per request: method, path, status, latency.
///
/// Server errors are logged at ERROR, everything else at INFO.
#[derive(Default)]
pub struct Trace;

impl Middleware for Trace {
    fn after(&self, exchange: &Exchange<'_>, res: &mut Response) {
        let status = res.code();
        let elapsed_ms = exchange.elapsed.as_secs_f64() * 1000.0;
        if status >= 500 {
            error!(method = exchange.method, path = exchange.path, status, elapsed_ms, "request failed");
        } else {
            info!(method = exchange.method, path = exchange.path, status, elapsed_ms, "request");
        }
    }
}
