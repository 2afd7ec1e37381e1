//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` wins when it is set and parses; otherwise `default_filter`
/// (e.g. `"info"` or `"postboard=debug"`) is used.
pub fn init(default_filter: &str) -> Result<(), Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| Error::Telemetry(format!("invalid log filter `{default_filter}`: {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Telemetry(e.to_string()))
}
