//! Infrastructure error types.

use thiserror::Error;

/// The error type returned by postboard's fallible infrastructure operations.
///
/// Application-level errors (400, 404) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// failures that stop the process: binding to a port, accepting a
/// connection, installing the log subscriber.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("telemetry: {0}")]
    Telemetry(String),
}

/// Failure to turn an incoming hyper request into a [`Request`](crate::Request).
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    #[error("failed to read request body: {0}")]
    Body(#[source] hyper::Error),
}
