use thiserror::Error;
use tracing::debug;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Errors a posts handler reports to the caller.
///
/// Every variant is terminal: it becomes a JSON `{"error": …}` body with the
/// matching status and nothing is retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or missing request fields or parameters.
    #[error("{0}")]
    Validation(String),

    /// The referenced post does not exist.
    #[error("Post with id {0} not found.")]
    PostNotFound(u64),

    /// An all-digit id too large to have ever been assigned.
    #[error("Post with id {0} not found.")]
    IdOutOfRange(String),

    /// The `{id}` path segment is not an id at all.
    #[error("Resource not found")]
    BadId,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::PostNotFound(_) | Self::IdOutOfRange(_) | Self::BadId => Status::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(error = %self, "request rejected");
        Response::error(self.status(), self.to_string())
    }
}
