//! Common error types shared across crates.

use thiserror::Error;

/// Message returned to callers for every decryption failure.
///
/// Deliberately generic: callers must not learn whether the key or the
/// stored bytes were at fault.
pub const DECRYPT_FAILURE_MESSAGE: &str = "cannot decrypt object";

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::DecryptionFailure`] → 500
/// - [`ServiceError::Storage`] → 502
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: unknown mode, missing key id, missing file.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested object does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller-managed object could not be decrypted.
    #[error("{DECRYPT_FAILURE_MESSAGE}")]
    DecryptionFailure,

    /// The object store rejected or failed the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::DecryptionFailure => 500,
            ServiceError::Storage(_) => 502,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::DecryptionFailure => "decryption_failed",
            ServiceError::Storage(_) => "storage_error",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
