//! [`VaultError`] and its mapping onto the HTTP-facing [`ServiceError`].

use common::ServiceError;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::mode::{ModeError, RouteError};
use crate::storage::StorageError;

/// Any failure of a vault operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ModeError> for VaultError {
    fn from(err: ModeError) -> Self {
        Self::Route(err.into())
    }
}

impl From<VaultError> for ServiceError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Route(RouteError::Mode(e)) => ServiceError::BadRequest(e.to_string()),
            VaultError::Route(RouteError::Crypto(CryptoError::SealFailed)) => {
                ServiceError::Internal("encryption failed".into())
            }
            // Truncated and AuthenticationFailed collapse to one generic outcome.
            VaultError::Route(RouteError::Crypto(_)) => ServiceError::DecryptionFailure,
            VaultError::Storage(StorageError::NotFound(key)) => ServiceError::NotFound(key),
            VaultError::Storage(StorageError::Io(msg)) => ServiceError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_failures_are_indistinguishable() {
        let truncated: ServiceError =
            VaultError::from(RouteError::from(CryptoError::Truncated)).into();
        let forged: ServiceError =
            VaultError::from(RouteError::from(CryptoError::AuthenticationFailed)).into();
        assert_eq!(truncated.to_string(), forged.to_string());
        assert_eq!(truncated.http_status(), 500);
    }

    #[test]
    fn mode_errors_are_bad_requests() {
        let e: ServiceError = VaultError::from(ModeError::MissingKeyId).into();
        assert_eq!(e.http_status(), 400);
    }

    #[test]
    fn not_found_maps_to_404() {
        let e: ServiceError =
            VaultError::from(StorageError::NotFound("caller/x".into())).into();
        assert_eq!(e.http_status(), 404);
        assert!(e.to_string().contains("caller/x"));
    }

    #[test]
    fn io_maps_to_502() {
        let e: ServiceError = VaultError::from(StorageError::Io("timeout".into())).into();
        assert_eq!(e.http_status(), 502);
    }
}
