//! The object-store contract consumed by the vault, and its S3 implementation.
//!
//! The store is an external collaborator: this crate performs no retries,
//! caching, or timeouts around it. Errors are passed up unchanged.

#[cfg(test)]
pub mod memory;
pub mod s3;

pub use s3::S3Gateway;

use async_trait::async_trait;
use thiserror::Error;

use crate::mode::Metadata;

/// Errors reported by the object store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// No object exists under the requested key.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Transport or service failure.
    #[error("storage i/o error: {0}")]
    Io(String),
}

/// An object as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Storage key the object lives under.
    pub key: String,
    /// Raw stored bytes (already decrypted by the store for provider-managed objects).
    pub body: Vec<u8>,
    /// User metadata persisted with the object.
    pub metadata: Metadata,
}

/// Minimal put/get/list surface required from an object store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Store `body` under `storage_key`.
    ///
    /// When `provider_key_id` is set the store must encrypt the object at rest
    /// with that provider-side key.
    async fn put(
        &self,
        storage_key: &str,
        body: Vec<u8>,
        metadata: Metadata,
        provider_key_id: Option<String>,
    ) -> Result<(), StorageError>;

    /// Fetch an object with its metadata.
    async fn get(&self, storage_key: &str) -> Result<StoredObject, StorageError>;

    /// List up to `max` keys starting with `prefix`.
    async fn list(&self, prefix: &str, max: i32) -> Result<Vec<String>, StorageError>;
}
